//! skos-prune CLI: cut SKOS taxonomies down to one branch or a set of languages.

use std::path::PathBuf;

use clap::builder::BoolishValueParser;
use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use skos_prune::config::FilterConfig;
use skos_prune::filter::{HierarchyFilter, LanguageFilter, LanguageSet, SchemeRetention};
use skos_prune::graph::Node;
use skos_prune::pipeline::{RunReport, Source, run_filter};
use skos_prune::rdf_io::{self, RdfFormat};
use skos_prune::{diff, paths, urispace};

#[derive(Parser)]
#[command(name = "skos-prune", version, about = "Filter SKOS taxonomies")]
struct Cli {
    /// TOML file with default settings.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print the run report as JSON instead of a text summary.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Keep only the branch around a top concept: its ancestors, descendants,
    /// and collection members.
    Hierarchy {
        /// Input taxonomy.
        #[arg(long, visible_alias = "input_filename")]
        input: PathBuf,

        /// IRI of the top concept to keep.
        #[arg(long, visible_alias = "top_concept")]
        top_concept: String,

        /// Output RDF/XML file (default: <input>_reduced.<ext>).
        #[arg(long, visible_alias = "output_filename")]
        output: Option<PathBuf>,

        /// Input serialization: xml or ttl (default: xml).
        #[arg(long)]
        format: Option<RdfFormat>,

        /// Base IRI for relative IRIs in the input.
        #[arg(long)]
        base_iri: Option<String>,

        /// Which concept schemes to keep: all, or only those referenced via inScheme.
        #[arg(long)]
        schemes: Option<SchemeRetention>,
    },

    /// Keep only concepts labelled in the given languages, plus their ancestors.
    Language {
        /// Input taxonomy.
        #[arg(long, visible_alias = "input_filename")]
        input: PathBuf,

        /// Language tags to keep (e.g. `en es`).
        #[arg(long, required = true, num_args = 1..)]
        languages: Vec<String>,

        /// Output RDF/XML file (default: <input>_<langs>[_only].<ext>).
        #[arg(long, visible_alias = "output_filename")]
        output: Option<PathBuf>,

        /// Keep literals in other languages on retained concepts (default: true).
        #[arg(
            long,
            visible_alias = "keep_other_lang",
            num_args = 0..=1,
            default_missing_value = "true",
            value_parser = BoolishValueParser::new()
        )]
        keep_other_lang: Option<bool>,

        /// Input serialization: xml or ttl (default: xml).
        #[arg(long)]
        format: Option<RdfFormat>,

        /// Base IRI for relative IRIs in the input.
        #[arg(long)]
        base_iri: Option<String>,
    },

    /// Report the most common base IRI among the taxonomy's subjects.
    Urispace {
        /// Input taxonomy.
        #[arg(long)]
        input: PathBuf,

        /// Input serialization: rdf or ttl (default: rdf).
        #[arg(long)]
        format: Option<RdfFormat>,

        /// Base IRI for relative IRIs in the input.
        #[arg(long)]
        base_iri: Option<String>,
    },

    /// Write the lines that occur in only one of two files.
    Diff {
        /// First file.
        first: PathBuf,
        /// Second file.
        second: PathBuf,
        /// Where to write the differing lines.
        #[arg(long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = FilterConfig::load_optional(cli.config.as_deref())?;

    match cli.command {
        Commands::Hierarchy {
            input,
            top_concept,
            output,
            format,
            base_iri,
            schemes,
        } => {
            let top = rdf_io::parse_iri(&top_concept)?;
            let source = Source::new(&input, config.input_format(format))
                .with_base_iri(config.base_iri(base_iri.as_deref()).map(str::to_string));
            let output = output.unwrap_or_else(|| paths::hierarchy_output(&input));
            let filter = HierarchyFilter::new(Node::Iri(top))
                .with_schemes(config.scheme_retention(schemes));

            let report = run_filter(&source, &filter, &output)?;
            print_report(&report, cli.json)?;
        }

        Commands::Language {
            input,
            languages,
            output,
            keep_other_lang,
            format,
            base_iri,
        } => {
            let keep = config.keep_other_languages(keep_other_lang);
            let source = Source::new(&input, config.input_format(format))
                .with_base_iri(config.base_iri(base_iri.as_deref()).map(str::to_string));
            let output =
                output.unwrap_or_else(|| paths::language_output(&input, &languages, keep));
            let filter = LanguageFilter::new(LanguageSet::new(&languages)).keep_other_languages(keep);

            let report = run_filter(&source, &filter, &output)?;
            print_report(&report, cli.json)?;
        }

        Commands::Urispace {
            input,
            format,
            base_iri,
        } => {
            let graph = rdf_io::load_graph(
                &input,
                config.input_format(format),
                config.base_iri(base_iri.as_deref()),
            )?;
            let found = urispace::find_urispace(&graph, graph.namespaces());
            if cli.json {
                let json = serde_json::json!({ "urispace": found });
                println!("{}", serde_json::to_string_pretty(&json).into_diagnostic()?);
            } else {
                match found {
                    Some(base) => println!("Urispace found: {base}"),
                    None => println!("No urispace found."),
                }
            }
        }

        Commands::Diff {
            first,
            second,
            output,
        } => {
            let count = diff::write_unique_lines(&first, &second, &output)?;
            if cli.json {
                let json = serde_json::json!({ "output": output, "lines": count });
                println!("{}", serde_json::to_string_pretty(&json).into_diagnostic()?);
            } else {
                println!("Unique lines written to {} ({count})", output.display());
            }
        }
    }

    Ok(())
}

fn print_report(report: &RunReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report).into_diagnostic()?);
        return Ok(());
    }

    let pruned = &report.outcome.pruned;
    println!("saved file as {}", report.output.display());
    println!("  policy:    {}", report.outcome.policy);
    println!("  retained:  {} nodes", report.outcome.retained);
    println!(
        "  triples:   {} -> {} ({} removed)",
        pruned.triples_before,
        pruned.triples_after,
        pruned.removed()
    );
    println!("    unretained subject:  {}", pruned.unretained_subject);
    println!("    dangling hierarchy:  {}", pruned.dangling_hierarchy);
    println!("    foreign literal:     {}", pruned.foreign_literal);
    Ok(())
}
