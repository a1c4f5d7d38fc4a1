//! Processing pipeline: load → filter → write, as one all-or-nothing run.
//!
//! The output file is only touched after the input parsed completely and the
//! filtered graph serialized without error.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::SkosResult;
use crate::filter::{FilterOutcome, RetentionPolicy, apply_policy};
use crate::rdf_io::{self, RdfFormat};

/// Where and how to read the input graph.
#[derive(Debug, Clone)]
pub struct Source {
    pub path: PathBuf,
    pub format: RdfFormat,
    pub base_iri: Option<String>,
}

impl Source {
    pub fn new(path: impl Into<PathBuf>, format: RdfFormat) -> Self {
        Self {
            path: path.into(),
            format,
            base_iri: None,
        }
    }

    pub fn with_base_iri(mut self, base_iri: Option<String>) -> Self {
        self.base_iri = base_iri;
        self
    }
}

/// Summary of a completed filter run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub input: PathBuf,
    pub output: PathBuf,
    #[serde(flatten)]
    pub outcome: FilterOutcome,
}

/// Load `source`, apply `policy`, and write the result to `output` as RDF/XML.
pub fn run_filter<P: RetentionPolicy + ?Sized>(
    source: &Source,
    policy: &P,
    output: &Path,
) -> SkosResult<RunReport> {
    let mut graph = rdf_io::load_graph(&source.path, source.format, source.base_iri.as_deref())?;
    let outcome = apply_policy(&mut graph, policy);
    rdf_io::write_rdfxml(&graph, output)?;

    Ok(RunReport {
        input: source.path.clone(),
        output: output.to_path_buf(),
        outcome,
    })
}
