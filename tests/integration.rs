//! End-to-end tests for the skos-prune filters.
//!
//! These tests exercise the full pipeline: parse a taxonomy from disk, build the
//! retention set, prune, serialize RDF/XML, and parse the output back.

use std::path::Path;

use skos_prune::error::{RdfError, SkosError};
use skos_prune::filter::{
    HierarchyFilter, LanguageFilter, LanguageSet, RetentionPolicy, SchemeRetention,
};
use skos_prune::graph::{Iri, Literal, Node, SkosGraph, Term, Triple};
use skos_prune::pipeline::{Source, run_filter};
use skos_prune::rdf_io::{self, RdfFormat};
use skos_prune::vocab::SKOS_NS;

const TAXONOMY: &str = r#"
@prefix skos: <http://www.w3.org/2004/02/skos/core#> .
@prefix ex: <http://ex.org/thes/> .

ex:scheme a skos:ConceptScheme ;
    skos:prefLabel "Animals"@en .
ex:other-scheme a skos:ConceptScheme .

ex:animal a skos:Concept ;
    skos:prefLabel "animal"@en, "Tier"@de ;
    skos:inScheme ex:scheme ;
    skos:narrower ex:mammal, ex:bird .

ex:mammal a skos:Concept ;
    skos:prefLabel "mammal"@en, "Säugetier"@de ;
    skos:broader ex:animal ;
    skos:narrower ex:cat ;
    skos:inScheme ex:scheme .

ex:cat a skos:Concept ;
    skos:prefLabel "Katze"@de ;
    skos:definition "a small feline"@en ;
    skos:broader ex:mammal ;
    skos:inScheme ex:scheme .

ex:bird a skos:Concept ;
    skos:prefLabel "Vogel"@de ;
    skos:broader ex:animal ;
    skos:inScheme ex:scheme .

ex:pets a skos:Collection ;
    skos:prefLabel "pets"@en ;
    skos:member ex:cat, ex:fish-group .

ex:fish-group a skos:Collection ;
    skos:member ex:goldfish .

ex:goldfish a skos:Concept ;
    skos:prefLabel "goldfish"@en ;
    skos:broader ex:fish .

ex:fish a skos:Concept ;
    skos:prefLabel "Fisch"@de ;
    skos:broader ex:vertebrate .

ex:vertebrate a skos:Concept ;
    skos:prefLabel "vertebrate"@en .
"#;

fn ex(local: &str) -> Node {
    Node::iri(format!("http://ex.org/thes/{local}"))
}

fn skos(local: &str) -> Iri {
    Iri::new(format!("{SKOS_NS}{local}"))
}

fn write_taxonomy(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("animals.ttl");
    std::fs::write(&path, TAXONOMY).unwrap();
    path
}

fn reload(path: &Path) -> SkosGraph {
    rdf_io::load_graph(path, RdfFormat::RdfXml, None).unwrap()
}

fn subjects(graph: &SkosGraph) -> Vec<String> {
    let mut names: Vec<String> = graph
        .subjects()
        .into_iter()
        .filter_map(|n| n.as_iri().map(|s| s.trim_start_matches("http://ex.org/thes/").to_string()))
        .collect();
    names.sort();
    names
}

#[test]
fn hierarchy_filter_end_to_end() {
    let dir = tempfile::TempDir::new().unwrap();
    let input = write_taxonomy(dir.path());
    let output = dir.path().join("mammals.rdf");

    let source = Source::new(&input, RdfFormat::Turtle);
    let report = run_filter(&source, &HierarchyFilter::new(ex("mammal")), &output).unwrap();
    assert!(report.outcome.pruned.removed() > 0);

    let graph = reload(&output);
    assert_eq!(
        subjects(&graph),
        vec!["animal", "cat", "mammal", "other-scheme", "scheme"]
    );

    // animal keeps its narrower link to mammal but loses the one to bird
    assert!(graph.has_edge(&ex("animal"), &skos("narrower"), &ex("mammal")));
    assert!(!graph.has_edge(&ex("animal"), &skos("narrower"), &ex("bird")));
    assert!(graph.has_edge(&ex("cat"), &skos("broader"), &ex("mammal")));
    assert!(!graph.has_node(&ex("pets")));
}

#[test]
fn hierarchy_filter_on_collection_pulls_in_nested_members() {
    let dir = tempfile::TempDir::new().unwrap();
    let input = write_taxonomy(dir.path());
    let output = dir.path().join("pets.rdf");

    let filter = HierarchyFilter::new(ex("pets")).with_schemes(SchemeRetention::Referenced);
    run_filter(&Source::new(&input, RdfFormat::Turtle), &filter, &output).unwrap();

    let graph = reload(&output);
    assert_eq!(
        subjects(&graph),
        vec![
            "animal",
            "cat",
            "fish",
            "fish-group",
            "goldfish",
            "mammal",
            "pets",
            "scheme",
            "vertebrate"
        ]
    );
    // cat's ancestry comes along, but its siblings do not
    assert!(graph.has_edge(&ex("animal"), &skos("narrower"), &ex("mammal")));
    assert!(!graph.has_node(&ex("bird")));
    assert!(!graph.has_node(&ex("other-scheme")));
}

#[test]
fn language_filter_end_to_end() {
    let dir = tempfile::TempDir::new().unwrap();
    let input = write_taxonomy(dir.path());
    let output = dir.path().join("english.rdf");

    let filter = LanguageFilter::new(LanguageSet::new(["en"])).keep_other_languages(false);
    run_filter(&Source::new(&input, RdfFormat::Turtle), &filter, &output).unwrap();

    let graph = reload(&output);
    // cat and bird have no English prefLabel and nothing pulls them in;
    // cat is still named as a member of pets
    assert!(graph.triples_from(&ex("cat")).is_empty());
    assert!(graph.has_edge(&ex("pets"), &skos("member"), &ex("cat")));
    assert!(!graph.has_node(&ex("bird")));
    // fish is the ancestor of goldfish and survives without any label
    assert!(graph.has_edge(&ex("goldfish"), &skos("broader"), &ex("fish")));
    assert!(graph.objects_of(&ex("fish"), &skos("prefLabel")).is_empty());

    let mammal_labels = graph.objects_of(&ex("mammal"), &skos("prefLabel"));
    assert_eq!(
        mammal_labels,
        vec![Term::Literal(Literal::lang("mammal", "en"))]
    );
}

#[test]
fn language_filter_keeps_other_literals_by_default() {
    let dir = tempfile::TempDir::new().unwrap();
    let input = write_taxonomy(dir.path());
    let output = dir.path().join("english.rdf");

    let filter = LanguageFilter::new(LanguageSet::new(["en"]));
    run_filter(&Source::new(&input, RdfFormat::Turtle), &filter, &output).unwrap();

    let graph = reload(&output);
    assert!(graph.contains(&Triple::new(
        ex("mammal"),
        skos("prefLabel"),
        Literal::lang("Säugetier", "de"),
    )));
}

#[test]
fn cyclic_taxonomy_terminates() {
    let dir = tempfile::TempDir::new().unwrap();
    let input = dir.path().join("cycle.ttl");
    std::fs::write(
        &input,
        r#"
@prefix skos: <http://www.w3.org/2004/02/skos/core#> .
@prefix ex: <http://ex.org/thes/> .
ex:a skos:broader ex:b .
ex:b skos:broader ex:c .
ex:c skos:broader ex:a .
ex:d skos:broader ex:e .
"#,
    )
    .unwrap();

    let graph = rdf_io::load_graph(&input, RdfFormat::Turtle, None).unwrap();
    let set = HierarchyFilter::new(ex("a")).retention_set(&graph);
    assert_eq!(set.len(), 3);
    for name in ["a", "b", "c"] {
        assert!(set.contains(&ex(name)));
    }
}

#[test]
fn filtering_output_again_changes_nothing() {
    let dir = tempfile::TempDir::new().unwrap();
    let input = write_taxonomy(dir.path());
    let first = dir.path().join("first.rdf");
    let second = dir.path().join("second.rdf");

    let filter = HierarchyFilter::new(ex("mammal"));
    run_filter(&Source::new(&input, RdfFormat::Turtle), &filter, &first).unwrap();
    let report = run_filter(&Source::new(&first, RdfFormat::RdfXml), &filter, &second).unwrap();

    assert_eq!(report.outcome.pruned.removed(), 0);
    assert_eq!(reload(&first).len(), reload(&second).len());
}

#[test]
fn parse_failure_writes_nothing() {
    let dir = tempfile::TempDir::new().unwrap();
    let input = dir.path().join("broken.rdf");
    let output = dir.path().join("out.rdf");
    std::fs::write(
        &input,
        r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
  <rdf:Description rdf:about="http://ex.org/a">
    <undeclared:label>a</undeclared:label>
  </rdf:Description>
</rdf:RDF>"#,
    )
    .unwrap();

    let err = run_filter(
        &Source::new(&input, RdfFormat::RdfXml),
        &HierarchyFilter::new(ex("a")),
        &output,
    )
    .unwrap_err();
    assert!(matches!(err, SkosError::Rdf(RdfError::Parse { .. })));
    assert!(!output.exists());
}

#[test]
fn broken_turtle_fails_before_output() {
    let dir = tempfile::TempDir::new().unwrap();
    let input = dir.path().join("broken.ttl");
    let output = dir.path().join("out.rdf");
    std::fs::write(&input, "ex:a skos:broader .\n").unwrap();

    let err = run_filter(
        &Source::new(&input, RdfFormat::Turtle),
        &LanguageFilter::new(LanguageSet::new(["en"])),
        &output,
    )
    .unwrap_err();
    assert!(matches!(err, SkosError::Rdf(RdfError::Parse { .. })));
    assert!(!output.exists());
}

#[test]
fn unsupported_format_name_is_rejected() {
    let err = "n3".parse::<RdfFormat>().unwrap_err();
    assert!(matches!(err, RdfError::UnsupportedFormat { .. }));
    assert_eq!("ttl".parse::<RdfFormat>().unwrap(), RdfFormat::Turtle);
}

#[test]
fn missing_input_is_io_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let err = run_filter(
        &Source::new(dir.path().join("absent.rdf"), RdfFormat::RdfXml),
        &HierarchyFilter::new(ex("a")),
        &dir.path().join("out.rdf"),
    )
    .unwrap_err();
    assert!(matches!(err, SkosError::Io { .. }));
}

#[test]
fn missing_top_concept_yields_schemes_only() {
    let dir = tempfile::TempDir::new().unwrap();
    let input = write_taxonomy(dir.path());
    let output = dir.path().join("ghost.rdf");

    run_filter(
        &Source::new(&input, RdfFormat::Turtle),
        &HierarchyFilter::new(ex("ghost")),
        &output,
    )
    .unwrap();

    let graph = reload(&output);
    assert_eq!(subjects(&graph), vec!["other-scheme", "scheme"]);
}
