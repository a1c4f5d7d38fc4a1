// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # skos-prune
//!
//! Retention-set filters for SKOS taxonomies encoded as RDF.
//!
//! ## Architecture
//!
//! - **Graph** (`graph`): in-memory triple set, dual-indexed with `petgraph`
//! - **Filters** (`filter`): retention-set builder, triple pruner, and the
//!   top-concept and language policies
//! - **RDF I/O** (`rdf_io`): RDF/XML and Turtle via `oxigraph`
//! - **Utilities** (`urispace`, `diff`): URI-space detection and line diffing
//!
//! ## Library usage
//!
//! ```no_run
//! use std::path::Path;
//! use skos_prune::filter::{HierarchyFilter, apply_policy};
//! use skos_prune::graph::Node;
//! use skos_prune::rdf_io::{self, RdfFormat};
//!
//! let mut graph = rdf_io::load_graph(Path::new("thesaurus.rdf"), RdfFormat::RdfXml, None).unwrap();
//! let filter = HierarchyFilter::new(Node::iri("http://example.org/concept/animals"));
//! apply_policy(&mut graph, &filter);
//! rdf_io::write_rdfxml(&graph, Path::new("animals.rdf")).unwrap();
//! ```

pub mod config;
pub mod diff;
pub mod error;
pub mod filter;
pub mod graph;
pub mod paths;
pub mod pipeline;
pub mod rdf_io;
pub mod urispace;
pub mod vocab;
