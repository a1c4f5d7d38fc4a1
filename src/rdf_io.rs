//! RDF/XML and Turtle I/O backed by oxigraph.
//!
//! Parsing is all-or-nothing: the first syntax error aborts the load and no
//! partial graph is returned. Serialization goes to an in-memory buffer first,
//! so a failed run never leaves a truncated output file behind.

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use oxigraph::io::{RdfFormat as OxFormat, RdfParser, RdfSerializer};
use oxigraph::model::{
    BlankNode, Literal as OxLiteral, NamedNode, Term as OxTerm, Triple as OxTriple,
};
use serde::Deserialize;

use crate::error::{RdfError, SkosError, SkosResult};
use crate::graph::{Iri, Literal, Node, SkosGraph, Term, Triple};
use crate::vocab::{RDF_LANG_STRING, RDF_NS, SKOS_NS, XSD_STRING};

/// Serializations accepted on input. Output is always RDF/XML.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum RdfFormat {
    #[default]
    RdfXml,
    Turtle,
}

impl RdfFormat {
    fn to_oxigraph(self) -> OxFormat {
        match self {
            Self::RdfXml => OxFormat::RdfXml,
            Self::Turtle => OxFormat::Turtle,
        }
    }
}

impl fmt::Display for RdfFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RdfXml => write!(f, "RDF/XML"),
            Self::Turtle => write!(f, "Turtle"),
        }
    }
}

impl FromStr for RdfFormat {
    type Err = RdfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xml" | "rdf" | "rdfxml" | "rdf/xml" | "rdf-xml" | "application/rdf+xml" => {
                Ok(Self::RdfXml)
            }
            "ttl" | "turtle" | "text/turtle" => Ok(Self::Turtle),
            _ => Err(RdfError::UnsupportedFormat {
                format: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for RdfFormat {
    type Error = RdfError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Validate an IRI given on the command line or in config.
pub fn parse_iri(iri: &str) -> Result<Iri, RdfError> {
    NamedNode::new(iri)
        .map(|n| Iri::new(n.into_string()))
        .map_err(|e| RdfError::InvalidIri {
            iri: iri.to_string(),
            message: e.to_string(),
        })
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse a whole document into a graph, recording its prefix declarations.
///
/// `source` names the document in error messages.
pub fn parse_graph<R: Read>(
    reader: R,
    format: RdfFormat,
    base_iri: Option<&str>,
    source: &str,
) -> Result<SkosGraph, RdfError> {
    let mut parser = RdfParser::from_format(format.to_oxigraph());
    if let Some(base) = base_iri {
        parser = parser
            .with_base_iri(base)
            .map_err(|e| RdfError::InvalidIri {
                iri: base.to_string(),
                message: e.to_string(),
            })?;
    }

    let mut graph = SkosGraph::new();
    let mut quads = parser.for_reader(reader);
    while let Some(quad) = quads.next() {
        let quad = quad.map_err(|e| RdfError::Parse {
            path: source.to_string(),
            format: format.to_string(),
            message: e.to_string(),
        })?;

        let subject = from_oxigraph_term(OxTerm::from(quad.subject)).and_then(|t| match t {
            Term::Node(node) => Some(node),
            Term::Literal(_) => None,
        });
        let object = from_oxigraph_term(quad.object);
        match (subject, object) {
            (Some(subject), Some(object)) => {
                let predicate = Iri::new(quad.predicate.into_string());
                graph.insert(&Triple::new(subject, predicate, object));
            }
            _ => tracing::debug!(source, "skipping statement with a quoted triple"),
        }

        let namespaces = graph.namespaces_mut();
        for (prefix, ns) in quads.prefixes() {
            if namespaces.resolve(prefix).is_none() {
                namespaces.bind(prefix, ns);
            }
        }
    }

    Ok(graph)
}

/// Load a graph from a file in the given format.
pub fn load_graph(path: &Path, format: RdfFormat, base_iri: Option<&str>) -> SkosResult<SkosGraph> {
    let file = File::open(path).map_err(|e| SkosError::io(path, e))?;
    let graph = parse_graph(
        BufReader::new(file),
        format,
        base_iri,
        &path.display().to_string(),
    )?;
    tracing::info!(
        input = %path.display(),
        %format,
        triples = graph.len(),
        prefixes = graph.namespaces().len(),
        "graph loaded"
    );
    Ok(graph)
}

fn from_oxigraph_term(term: OxTerm) -> Option<Term> {
    match term {
        OxTerm::NamedNode(n) => Some(Term::Node(Node::Iri(Iri::new(n.into_string())))),
        OxTerm::BlankNode(b) => Some(Term::Node(Node::Blank(b.as_str().to_string()))),
        OxTerm::Literal(l) => Some(Term::Literal(from_oxigraph_literal(&l))),
        #[allow(unreachable_patterns)]
        _ => None,
    }
}

fn from_oxigraph_literal(lit: &OxLiteral) -> Literal {
    if let Some(lang) = lit.language() {
        return Literal::lang(lit.value(), lang);
    }
    match lit.datatype().as_str() {
        XSD_STRING => Literal::simple(lit.value()),
        datatype => Literal::typed(lit.value(), Iri::new(datatype)),
    }
}

// ---------------------------------------------------------------------------
// Serialization
// ---------------------------------------------------------------------------

fn named_node(iri: &Iri) -> Result<NamedNode, RdfError> {
    NamedNode::new(iri.as_str()).map_err(|e| RdfError::InvalidIri {
        iri: iri.as_str().to_string(),
        message: e.to_string(),
    })
}

fn blank_node(id: &str) -> Result<BlankNode, RdfError> {
    BlankNode::new(id).map_err(|e| RdfError::Serialize {
        message: format!("invalid blank node id _:{id}: {e}"),
    })
}

fn to_oxigraph_term(term: &Term) -> Result<OxTerm, RdfError> {
    Ok(match term {
        Term::Node(Node::Iri(iri)) => named_node(iri)?.into(),
        Term::Node(Node::Blank(id)) => blank_node(id)?.into(),
        Term::Literal(lit) => to_oxigraph_literal(lit)?.into(),
    })
}

fn to_oxigraph_literal(lit: &Literal) -> Result<OxLiteral, RdfError> {
    if let Some(lang) = lit.language() {
        return OxLiteral::new_language_tagged_literal(lit.value(), lang).map_err(|e| {
            RdfError::InvalidLiteral {
                value: lit.value().to_string(),
                message: e.to_string(),
            }
        });
    }
    Ok(match lit.datatype() {
        Some(dt) if dt.as_str() != RDF_LANG_STRING => {
            OxLiteral::new_typed_literal(lit.value(), named_node(dt)?)
        }
        _ => OxLiteral::new_simple_literal(lit.value()),
    })
}

/// XML namespace prefixes must be NCNames; anything else is left undeclared.
fn is_xml_prefix(prefix: &str) -> bool {
    let mut chars = prefix.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        && !prefix.to_ascii_lowercase().starts_with("xml")
}

/// Serialize a graph as RDF/XML into memory.
///
/// Triples are grouped by subject, subjects in order of first appearance.
pub fn serialize_rdfxml(graph: &SkosGraph) -> Result<Vec<u8>, RdfError> {
    let mut serializer = RdfSerializer::from_format(OxFormat::RdfXml);
    let mut declared = vec![("skos", SKOS_NS)];
    declared.extend(graph.namespaces().iter());
    let mut bound: Vec<&str> = Vec::new();
    for (prefix, ns) in declared {
        if prefix == "rdf" || ns == RDF_NS || !is_xml_prefix(prefix) || bound.contains(&prefix) {
            continue;
        }
        if NamedNode::new(ns).is_err() {
            tracing::debug!(prefix, namespace = ns, "skipping prefix with invalid namespace IRI");
            continue;
        }
        serializer = serializer
            .with_prefix(prefix, ns)
            .map_err(|e| RdfError::Serialize {
                message: format!("prefix {prefix}: {e}"),
            })?;
        bound.push(prefix);
    }

    let mut triples = graph.all_triples();
    let mut first_seen: HashMap<Node, usize> = HashMap::new();
    for (i, t) in triples.iter().enumerate() {
        first_seen.entry(t.subject.clone()).or_insert(i);
    }
    triples.sort_by_key(|t| first_seen.get(&t.subject).copied().unwrap_or(usize::MAX));

    let mut writer = serializer.for_writer(Vec::new());
    for triple in &triples {
        let predicate = named_node(&triple.predicate)?;
        let object = to_oxigraph_term(&triple.object)?;
        let written = match &triple.subject {
            Node::Iri(iri) => {
                writer.serialize_triple(&OxTriple::new(named_node(iri)?, predicate, object))
            }
            Node::Blank(id) => {
                writer.serialize_triple(&OxTriple::new(blank_node(id)?, predicate, object))
            }
        };
        written.map_err(|e| RdfError::Serialize {
            message: format!("{triple}: {e}"),
        })?;
    }

    writer.finish().map_err(|e| RdfError::Serialize {
        message: e.to_string(),
    })
}

/// Serialize a graph as RDF/XML and write it to `path`.
pub fn write_rdfxml(graph: &SkosGraph, path: &Path) -> SkosResult<()> {
    let bytes = serialize_rdfxml(graph)?;
    std::fs::write(path, &bytes).map_err(|e| SkosError::io(path, e))?;
    tracing::info!(
        output = %path.display(),
        triples = graph.len(),
        bytes = bytes.len(),
        "graph written"
    );
    Ok(())
}
