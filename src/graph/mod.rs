//! SKOS graph: the triple data model and its in-memory index.
//!
//! The graph stores RDF triples (subject, predicate, object) over opaque IRIs,
//! blank nodes, and literals.
//!
//! - **Data model** ([`Node`], [`Term`], [`Literal`], [`Triple`]): owned, hashable values
//! - **Index** ([`SkosGraph`]): `petgraph` structure with term and predicate lookups
//! - **Namespaces** ([`Namespaces`]): the prefix table read from the source document

pub mod index;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub use index::SkosGraph;

/// A full IRI. Treated as an opaque identifier; validation happens at the
/// parse and CLI boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Iri(String);

impl Iri {
    pub fn new(iri: impl Into<String>) -> Self {
        Self(iri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

impl From<&str> for Iri {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A resource that can stand in subject position: an IRI or a blank node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Node {
    Iri(Iri),
    /// Blank node, identified by its document-local id.
    Blank(String),
}

impl Node {
    /// Shorthand for an IRI node.
    pub fn iri(iri: impl Into<String>) -> Self {
        Self::Iri(Iri::new(iri))
    }

    pub fn blank(id: impl Into<String>) -> Self {
        Self::Blank(id.into())
    }

    /// The IRI string, if this node is named.
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Self::Iri(iri) => Some(iri.as_str()),
            Self::Blank(_) => None,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iri(iri) => write!(f, "{iri}"),
            Self::Blank(id) => write!(f, "_:{id}"),
        }
    }
}

/// A literal value with an optional language tag or datatype.
///
/// Language tags are stored lowercased so that `EN` and `en` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Literal {
    value: String,
    language: Option<String>,
    datatype: Option<Iri>,
}

impl Literal {
    /// A plain string literal.
    pub fn simple(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            language: None,
            datatype: None,
        }
    }

    /// A language-tagged string (`"chat"@fr`).
    pub fn lang(value: impl Into<String>, language: impl AsRef<str>) -> Self {
        Self {
            value: value.into(),
            language: Some(language.as_ref().to_ascii_lowercase()),
            datatype: None,
        }
    }

    /// A typed literal (`"3"^^xsd:integer`).
    pub fn typed(value: impl Into<String>, datatype: Iri) -> Self {
        Self {
            value: value.into(),
            language: None,
            datatype: Some(datatype),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn datatype(&self) -> Option<&Iri> {
        self.datatype.as_ref()
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.value)?;
        if let Some(lang) = &self.language {
            write!(f, "@{lang}")
        } else if let Some(dt) = &self.datatype {
            write!(f, "^^{dt}")
        } else {
            Ok(())
        }
    }
}

/// Anything that can stand in object position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Term {
    Node(Node),
    Literal(Literal),
}

impl Term {
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Self::Node(node) => Some(node),
            Self::Literal(_) => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Self::Literal(lit) => Some(lit),
            Self::Node(_) => None,
        }
    }
}

impl From<Node> for Term {
    fn from(node: Node) -> Self {
        Self::Node(node)
    }
}

impl From<Literal> for Term {
    fn from(lit: Literal) -> Self {
        Self::Literal(lit)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(node) => write!(f, "{node}"),
            Self::Literal(lit) => write!(f, "{lit}"),
        }
    }
}

/// A triple (subject, predicate, object) in the SKOS graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub subject: Node,
    pub predicate: Iri,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: Node, predicate: Iri, object: impl Into<Term>) -> Self {
        Self {
            subject,
            predicate,
            object: object.into(),
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}

/// Prefix → namespace IRI table, as declared by the source document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Namespaces(BTreeMap<String, String>);

impl Namespaces {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a prefix. An existing binding for the same prefix is kept.
    pub fn bind(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.0.entry(prefix.into()).or_insert_with(|| namespace.into());
    }

    /// Namespace IRI bound to `prefix`.
    pub fn resolve(&self, prefix: &str) -> Option<&str> {
        self.0.get(prefix).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(p, ns)| (p.as_str(), ns.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
