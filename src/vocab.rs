//! Well-known SKOS and RDF terms used by the filters.

use crate::graph::{Iri, Node};

pub const SKOS_NS: &str = "http://www.w3.org/2004/02/skos/core#";
pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
pub const RDF_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";

/// The SKOS relations and classes the retention rules look at, resolved once
/// per run.
#[derive(Debug, Clone)]
pub struct SkosVocab {
    // Relations
    pub broader: Iri,
    pub narrower: Iri,
    pub member: Iri,
    pub in_scheme: Iri,
    pub pref_label: Iri,
    pub rdf_type: Iri,

    // Classes
    pub collection: Node,
    pub concept_scheme: Node,
}

impl SkosVocab {
    pub fn new() -> Self {
        let skos = |local: &str| format!("{SKOS_NS}{local}");
        Self {
            broader: Iri::new(skos("broader")),
            narrower: Iri::new(skos("narrower")),
            member: Iri::new(skos("member")),
            in_scheme: Iri::new(skos("inScheme")),
            pref_label: Iri::new(skos("prefLabel")),
            rdf_type: Iri::new(format!("{RDF_NS}type")),
            collection: Node::iri(skos("Collection")),
            concept_scheme: Node::iri(skos("ConceptScheme")),
        }
    }

    /// Predicates whose object must also be retained for the triple to survive.
    pub fn hierarchical(&self) -> Vec<Iri> {
        vec![self.broader.clone(), self.narrower.clone()]
    }
}

impl Default for SkosVocab {
    fn default() -> Self {
        Self::new()
    }
}
