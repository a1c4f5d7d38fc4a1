//! Hierarchy-by-top-concept policy.
//!
//! Keeps a designated top concept together with its ancestors, its
//! descendants, and (when the top node is used as a collection) every member
//! with the members' own ancestors and descendants, recursing into nested
//! collections.
//!
//! Collections linked to a kept concept through `skos:broader` are kept as
//! well, even though SKOS does not allow collections in the hierarchy.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::graph::{Node, SkosGraph, Term};
use crate::vocab::SkosVocab;

use super::{PruneRules, RetentionBuilder, RetentionPolicy, RetentionSet};

/// Which concept schemes survive a hierarchy filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemeRetention {
    /// Every node typed `skos:ConceptScheme`.
    #[default]
    All,
    /// Only schemes that a retained node points at with `skos:inScheme`.
    Referenced,
}

impl fmt::Display for SchemeRetention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Referenced => write!(f, "referenced"),
        }
    }
}

impl FromStr for SchemeRetention {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "referenced" => Ok(Self::Referenced),
            other => Err(format!(
                "unknown scheme retention \"{other}\" (expected \"all\" or \"referenced\")"
            )),
        }
    }
}

/// Filter a taxonomy down to the branch around one top concept.
#[derive(Debug, Clone)]
pub struct HierarchyFilter {
    top_concept: Node,
    schemes: SchemeRetention,
    vocab: SkosVocab,
}

impl HierarchyFilter {
    pub fn new(top_concept: Node) -> Self {
        Self {
            top_concept,
            schemes: SchemeRetention::default(),
            vocab: SkosVocab::new(),
        }
    }

    pub fn with_schemes(mut self, schemes: SchemeRetention) -> Self {
        self.schemes = schemes;
        self
    }

    pub fn top_concept(&self) -> &Node {
        &self.top_concept
    }

    fn scheme_nodes(&self, graph: &SkosGraph, retained: &RetentionSet) -> Vec<Node> {
        match self.schemes {
            SchemeRetention::All => {
                graph.subjects_of(&self.vocab.rdf_type, &self.vocab.concept_scheme)
            }
            SchemeRetention::Referenced => retained
                .iter()
                .flat_map(|node| graph.objects_of(node, &self.vocab.in_scheme))
                .filter_map(|term| match term {
                    Term::Node(node) => Some(node),
                    Term::Literal(_) => None,
                })
                .collect(),
        }
    }
}

impl RetentionPolicy for HierarchyFilter {
    fn name(&self) -> &'static str {
        "hierarchy"
    }

    fn retention_set(&self, graph: &SkosGraph) -> RetentionSet {
        let top = &self.top_concept;
        if !graph.has_node(top) {
            tracing::warn!(
                top_concept = %top,
                "top concept does not occur in the graph; nearly everything will be pruned"
            );
        }

        let mut builder = RetentionBuilder::new(graph, &self.vocab);
        builder
            .retain(top.clone())
            .collect_broader_closure(top)
            .collect_narrower_closure(top)
            .collect_collection_members(top);
        let mut retained = builder.finish();

        let schemes = self.scheme_nodes(graph, &retained);
        tracing::debug!(
            schemes = schemes.len(),
            mode = %self.schemes,
            "concept schemes retained"
        );
        retained.extend(schemes);
        retained
    }

    fn prune_rules(&self) -> PruneRules {
        PruneRules {
            hierarchical: self.vocab.hierarchical(),
            strip_literals_outside: None,
        }
    }
}
