//! Retention-set graph filtering.
//!
//! A filter run has three strictly ordered phases:
//!
//! 1. build a [`RetentionSet`] from seed nodes ([`retention`]), reading the graph only
//! 2. compute the list of triples that violate it ([`prune::removals`]), reading only
//! 3. remove those triples in one batch ([`prune::prune`])
//!
//! A [`RetentionPolicy`] decides the seeds, the relations followed, and the
//! pruning rules; [`hierarchy`] and [`language`] are the two policies shipped.

pub mod hierarchy;
pub mod language;
pub mod prune;
pub mod retention;

use std::collections::HashSet;

use serde::Serialize;

use crate::graph::{Node, SkosGraph, Term};

pub use hierarchy::{HierarchyFilter, SchemeRetention};
pub use language::{LanguageFilter, LanguageSet};
pub use prune::{PruneReport, PruneRules};
pub use retention::RetentionBuilder;

/// The nodes a filter run has decided to keep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetentionSet(HashSet<Node>);

impl RetentionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node. Returns `true` if it was not yet retained.
    pub fn insert(&mut self, node: Node) -> bool {
        self.0.insert(node)
    }

    pub fn contains(&self, node: &Node) -> bool {
        self.0.contains(node)
    }

    /// Whether an object-position term is a retained node. Literals never are.
    pub fn contains_term(&self, term: &Term) -> bool {
        term.as_node().is_some_and(|node| self.0.contains(node))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.0.iter()
    }
}

impl Extend<Node> for RetentionSet {
    fn extend<I: IntoIterator<Item = Node>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl FromIterator<Node> for RetentionSet {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A seed-selection and traversal strategy for the retention filter.
pub trait RetentionPolicy {
    /// Short name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Compute the nodes to keep. Must not mutate the graph.
    fn retention_set(&self, graph: &SkosGraph) -> RetentionSet;

    /// Rules the pruner applies against the finished retention set.
    fn prune_rules(&self) -> PruneRules;
}

/// Summary of one filter run.
#[derive(Debug, Clone, Serialize)]
pub struct FilterOutcome {
    pub policy: &'static str,
    /// Size of the retention set.
    pub retained: usize,
    pub pruned: PruneReport,
}

/// Run a policy over a graph, mutating it in place.
pub fn apply_policy<P: RetentionPolicy + ?Sized>(graph: &mut SkosGraph, policy: &P) -> FilterOutcome {
    let retained = policy.retention_set(graph);
    tracing::debug!(
        policy = policy.name(),
        retained = retained.len(),
        "retention set complete"
    );

    let pruned = prune::prune(graph, &retained, &policy.prune_rules());
    tracing::info!(
        policy = policy.name(),
        retained = retained.len(),
        removed = pruned.removed(),
        remaining = pruned.triples_after,
        "filter applied"
    );

    FilterOutcome {
        policy: policy.name(),
        retained: retained.len(),
        pruned,
    }
}
