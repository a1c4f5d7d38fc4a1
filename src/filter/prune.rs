//! Triple pruning against a finished retention set.
//!
//! The removal list is computed from a snapshot before anything is removed, so
//! whether a triple survives never depends on iteration order.

use serde::Serialize;

use crate::graph::{Iri, SkosGraph, Triple};

use super::{LanguageSet, RetentionSet};

/// What the pruner removes besides triples with an unretained subject.
#[derive(Debug, Clone, Default)]
pub struct PruneRules {
    /// Predicates whose object must also be retained (`broader`, `narrower`).
    pub hierarchical: Vec<Iri>,
    /// When set, language-tagged literals outside this set are stripped from
    /// retained subjects.
    pub strip_literals_outside: Option<LanguageSet>,
}

/// Why a triple was removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalReason {
    /// The subject is not retained.
    UnretainedSubject,
    /// A hierarchical link points at a node that is not retained.
    DanglingHierarchy,
    /// A language-tagged literal outside the requested languages.
    ForeignLiteral,
}

/// Counts from one pruning pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PruneReport {
    pub triples_before: usize,
    pub triples_after: usize,
    pub unretained_subject: usize,
    pub dangling_hierarchy: usize,
    pub foreign_literal: usize,
}

impl PruneReport {
    /// Total triples removed.
    pub fn removed(&self) -> usize {
        self.unretained_subject + self.dangling_hierarchy + self.foreign_literal
    }

    fn count(&mut self, reason: RemovalReason) {
        match reason {
            RemovalReason::UnretainedSubject => self.unretained_subject += 1,
            RemovalReason::DanglingHierarchy => self.dangling_hierarchy += 1,
            RemovalReason::ForeignLiteral => self.foreign_literal += 1,
        }
    }
}

/// Decide whether a single triple violates the retention rules.
pub fn violation(triple: &Triple, retained: &RetentionSet, rules: &PruneRules) -> Option<RemovalReason> {
    if !retained.contains(&triple.subject) {
        return Some(RemovalReason::UnretainedSubject);
    }
    if rules.hierarchical.contains(&triple.predicate) && !retained.contains_term(&triple.object) {
        return Some(RemovalReason::DanglingHierarchy);
    }
    if let Some(languages) = &rules.strip_literals_outside {
        let foreign = triple
            .object
            .as_literal()
            .and_then(|lit| lit.language())
            .is_some_and(|lang| !languages.contains(lang));
        if foreign {
            return Some(RemovalReason::ForeignLiteral);
        }
    }
    None
}

/// Every triple that violates the rules, with the reason. Read-only.
pub fn removals(
    graph: &SkosGraph,
    retained: &RetentionSet,
    rules: &PruneRules,
) -> Vec<(Triple, RemovalReason)> {
    graph
        .all_triples()
        .into_iter()
        .filter_map(|triple| {
            let reason = violation(&triple, retained, rules)?;
            Some((triple, reason))
        })
        .collect()
}

/// Remove every violating triple from `graph` in one batch.
pub fn prune(graph: &mut SkosGraph, retained: &RetentionSet, rules: &PruneRules) -> PruneReport {
    let mut report = PruneReport {
        triples_before: graph.len(),
        ..Default::default()
    };

    let doomed = removals(graph, retained, rules);
    tracing::debug!(candidates = doomed.len(), "removal list computed");

    for (triple, reason) in &doomed {
        if graph.remove(triple) {
            report.count(*reason);
        }
    }

    report.triples_after = graph.len();
    report
}
