//! Hierarchy-by-language policy.
//!
//! Keeps every concept that has a `skos:prefLabel` in one of the requested
//! languages, plus all of its ancestors. Descendants and collection members
//! are not pulled in: a concept without a label in the requested languages
//! survives only as the ancestor of one that has one.
//!
//! With `keep_other_languages` off, retained subjects also lose every
//! language-tagged literal outside the requested set. A retained ancestor that
//! never had a label in those languages then ends up with no label at all;
//! this is accepted.

use std::collections::BTreeSet;

use crate::graph::{Node, SkosGraph};
use crate::vocab::SkosVocab;

use super::{PruneRules, RetentionBuilder, RetentionPolicy, RetentionSet};

/// Requested language tags, compared case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageSet(BTreeSet<String>);

impl LanguageSet {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            tags.into_iter()
                .map(|t| t.as_ref().trim().to_ascii_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        )
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(&tag.to_ascii_lowercase())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Filter a taxonomy down to the concepts labelled in the requested languages.
#[derive(Debug, Clone)]
pub struct LanguageFilter {
    languages: LanguageSet,
    keep_other_languages: bool,
    vocab: SkosVocab,
}

impl LanguageFilter {
    /// Keep concepts labelled in `languages`; other-language literals are kept.
    pub fn new(languages: LanguageSet) -> Self {
        Self {
            languages,
            keep_other_languages: true,
            vocab: SkosVocab::new(),
        }
    }

    pub fn keep_other_languages(mut self, keep: bool) -> Self {
        self.keep_other_languages = keep;
        self
    }

    pub fn languages(&self) -> &LanguageSet {
        &self.languages
    }

    /// Every subject with a `prefLabel` in one of the requested languages.
    pub fn seeds(&self, graph: &SkosGraph) -> Vec<Node> {
        let mut seen = BTreeSet::new();
        graph
            .triples_for_predicate(&self.vocab.pref_label)
            .into_iter()
            .filter(|t| {
                t.object
                    .as_literal()
                    .and_then(|lit| lit.language())
                    .is_some_and(|lang| self.languages.contains(lang))
            })
            .filter_map(|t| seen.insert(t.subject.clone()).then_some(t.subject))
            .collect()
    }
}

impl RetentionPolicy for LanguageFilter {
    fn name(&self) -> &'static str {
        "language"
    }

    fn retention_set(&self, graph: &SkosGraph) -> RetentionSet {
        let seeds = self.seeds(graph);
        if seeds.is_empty() {
            tracing::warn!(
                languages = ?self.languages,
                "no concept has a prefLabel in the requested languages; output will be empty"
            );
        } else {
            tracing::debug!(seeds = seeds.len(), "language seeds selected");
        }

        let mut builder = RetentionBuilder::new(graph, &self.vocab);
        for seed in seeds {
            builder.retain(seed.clone()).collect_broader_closure(&seed);
        }
        builder.finish()
    }

    fn prune_rules(&self) -> PruneRules {
        PruneRules {
            hierarchical: self.vocab.hierarchical(),
            strip_literals_outside: (!self.keep_other_languages).then(|| self.languages.clone()),
        }
    }
}
