//! URI-space detection: the most common base IRI among a taxonomy's subjects.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::graph::{Namespaces, SkosGraph};

/// Scheme and host followed by up to four path segments, ending at a slash.
static BASE_IRI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://[^/]+(?:/[^/]+){0,4}/)").expect("valid base IRI pattern")
});

/// Expand a `prefix:local` string against the namespace table.
///
/// Strings that already look absolute (contain `//`) or whose prefix is unknown
/// are returned unchanged.
pub fn expand_prefixed(uri: &str, namespaces: &Namespaces) -> String {
    if uri.contains("//") {
        return uri.to_string();
    }
    match uri.split_once(':') {
        Some((prefix, local)) => match namespaces.resolve(prefix) {
            Some(ns) => format!("{ns}{local}"),
            None => uri.to_string(),
        },
        None => uri.to_string(),
    }
}

/// Base IRI of a subject, if it has an http(s) scheme and at least one slash
/// after the host.
pub fn base_of(uri: &str) -> Option<&str> {
    BASE_IRI
        .captures(uri)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Most frequent base IRI over all subject occurrences (one per triple).
///
/// Ties go to the base seen first. Returns `None` when no subject has an
/// http(s) base.
pub fn find_urispace(graph: &SkosGraph, namespaces: &Namespaces) -> Option<String> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();

    for triple in graph.all_triples() {
        let Some(iri) = triple.subject.as_iri() else {
            continue;
        };
        let expanded = expand_prefixed(iri, namespaces);
        let Some(base) = base_of(&expanded) else {
            continue;
        };
        let count = counts.entry(base.to_string()).or_insert_with(|| {
            order.push(base.to_string());
            0
        });
        *count += 1;
    }

    let mut best: Option<(&String, usize)> = None;
    for base in &order {
        let count = counts[base];
        if best.is_none_or(|(_, top)| count > top) {
            best = Some((base, count));
        }
    }

    let found = best.map(|(base, _)| base.clone());
    match &found {
        Some(base) => tracing::info!(urispace = %base, "urispace found"),
        None => tracing::warn!("no http(s) subject found; urispace unknown"),
    }
    found
}
