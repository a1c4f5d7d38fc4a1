//! Retention-set construction by relation-following to a fixed point.
//!
//! Walks `skos:broader` upward and downward and `skos:member` into nested
//! collections with explicit worklists, so deep or cyclic hierarchies neither
//! overflow the stack nor loop.

use std::collections::HashSet;

use crate::graph::{Node, SkosGraph};
use crate::vocab::SkosVocab;

use super::RetentionSet;

/// Accumulates a [`RetentionSet`] over a borrowed graph.
///
/// Each direction remembers which nodes it has already expanded during this
/// build. A node whose ancestors were collected once never needs its ancestors
/// collected again, so the set reaches the same fixed point regardless of the
/// order the rules are applied in.
pub struct RetentionBuilder<'g> {
    graph: &'g SkosGraph,
    vocab: &'g SkosVocab,
    retained: RetentionSet,
    ascended: HashSet<Node>,
    descended: HashSet<Node>,
    opened_collections: HashSet<Node>,
}

impl<'g> RetentionBuilder<'g> {
    pub fn new(graph: &'g SkosGraph, vocab: &'g SkosVocab) -> Self {
        Self {
            graph,
            vocab,
            retained: RetentionSet::new(),
            ascended: HashSet::new(),
            descended: HashSet::new(),
            opened_collections: HashSet::new(),
        }
    }

    /// Retain a node without following any relation from it.
    pub fn retain(&mut self, node: Node) -> &mut Self {
        self.retained.insert(node);
        self
    }

    /// Retain every transitive `broader` target of `node`.
    pub fn collect_broader_closure(&mut self, node: &Node) -> &mut Self {
        if !self.ascended.insert(node.clone()) {
            return self;
        }
        let mut stack = vec![node.clone()];
        while let Some(current) = stack.pop() {
            for parent in self.graph.objects_of(&current, &self.vocab.broader) {
                let Some(parent) = parent.as_node() else {
                    continue;
                };
                self.retained.insert(parent.clone());
                if self.ascended.insert(parent.clone()) {
                    stack.push(parent.clone());
                }
            }
        }
        self
    }

    /// Retain every node that reaches `node` through a chain of `broader` edges.
    pub fn collect_narrower_closure(&mut self, node: &Node) -> &mut Self {
        if !self.descended.insert(node.clone()) {
            return self;
        }
        let mut stack = vec![node.clone()];
        while let Some(current) = stack.pop() {
            for child in self.graph.subjects_of(&self.vocab.broader, &current) {
                self.retained.insert(child.clone());
                if self.descended.insert(child.clone()) {
                    stack.push(child);
                }
            }
        }
        self
    }

    /// Retain the members of `collection` together with their ancestors and
    /// descendants, descending into members typed `skos:Collection`.
    pub fn collect_collection_members(&mut self, collection: &Node) -> &mut Self {
        if !self.opened_collections.insert(collection.clone()) {
            return self;
        }
        let mut pending = vec![collection.clone()];
        while let Some(current) = pending.pop() {
            for member in self.graph.objects_of(&current, &self.vocab.member) {
                let Some(member) = member.as_node() else {
                    continue;
                };
                self.retained.insert(member.clone());
                self.collect_narrower_closure(member);
                self.collect_broader_closure(member);

                let is_collection =
                    self.graph
                        .has_edge(member, &self.vocab.rdf_type, &self.vocab.collection);
                if is_collection && self.opened_collections.insert(member.clone()) {
                    pending.push(member.clone());
                }
            }
        }
        self
    }

    /// Borrow the set accumulated so far.
    pub fn retained(&self) -> &RetentionSet {
        &self.retained
    }

    pub fn finish(self) -> RetentionSet {
        self.retained
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::fixtures::*;

    #[test]
    fn broader_closure_follows_ancestors_only() {
        // x -> y -> z, w -> y
        let g = graph(vec![
            broader("x", "y"),
            broader("y", "z"),
            broader("w", "y"),
        ]);
        let vocab = SkosVocab::new();
        let mut b = RetentionBuilder::new(&g, &vocab);
        b.collect_broader_closure(&c("x"));
        let set = b.finish();

        assert_eq!(set.len(), 2);
        assert!(set.contains(&c("y")));
        assert!(set.contains(&c("z")));
        assert!(!set.contains(&c("x")), "start node is not added by the closure");
        assert!(!set.contains(&c("w")));
    }

    #[test]
    fn narrower_closure_follows_descendants_only() {
        let g = graph(vec![
            broader("x", "y"),
            broader("y", "z"),
            broader("z", "top"),
        ]);
        let vocab = SkosVocab::new();
        let mut b = RetentionBuilder::new(&g, &vocab);
        b.collect_narrower_closure(&c("z"));
        let set = b.finish();

        assert_eq!(set.len(), 2);
        assert!(set.contains(&c("y")));
        assert!(set.contains(&c("x")));
        assert!(!set.contains(&c("top")));
    }

    #[test]
    fn cyclic_broader_terminates() {
        // a -> b -> c -> a
        let g = graph(vec![
            broader("a", "b"),
            broader("b", "c"),
            broader("c", "a"),
        ]);
        let vocab = SkosVocab::new();

        let mut up = RetentionBuilder::new(&g, &vocab);
        up.retain(c("a")).collect_broader_closure(&c("a"));
        let up = up.finish();
        assert_eq!(up.len(), 3);
        for name in ["a", "b", "c"] {
            assert!(up.contains(&c(name)));
        }

        let mut down = RetentionBuilder::new(&g, &vocab);
        down.collect_narrower_closure(&c("a"));
        assert_eq!(down.finish().len(), 3);
    }

    #[test]
    fn self_loop_terminates() {
        let g = graph(vec![broader("a", "a")]);
        let vocab = SkosVocab::new();
        let mut b = RetentionBuilder::new(&g, &vocab);
        b.collect_broader_closure(&c("a")).collect_narrower_closure(&c("a"));
        let set = b.finish();
        assert_eq!(set.len(), 1);
        assert!(set.contains(&c("a")));
    }

    #[test]
    fn node_reached_twice_is_still_expanded_in_each_direction() {
        // m is a descendant of top, and also has a second parent q with its own parent r.
        let g = graph(vec![
            broader("m", "top"),
            broader("m", "q"),
            broader("q", "r"),
            member("top", "m"),
        ]);
        let vocab = SkosVocab::new();
        let mut b = RetentionBuilder::new(&g, &vocab);
        b.retain(c("top"))
            .collect_narrower_closure(&c("top"))
            .collect_collection_members(&c("top"));
        let set = b.finish();

        assert!(set.contains(&c("m")));
        assert!(set.contains(&c("q")));
        assert!(set.contains(&c("r")));
    }

    #[test]
    fn nested_collection_pulls_in_leaf_ancestry() {
        // outer --member--> inner (Collection) --member--> leaf -> p1 -> p2
        let g = graph(vec![
            member("outer", "inner"),
            typed("inner", COLLECTION),
            member("inner", "leaf"),
            broader("leaf", "p1"),
            broader("p1", "p2"),
            broader("kid", "leaf"),
        ]);
        let vocab = SkosVocab::new();
        let mut b = RetentionBuilder::new(&g, &vocab);
        b.collect_collection_members(&c("outer"));
        let set = b.finish();

        for name in ["inner", "leaf", "p1", "p2", "kid"] {
            assert!(set.contains(&c(name)), "{name} should be retained");
        }
        assert!(!set.contains(&c("outer")));
    }

    #[test]
    fn untyped_member_is_not_opened() {
        // inner has members but is not typed as a Collection
        let g = graph(vec![member("outer", "inner"), member("inner", "hidden")]);
        let vocab = SkosVocab::new();
        let mut b = RetentionBuilder::new(&g, &vocab);
        b.collect_collection_members(&c("outer"));
        let set = b.finish();
        assert!(set.contains(&c("inner")));
        assert!(!set.contains(&c("hidden")));
    }

    #[test]
    fn cyclic_collection_membership_terminates() {
        let g = graph(vec![
            member("a", "b"),
            typed("b", COLLECTION),
            member("b", "a"),
            typed("a", COLLECTION),
        ]);
        let vocab = SkosVocab::new();
        let mut b = RetentionBuilder::new(&g, &vocab);
        b.collect_collection_members(&c("a"));
        let set = b.finish();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn deep_chain_does_not_overflow() {
        let depth = 50_000;
        let triples = (0..depth)
            .map(|i| broader(&format!("n{i}"), &format!("n{}", i + 1)))
            .collect();
        let g = graph(triples);
        let vocab = SkosVocab::new();
        let mut b = RetentionBuilder::new(&g, &vocab);
        b.collect_broader_closure(&c("n0"));
        assert_eq!(b.retained().len(), depth);
    }

    #[test]
    fn builder_does_not_mutate_graph() {
        let g = graph(vec![broader("a", "b"), member("b", "c")]);
        let before = g.all_triples();
        let vocab = SkosVocab::new();
        let mut b = RetentionBuilder::new(&g, &vocab);
        b.collect_broader_closure(&c("a"))
            .collect_narrower_closure(&c("b"))
            .collect_collection_members(&c("b"));
        drop(b);
        assert_eq!(g.all_triples(), before);
    }
}
