//! In-memory SKOS graph with dual-indexing.
//!
//! Uses a `petgraph` stable graph for the structure (terms are graph nodes,
//! predicates are edge weights) and hash maps for fast lookups by term or by
//! predicate. The stable graph keeps indices valid while triples are removed.

use std::collections::{BTreeMap, HashMap, HashSet};

use petgraph::Direction;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;

use super::{Iri, Literal, Namespaces, Node, Term, Triple};

/// In-memory RDF graph specialised for the access patterns of SKOS filtering.
///
/// Behaves as a set of triples: inserting a triple twice is a no-op. Graph
/// nodes with no remaining edges are dropped when a triple is removed.
#[derive(Clone)]
pub struct SkosGraph {
    /// The directed graph: nodes are terms, edges carry the predicate.
    graph: StableDiGraph<Term, Iri>,
    /// Resource → NodeIndex mapping for O(1) lookups.
    node_index: HashMap<Node, NodeIndex>,
    /// Literal → NodeIndex mapping. Equal literals share one graph node.
    literal_index: HashMap<Literal, NodeIndex>,
    /// Predicate index: predicate → edges carrying it, keyed by insertion sequence.
    predicate_index: HashMap<Iri, BTreeMap<u64, EdgeIndex>>,
    /// Insertion sequence of every live edge. Edge indices are reused after
    /// removal, so they cannot order triples by themselves.
    sequence: HashMap<EdgeIndex, u64>,
    next_sequence: u64,
    namespaces: Namespaces,
}

impl SkosGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self {
            graph: StableDiGraph::new(),
            node_index: HashMap::new(),
            literal_index: HashMap::new(),
            predicate_index: HashMap::new(),
            sequence: HashMap::new(),
            next_sequence: 0,
            namespaces: Namespaces::new(),
        }
    }

    fn lookup(&self, term: &Term) -> Option<NodeIndex> {
        match term {
            Term::Node(node) => self.node_index.get(node).copied(),
            Term::Literal(lit) => self.literal_index.get(lit).copied(),
        }
    }

    /// Ensure a graph node exists for the given term, returning its NodeIndex.
    fn ensure_node(&mut self, term: &Term) -> NodeIndex {
        if let Some(idx) = self.lookup(term) {
            return idx;
        }
        let idx = self.graph.add_node(term.clone());
        match term {
            Term::Node(node) => self.node_index.insert(node.clone(), idx),
            Term::Literal(lit) => self.literal_index.insert(lit.clone(), idx),
        };
        idx
    }

    fn find_edge(&self, subject: NodeIndex, predicate: &Iri, object: NodeIndex) -> Option<EdgeIndex> {
        self.graph
            .edges_directed(subject, Direction::Outgoing)
            .find(|e| e.target() == object && e.weight() == predicate)
            .map(|e| e.id())
    }

    fn node_at(&self, idx: NodeIndex) -> Option<&Node> {
        self.graph.node_weight(idx)?.as_node()
    }

    fn triple_at(&self, edge: EdgeIndex) -> Option<Triple> {
        let (src, dst) = self.graph.edge_endpoints(edge)?;
        Some(Triple {
            subject: self.node_at(src)?.clone(),
            predicate: self.graph.edge_weight(edge)?.clone(),
            object: self.graph.node_weight(dst)?.clone(),
        })
    }

    /// Insert a triple. Returns `false` if it was already present.
    pub fn insert(&mut self, triple: &Triple) -> bool {
        let subject = Term::Node(triple.subject.clone());
        let subj_idx = self.ensure_node(&subject);
        let obj_idx = self.ensure_node(&triple.object);

        if self.find_edge(subj_idx, &triple.predicate, obj_idx).is_some() {
            return false;
        }

        let edge = self
            .graph
            .add_edge(subj_idx, obj_idx, triple.predicate.clone());
        let seq = self.next_sequence;
        self.next_sequence += 1;
        self.sequence.insert(edge, seq);
        self.predicate_index
            .entry(triple.predicate.clone())
            .or_default()
            .insert(seq, edge);
        true
    }

    /// Remove a triple. Returns `false` if it was not present.
    pub fn remove(&mut self, triple: &Triple) -> bool {
        let Some(subj_idx) = self.node_index.get(&triple.subject).copied() else {
            return false;
        };
        let Some(obj_idx) = self.lookup(&triple.object) else {
            return false;
        };
        let Some(edge) = self.find_edge(subj_idx, &triple.predicate, obj_idx) else {
            return false;
        };

        self.graph.remove_edge(edge);
        let seq = self.sequence.remove(&edge);
        if let (Some(seq), Some(edges)) = (seq, self.predicate_index.get_mut(&triple.predicate)) {
            edges.remove(&seq);
            if edges.is_empty() {
                self.predicate_index.remove(&triple.predicate);
            }
        }
        self.drop_if_isolated(subj_idx);
        self.drop_if_isolated(obj_idx);
        true
    }

    fn drop_if_isolated(&mut self, idx: NodeIndex) {
        let isolated = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .next()
            .is_none()
            && self
                .graph
                .edges_directed(idx, Direction::Incoming)
                .next()
                .is_none();
        if !isolated {
            return;
        }
        match self.graph.remove_node(idx) {
            Some(Term::Node(node)) => {
                self.node_index.remove(&node);
            }
            Some(Term::Literal(lit)) => {
                self.literal_index.remove(&lit);
            }
            None => {}
        }
    }

    /// Check whether the exact triple is present.
    pub fn contains(&self, triple: &Triple) -> bool {
        let Some(subj_idx) = self.node_index.get(&triple.subject).copied() else {
            return false;
        };
        let Some(obj_idx) = self.lookup(&triple.object) else {
            return false;
        };
        self.find_edge(subj_idx, &triple.predicate, obj_idx).is_some()
    }

    /// Check whether `(subject, predicate, object)` is present for a resource object.
    pub fn has_edge(&self, subject: &Node, predicate: &Iri, object: &Node) -> bool {
        match (self.node_index.get(subject), self.node_index.get(object)) {
            (Some(&s), Some(&o)) => self.find_edge(s, predicate, o).is_some(),
            _ => false,
        }
    }

    /// Get all objects for a given subject and predicate.
    pub fn objects_of(&self, subject: &Node, predicate: &Iri) -> Vec<Term> {
        let Some(&subj_idx) = self.node_index.get(subject) else {
            return vec![];
        };

        self.graph
            .edges_directed(subj_idx, Direction::Outgoing)
            .filter(|e| e.weight() == predicate)
            .filter_map(|e| self.graph.node_weight(e.target()).cloned())
            .collect()
    }

    /// Get all subjects for a given predicate and resource object.
    pub fn subjects_of(&self, predicate: &Iri, object: &Node) -> Vec<Node> {
        let Some(&obj_idx) = self.node_index.get(object) else {
            return vec![];
        };

        self.graph
            .edges_directed(obj_idx, Direction::Incoming)
            .filter(|e| e.weight() == predicate)
            .filter_map(|e| self.node_at(e.source()).cloned())
            .collect()
    }

    /// Get all triples carrying the given predicate, in insertion order.
    pub fn triples_for_predicate(&self, predicate: &Iri) -> Vec<Triple> {
        self.predicate_index
            .get(predicate)
            .map(|edges| edges.values().filter_map(|&e| self.triple_at(e)).collect())
            .unwrap_or_default()
    }

    /// Get all triples where the given node appears as subject.
    pub fn triples_from(&self, subject: &Node) -> Vec<Triple> {
        let Some(&subj_idx) = self.node_index.get(subject) else {
            return vec![];
        };

        self.graph
            .edges_directed(subj_idx, Direction::Outgoing)
            .filter_map(|e| self.triple_at(e.id()))
            .collect()
    }

    /// Snapshot of every triple, in insertion order.
    pub fn all_triples(&self) -> Vec<Triple> {
        let mut edges: Vec<(u64, EdgeIndex)> = self
            .sequence
            .iter()
            .map(|(&edge, &seq)| (seq, edge))
            .collect();
        edges.sort_unstable();
        edges.into_iter().filter_map(|(_, e)| self.triple_at(e)).collect()
    }

    /// Distinct nodes that appear in subject position.
    pub fn subjects(&self) -> HashSet<Node> {
        self.node_index
            .iter()
            .filter(|&(_, &idx)| {
                self.graph
                    .edges_directed(idx, Direction::Outgoing)
                    .next()
                    .is_some()
            })
            .map(|(node, _)| node.clone())
            .collect()
    }

    /// Check if a resource appears anywhere in the graph.
    pub fn has_node(&self, node: &Node) -> bool {
        self.node_index.contains_key(node)
    }

    /// Number of graph nodes (resources and distinct literals).
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of triples.
    pub fn len(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.edge_count() == 0
    }

    /// Prefix table read from the source document.
    pub fn namespaces(&self) -> &Namespaces {
        &self.namespaces
    }

    pub fn namespaces_mut(&mut self) -> &mut Namespaces {
        &mut self.namespaces
    }
}

impl Default for SkosGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl Extend<Triple> for SkosGraph {
    fn extend<I: IntoIterator<Item = Triple>>(&mut self, iter: I) {
        for triple in iter {
            self.insert(&triple);
        }
    }
}

impl FromIterator<Triple> for SkosGraph {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        let mut graph = Self::new();
        graph.extend(iter);
        graph
    }
}

impl std::fmt::Debug for SkosGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkosGraph")
            .field("nodes", &self.node_count())
            .field("triples", &self.len())
            .field("prefixes", &self.namespaces.len())
            .finish()
    }
}
