//! The four-table property-graph dataset.
//!
//! `PropertyGraph` owns the four output collections of an ingestion pass.
//! Resource nodes are interned by IRI; literal nodes are append-only rows
//! with duplicates permitted. Edge endpoints are row ids, which can only be
//! minted by insertion into this graph, so referential integrity holds by
//! construction.

use crate::{Iri, Literal, Object, Triple};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Row id into the resource node table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ResourceId(u32);

impl ResourceId {
    /// The raw row index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Row id into the literal node table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct LiteralId(u32);

impl LiteralId {
    /// The raw row index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// An edge between two resource nodes, carrying its predicate IRI.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ResourceEdge {
    /// Source resource row
    pub src: ResourceId,
    /// Predicate IRI (edge attribute)
    pub predicate: Iri,
    /// Destination resource row
    pub dst: ResourceId,
}

/// An edge from a resource node to a literal node.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct LiteralEdge {
    /// Source resource row
    pub src: ResourceId,
    /// Predicate IRI (edge attribute)
    pub predicate: Iri,
    /// Referenced literal row
    pub literal: LiteralId,
}

/// The four output collections of a bulk ingestion pass.
///
/// # Invariants
///
/// - every inserted triple yields exactly one edge;
/// - the edge table is chosen solely by the triple's object term;
/// - resource rows are unique by IRI, literal rows are not deduplicated;
/// - every `ResourceId`/`LiteralId` held by an edge is a valid row.
///
/// The collections are populated during a single ingestion pass and read-only
/// afterwards; no mutation API beyond insertion is provided.
#[derive(Clone, Debug, Default)]
pub struct PropertyGraph {
    resources: Vec<Iri>,
    resource_ids: HashMap<Iri, ResourceId>,
    literals: Vec<Literal>,
    resource_edges: Vec<ResourceEdge>,
    literal_edges: Vec<LiteralEdge>,
    base: Option<String>,
    prefixes: BTreeMap<String, String>,
}

impl PropertyGraph {
    /// Create an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the four tables from a sequence of triples in one pass.
    ///
    /// This is the pure ingestion entry point: input order is preserved in
    /// the edge tables, and resource ids are assigned in first-seen order.
    pub fn from_triples(triples: impl IntoIterator<Item = Triple>) -> Self {
        let mut graph = Self::new();
        for triple in triples {
            graph.insert(triple);
        }
        graph
    }

    /// Resolve a resource node by IRI, creating the row if absent.
    pub fn intern_resource(&mut self, iri: Iri) -> ResourceId {
        if let Some(&id) = self.resource_ids.get(&iri) {
            return id;
        }
        let id = ResourceId(self.resources.len() as u32);
        self.resource_ids.insert(iri.clone(), id);
        self.resources.push(iri);
        id
    }

    /// Insert one triple, emitting exactly one edge.
    pub fn insert(&mut self, triple: Triple) {
        self.insert_spo(triple.subject, triple.predicate, triple.object);
    }

    /// Insert one triple given as components.
    pub fn insert_spo(&mut self, subject: Iri, predicate: Iri, object: Object) {
        let src = self.intern_resource(subject);
        match object {
            Object::Resource(iri) => {
                let dst = self.intern_resource(iri);
                self.resource_edges.push(ResourceEdge {
                    src,
                    predicate,
                    dst,
                });
            }
            Object::Literal(lit) => {
                let literal = LiteralId(self.literals.len() as u32);
                self.literals.push(lit);
                self.literal_edges.push(LiteralEdge {
                    src,
                    predicate,
                    literal,
                });
            }
        }
    }

    /// Record the base IRI declared by the source document.
    pub fn set_base(&mut self, base: impl Into<String>) {
        self.base = Some(base.into());
    }

    /// Record a prefix declaration from the source document.
    pub fn add_prefix(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.prefixes.insert(prefix.into(), namespace.into());
    }

    /// The resource node table (rows ordered by id).
    pub fn resources(&self) -> &[Iri] {
        &self.resources
    }

    /// The literal node table (rows ordered by id).
    pub fn literals(&self) -> &[Literal] {
        &self.literals
    }

    /// The resource→resource edge table, in input order.
    pub fn resource_edges(&self) -> &[ResourceEdge] {
        &self.resource_edges
    }

    /// The resource→literal edge table, in input order.
    pub fn literal_edges(&self) -> &[LiteralEdge] {
        &self.literal_edges
    }

    /// Look up the row id of a resource IRI.
    pub fn resource_id(&self, iri: &str) -> Option<ResourceId> {
        self.resource_ids.get(&Iri::new(iri)).copied()
    }

    /// The IRI of a resource row.
    ///
    /// Panics if `id` did not come from this graph.
    pub fn resource_iri(&self, id: ResourceId) -> &Iri {
        &self.resources[id.index()]
    }

    /// The literal of a literal row.
    ///
    /// Panics if `id` did not come from this graph.
    pub fn literal(&self, id: LiteralId) -> &Literal {
        &self.literals[id.index()]
    }

    /// Number of unique resource nodes.
    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    /// Number of literal rows (duplicates included).
    pub fn literal_count(&self) -> usize {
        self.literals.len()
    }

    /// Total edges across both edge tables; equals the number of inserted
    /// triples.
    pub fn edge_count(&self) -> usize {
        self.resource_edges.len() + self.literal_edges.len()
    }

    /// True if nothing has been ingested.
    pub fn is_empty(&self) -> bool {
        self.edge_count() == 0 && self.resources.is_empty()
    }

    /// Base IRI recorded from the source, if any.
    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    /// Prefix declarations recorded from the source, in deterministic order.
    pub fn prefixes(&self) -> &BTreeMap<String, String> {
        &self.prefixes
    }

    /// Iterate resource→resource edges as `(src_iri, predicate_iri, dst_iri)`.
    pub fn resource_edge_rows(&self) -> impl Iterator<Item = (&Iri, &Iri, &Iri)> {
        self.resource_edges
            .iter()
            .map(|e| (self.resource_iri(e.src), &e.predicate, self.resource_iri(e.dst)))
    }

    /// Iterate resource→literal edges as `(src_iri, predicate_iri, literal)`.
    pub fn literal_edge_rows(&self) -> impl Iterator<Item = (&Iri, &Iri, &Literal)> {
        self.literal_edges
            .iter()
            .map(|e| (self.resource_iri(e.src), &e.predicate, self.literal(e.literal)))
    }
}

impl FromIterator<Triple> for PropertyGraph {
    fn from_iter<T: IntoIterator<Item = Triple>>(iter: T) -> Self {
        Self::from_triples(iter)
    }
}

impl Extend<Triple> for PropertyGraph {
    fn extend<T: IntoIterator<Item = Triple>>(&mut self, iter: T) {
        for triple in iter {
            self.insert(triple);
        }
    }
}
