//! Event interface between parsers and table builders.
//!
//! Parsers emit fully resolved terms; a sink decides what to do with them.
//! `PropertyGraph` builds the four tables directly, `TripleBuffer` collects
//! raw triples for callers that want the pure `from_triples` path.

use crate::{Iri, Object, PropertyGraph, Triple};
use std::collections::BTreeMap;

/// Receiver of parser events.
///
/// All IRIs are expanded before they reach a sink; prefixed names and
/// relative references are the parser's problem.
pub trait TripleSink {
    /// A base IRI was declared (`@base` / `BASE`).
    fn on_base(&mut self, base_iri: &str);

    /// A prefix was declared (`@prefix` / `PREFIX`).
    fn on_prefix(&mut self, prefix: &str, namespace_iri: &str);

    /// A triple was parsed.
    fn triple(&mut self, subject: Iri, predicate: Iri, object: Object);
}

impl TripleSink for PropertyGraph {
    fn on_base(&mut self, base_iri: &str) {
        self.set_base(base_iri);
    }

    fn on_prefix(&mut self, prefix: &str, namespace_iri: &str) {
        self.add_prefix(prefix, namespace_iri);
    }

    fn triple(&mut self, subject: Iri, predicate: Iri, object: Object) {
        self.insert_spo(subject, predicate, object);
    }
}

/// A sink that collects triples without building tables.
#[derive(Debug, Default)]
pub struct TripleBuffer {
    triples: Vec<Triple>,
    base: Option<String>,
    prefixes: BTreeMap<String, String>,
}

impl TripleBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// The collected triples, in document order.
    pub fn triples(&self) -> &[Triple] {
        &self.triples
    }

    /// Consume the buffer, returning the triples.
    pub fn into_triples(self) -> Vec<Triple> {
        self.triples
    }

    /// Base IRI seen during parsing, if any.
    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    /// Prefixes seen during parsing.
    pub fn prefixes(&self) -> &BTreeMap<String, String> {
        &self.prefixes
    }
}

impl TripleSink for TripleBuffer {
    fn on_base(&mut self, base_iri: &str) {
        self.base = Some(base_iri.to_string());
    }

    fn on_prefix(&mut self, prefix: &str, namespace_iri: &str) {
        self.prefixes
            .insert(prefix.to_string(), namespace_iri.to_string());
    }

    fn triple(&mut self, subject: Iri, predicate: Iri, object: Object) {
        self.triples.push(Triple::new(subject, predicate, object));
    }
}
