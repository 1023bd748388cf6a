//! Property-graph data model for RDF triple ingestion.
//!
//! This crate implements a deterministic mapping from RDF triples into a
//! fixed four-table property-graph dataset:
//!
//! - **resource nodes**, keyed by a unique IRI;
//! - **literal nodes**, holding a scalar value and its datatype (duplicates
//!   permitted, no key);
//! - **resource→resource edges**, carrying a predicate IRI;
//! - **resource→literal edges**, carrying a predicate IRI and a row
//!   reference into the literal table.
//!
//! Every input triple maps to exactly one edge; the edge category is decided
//! solely by whether the triple's object is an IRI or a literal.
//!
//! # Example
//!
//! ```
//! use terrapin_graph::{Iri, Literal, Object, PropertyGraph, Triple};
//!
//! let triples = vec![
//!     Triple::new(
//!         Iri::new("http://example.org/adam"),
//!         Iri::new("http://example.org/livesIn"),
//!         Object::Resource(Iri::new("http://example.org/waterloo")),
//!     ),
//!     Triple::new(
//!         Iri::new("http://example.org/adam"),
//!         Iri::new("http://example.org/name"),
//!         Object::Literal(Literal::string("Adam")),
//!     ),
//! ];
//!
//! let graph = PropertyGraph::from_triples(triples);
//! assert_eq!(graph.resource_count(), 2); // adam, waterloo
//! assert_eq!(graph.resource_edges().len(), 1);
//! assert_eq!(graph.literal_edges().len(), 1);
//! ```

mod datatype;
mod sink;
mod tables;
mod term;

pub use datatype::Datatype;
pub use sink::{TripleBuffer, TripleSink};
pub use tables::{LiteralEdge, LiteralId, PropertyGraph, ResourceEdge, ResourceId};
pub use term::{Iri, Literal, LiteralValue, Object, Triple};
