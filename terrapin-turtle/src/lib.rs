//! Turtle parsing for property-graph ingestion.
//!
//! Parses RDF 1.1 Turtle documents and emits fully resolved triples — every
//! prefixed name expanded, every relative IRI resolved against the in-scope
//! base — to a [`TripleSink`]. The usual destination is a
//! [`PropertyGraph`](terrapin_graph::PropertyGraph), which partitions triples
//! into resource nodes, literal nodes, and the two edge tables.
//!
//! Parsing is all-or-nothing: the first lexical or grammatical error aborts
//! with a [`ParseError`] carrying line/column information, and nothing is
//! emitted past the failing statement.
//!
//! ```
//! use terrapin_turtle::parse_to_graph;
//!
//! let graph = parse_to_graph(
//!     r#"
//!     @prefix ex: <http://example.org/> .
//!     ex:adam ex:livesIn ex:waterloo ;
//!             ex:name "Adam" .
//!     "#,
//! )?;
//! assert_eq!(graph.resource_count(), 2);
//! assert_eq!(graph.resource_edges().len(), 1);
//! assert_eq!(graph.literal_edges().len(), 1);
//! # Ok::<(), terrapin_turtle::ParseError>(())
//! ```

mod error;
mod iri;
mod lex;
mod parser;

pub use error::{ParseError, Result};

use terrapin_graph::{PropertyGraph, TripleSink};

/// Parse a Turtle document, streaming resolved triples into `sink`.
///
/// Triples are emitted as each statement completes, so on error the sink may
/// have received a prefix of the document. Callers that need all-or-nothing
/// semantics should parse into a fresh sink and discard it on error, which is
/// what [`parse_to_graph`] does.
pub fn parse<S: TripleSink>(input: &str, sink: &mut S) -> Result<()> {
    let tokens = lex::tokenize(input)?;
    parser::Parser::new(input, tokens, sink).run()
}

/// Parse a Turtle document into a fresh four-table [`PropertyGraph`].
///
/// On error no graph is returned, so a failed parse can never leave partial
/// tables behind.
pub fn parse_to_graph(input: &str) -> Result<PropertyGraph> {
    let mut graph = PropertyGraph::new();
    parse(input, &mut graph)?;
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAMPUS: &str = r#"
        @prefix ex: <http://example.org/> .
        @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .

        ex:Student rdfs:subClassOf ex:Person .
        ex:Instructor rdfs:subClassOf ex:Person .

        ex:adam a ex:Student ;
            ex:name "Adam" ;
            ex:age 28 ;
            ex:livesIn ex:waterloo .

        ex:karissa a ex:Instructor ;
            ex:name "Karissa" ;
            ex:bornIn ex:waterloo .

        ex:zhang ex:name "Zhang" .

        ex:waterloo ex:name "Waterloo" .
    "#;

    #[test]
    fn campus_tables() {
        let graph = parse_to_graph(CAMPUS).unwrap();

        // Student, Instructor, Person, adam, karissa, zhang, waterloo
        assert_eq!(graph.resource_count(), 7);
        // subClassOf x2, rdf:type x2, livesIn, bornIn
        assert_eq!(graph.resource_edges().len(), 6);
        // name x4, age
        assert_eq!(graph.literal_edges().len(), 5);
        assert_eq!(graph.literal_count(), 5);

        assert!(graph.resource_id("http://example.org/adam").is_some());
        assert!(graph.resource_id("http://example.org/Person").is_some());

        let lives_in = graph
            .resource_edge_rows()
            .find(|(_, p, _)| p.as_str() == "http://example.org/livesIn")
            .unwrap();
        assert_eq!(lives_in.0.as_str(), "http://example.org/adam");
        assert_eq!(lives_in.2.as_str(), "http://example.org/waterloo");

        let adam_name = graph
            .literal_edge_rows()
            .find(|(s, p, _)| {
                s.as_str() == "http://example.org/adam"
                    && p.as_str() == "http://example.org/name"
            })
            .unwrap();
        assert_eq!(adam_name.2.value.lexical(), "Adam");
    }

    #[test]
    fn edge_count_equals_triple_count() {
        let graph = parse_to_graph(CAMPUS).unwrap();
        let mut buf = terrapin_graph::TripleBuffer::new();
        parse(CAMPUS, &mut buf).unwrap();
        assert_eq!(graph.edge_count(), buf.triples().len());
    }

    #[test]
    fn duplicate_literal_values_get_separate_rows() {
        let graph = parse_to_graph(
            r#"
            @prefix ex: <http://example.org/> .
            ex:a ex:label "shared" .
            ex:b ex:label "shared" .
            "#,
        )
        .unwrap();
        assert_eq!(graph.literal_count(), 2);
        assert_eq!(graph.literals()[0], graph.literals()[1]);
    }

    #[test]
    fn duplicate_triples_keep_both_edges() {
        let graph = parse_to_graph(
            r#"
            @prefix ex: <http://example.org/> .
            ex:a ex:knows ex:b .
            ex:a ex:knows ex:b .
            "#,
        )
        .unwrap();
        assert_eq!(graph.resource_count(), 2);
        assert_eq!(graph.resource_edges().len(), 2);
    }

    #[test]
    fn reparsing_is_deterministic() {
        let g1 = parse_to_graph(CAMPUS).unwrap();
        let g2 = parse_to_graph(CAMPUS).unwrap();
        assert_eq!(g1.resources(), g2.resources());
        assert_eq!(g1.literals(), g2.literals());
        assert_eq!(g1.resource_edges(), g2.resource_edges());
        assert_eq!(g1.literal_edges(), g2.literal_edges());
    }

    #[test]
    fn provenance_is_recorded() {
        let graph = parse_to_graph(
            r#"
            @base <http://example.org/> .
            @prefix ex: <http://example.org/ns#> .
            <adam> ex:name "Adam" .
            "#,
        )
        .unwrap();
        assert_eq!(graph.base(), Some("http://example.org/"));
        assert_eq!(
            graph.prefixes().get("ex").map(String::as_str),
            Some("http://example.org/ns#")
        );
    }

    #[test]
    fn unterminated_string_yields_no_graph() {
        let err = parse_to_graph(r#"<http://e.org/a> <http://e.org/p> "oops ."#).unwrap_err();
        assert!(matches!(err, ParseError::Syntax { line: 1, .. }));
    }

    #[test]
    fn undefined_prefix_yields_no_graph() {
        let err = parse_to_graph(
            "@prefix ex: <http://e.org/> .\nex:a nope:p ex:b .",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ParseError::UndefinedPrefix { line: 2, .. }
        ));
    }

    #[test]
    fn blank_nodes_become_resource_rows() {
        let graph = parse_to_graph(
            r#"
            @prefix ex: <http://example.org/> .
            ex:adam ex:address [ ex:city "Waterloo" ] .
            _:home ex:ownedBy ex:adam .
            "#,
        )
        .unwrap();

        let blanks: Vec<_> = graph
            .resources()
            .iter()
            .filter(|iri| iri.is_blank())
            .collect();
        assert_eq!(blanks.len(), 2);
        assert!(graph.resource_id("_:home").is_some());
        assert_eq!(graph.resource_edges().len(), 2);
        assert_eq!(graph.literal_edges().len(), 1);
    }

    #[test]
    fn empty_document_is_an_empty_graph() {
        let graph = parse_to_graph("# just a comment\n").unwrap();
        assert!(graph.is_empty());
    }
}
