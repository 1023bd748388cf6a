//! Recursive-descent Turtle parser over the token stream.
//!
//! Maintains the prefix map and base IRI as directives arrive, expands every
//! prefixed name and relative reference, and emits fully resolved triples to
//! a [`TripleSink`]. Blank nodes are materialized as `_:`-keyed resources;
//! anonymous ones get fresh generated labels.

use std::collections::{HashMap, HashSet};

use terrapin_graph::{Datatype, Iri, Literal, Object, TripleSink};
use terrapin_vocab::rdf;
use tracing::trace;

use crate::error::{ParseError, Result};
use crate::iri;
use crate::lex::{Token, TokenKind};

pub(crate) struct Parser<'a, S: TripleSink> {
    src: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    sink: &'a mut S,
    prefixes: HashMap<String, String>,
    base: Option<String>,
    bnode_seq: u32,
    bnode_labels: HashMap<String, Iri>,
    bnode_used: HashSet<String>,
}

impl<'a, S: TripleSink> Parser<'a, S> {
    pub(crate) fn new(src: &'a str, tokens: Vec<Token>, sink: &'a mut S) -> Self {
        Self {
            src,
            tokens,
            pos: 0,
            sink,
            prefixes: HashMap::new(),
            base: None,
            bnode_seq: 0,
            bnode_labels: HashMap::new(),
            bnode_used: HashSet::new(),
        }
    }

    /// Parse the whole document, emitting triples as statements complete.
    pub(crate) fn run(mut self) -> Result<()> {
        while !matches!(self.peek().kind, TokenKind::Eof) {
            self.statement()?;
        }
        Ok(())
    }

    // -- token stream ------------------------------------------------------

    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn expect_dot(&mut self) -> Result<()> {
        let tok = self.advance();
        if matches!(tok.kind, TokenKind::Dot) {
            Ok(())
        } else {
            Err(self.unexpected(&tok, "'.'"))
        }
    }

    fn unexpected(&self, tok: &Token, wanted: &str) -> ParseError {
        ParseError::syntax(
            self.src,
            tok.start,
            format!("expected {}, found '{}'", wanted, tok.kind),
        )
    }

    // -- statements --------------------------------------------------------

    fn statement(&mut self) -> Result<()> {
        match self.peek().kind {
            TokenKind::PrefixDecl => {
                self.advance();
                self.prefix_declaration(true)
            }
            TokenKind::BaseDecl => {
                self.advance();
                self.base_declaration(true)
            }
            TokenKind::SparqlPrefix => {
                self.advance();
                self.prefix_declaration(false)
            }
            TokenKind::SparqlBase => {
                self.advance();
                self.base_declaration(false)
            }
            _ => self.triples(),
        }
    }

    /// `@prefix p: <iri> .` or SPARQL-style `PREFIX p: <iri>` (no dot).
    fn prefix_declaration(&mut self, dotted: bool) -> Result<()> {
        let tok = self.advance();
        let prefix = match &tok.kind {
            TokenKind::PNameNs(prefix) => prefix.to_string(),
            _ => return Err(self.unexpected(&tok, "a prefix name ending in ':'")),
        };

        let tok = self.advance();
        let namespace = match &tok.kind {
            TokenKind::IriRef(reference) => self.resolve(reference)?,
            _ => return Err(self.unexpected(&tok, "an IRI reference")),
        };

        if dotted {
            self.expect_dot()?;
        }
        trace!(prefix = %prefix, namespace = %namespace, "prefix declared");
        self.sink.on_prefix(&prefix, &namespace);
        self.prefixes.insert(prefix, namespace);
        Ok(())
    }

    /// `@base <iri> .` or SPARQL-style `BASE <iri>` (no dot).
    fn base_declaration(&mut self, dotted: bool) -> Result<()> {
        let tok = self.advance();
        let base = match &tok.kind {
            // a new base is itself resolved against the previous one
            TokenKind::IriRef(reference) => self.resolve(reference)?,
            _ => return Err(self.unexpected(&tok, "an IRI reference")),
        };

        if dotted {
            self.expect_dot()?;
        }
        trace!(base = %base, "base declared");
        self.sink.on_base(&base);
        self.base = Some(base);
        Ok(())
    }

    /// One triples statement: subject + predicate-object list, dot-terminated.
    fn triples(&mut self) -> Result<()> {
        // a bare blank node property list may stand alone as a subject
        if matches!(self.peek().kind, TokenKind::OpenBracket) {
            let subject = self.blank_node_property_list()?;
            if !matches!(self.peek().kind, TokenKind::Dot) {
                self.predicate_object_list(&subject)?;
            }
            return self.expect_dot();
        }

        let subject = self.subject()?;
        self.predicate_object_list(&subject)?;
        self.expect_dot()
    }

    fn predicate_object_list(&mut self, subject: &Iri) -> Result<()> {
        loop {
            let predicate = self.predicate()?;
            self.object_list(subject, &predicate)?;

            // `;` continues the list; a trailing `;` before `.` is legal
            while matches!(self.peek().kind, TokenKind::Semicolon) {
                self.advance();
            }
            match self.peek().kind {
                TokenKind::Dot | TokenKind::CloseBracket | TokenKind::Eof => return Ok(()),
                _ => {
                    // only reachable after at least one `;`
                    if !self.just_passed_semicolon() {
                        let tok = self.peek().clone();
                        return Err(self.unexpected(&tok, "'.', ';', or ','"));
                    }
                }
            }
        }
    }

    fn just_passed_semicolon(&self) -> bool {
        self.pos > 0 && matches!(self.tokens[self.pos - 1].kind, TokenKind::Semicolon)
    }

    fn object_list(&mut self, subject: &Iri, predicate: &Iri) -> Result<()> {
        loop {
            let object = self.object()?;
            self.sink.triple(subject.clone(), predicate.clone(), object);
            if matches!(self.peek().kind, TokenKind::Comma) {
                self.advance();
            } else {
                return Ok(());
            }
        }
    }

    // -- terms -------------------------------------------------------------

    fn subject(&mut self) -> Result<Iri> {
        let tok = self.advance();
        match &tok.kind {
            TokenKind::IriRef(reference) => Ok(Iri::new(self.resolve(reference)?)),
            TokenKind::PName { prefix, local } => self.expand_pname(prefix, local, tok.start),
            TokenKind::PNameNs(prefix) => self.expand_pname(prefix, "", tok.start),
            TokenKind::BlankLabel(label) => Ok(self.blank_label(label)),
            TokenKind::Anon => Ok(self.fresh_blank()),
            TokenKind::Nil => Ok(Iri::new(rdf::NIL)),
            TokenKind::OpenParen => self.collection(),
            _ => Err(self.unexpected(&tok, "a subject (IRI, prefixed name, or blank node)")),
        }
    }

    fn predicate(&mut self) -> Result<Iri> {
        let tok = self.advance();
        match &tok.kind {
            TokenKind::A => Ok(Iri::new(rdf::TYPE)),
            TokenKind::IriRef(reference) => Ok(Iri::new(self.resolve(reference)?)),
            TokenKind::PName { prefix, local } => self.expand_pname(prefix, local, tok.start),
            TokenKind::PNameNs(prefix) => self.expand_pname(prefix, "", tok.start),
            _ => Err(self.unexpected(&tok, "a predicate (IRI, prefixed name, or 'a')")),
        }
    }

    fn object(&mut self) -> Result<Object> {
        let tok = self.advance();
        match &tok.kind {
            TokenKind::IriRef(reference) => {
                Ok(Object::Resource(Iri::new(self.resolve(reference)?)))
            }
            TokenKind::PName { prefix, local } => {
                Ok(Object::Resource(self.expand_pname(prefix, local, tok.start)?))
            }
            TokenKind::PNameNs(prefix) => {
                Ok(Object::Resource(self.expand_pname(prefix, "", tok.start)?))
            }
            TokenKind::BlankLabel(label) => Ok(Object::Resource(self.blank_label(label))),
            TokenKind::Anon => Ok(Object::Resource(self.fresh_blank())),
            TokenKind::Nil => Ok(Object::Resource(Iri::new(rdf::NIL))),
            TokenKind::OpenBracket => {
                Ok(Object::Resource(self.blank_node_property_list_body()?))
            }
            TokenKind::OpenParen => Ok(Object::Resource(self.collection()?)),
            TokenKind::StringLit(content) => {
                let content = content.to_string();
                Ok(Object::Literal(self.string_literal(content)?))
            }
            TokenKind::Integer(value) => Ok(Object::Literal(Literal::integer(*value))),
            TokenKind::Decimal(lexical) => Ok(Object::Literal(Literal::decimal(lexical.as_ref()))),
            TokenKind::Double(value) => Ok(Object::Literal(Literal::double(*value))),
            TokenKind::True => Ok(Object::Literal(Literal::boolean(true))),
            TokenKind::False => Ok(Object::Literal(Literal::boolean(false))),
            _ => Err(self.unexpected(&tok, "an object term")),
        }
    }

    /// String body already consumed; check for `@lang` or `^^datatype`.
    fn string_literal(&mut self, content: impl Into<String>) -> Result<Literal> {
        let content = content.into();
        match self.peek().kind.clone() {
            TokenKind::LangTag(tag) => {
                self.advance();
                Ok(Literal::lang_string(content, tag.as_ref()))
            }
            TokenKind::DatatypeMarker => {
                self.advance();
                let tok = self.advance();
                let datatype = match &tok.kind {
                    TokenKind::IriRef(reference) => self.resolve(reference)?,
                    TokenKind::PName { prefix, local } => self
                        .expand_pname(prefix, local, tok.start)?
                        .as_str()
                        .to_string(),
                    TokenKind::PNameNs(prefix) => {
                        self.expand_pname(prefix, "", tok.start)?.as_str().to_string()
                    }
                    _ => return Err(self.unexpected(&tok, "a datatype IRI after '^^'")),
                };
                Ok(Literal::typed(content, Datatype::from_iri(datatype)))
            }
            _ => Ok(Literal::string(content)),
        }
    }

    /// `[ predicateObjectList ]` with the opening bracket not yet consumed.
    fn blank_node_property_list(&mut self) -> Result<Iri> {
        self.advance(); // '['
        self.blank_node_property_list_body()
    }

    /// `[ predicateObjectList ]` with the opening bracket already consumed.
    fn blank_node_property_list_body(&mut self) -> Result<Iri> {
        let node = self.fresh_blank();
        self.predicate_object_list(&node)?;
        let tok = self.advance();
        if matches!(tok.kind, TokenKind::CloseBracket) {
            Ok(node)
        } else {
            Err(self.unexpected(&tok, "']'"))
        }
    }

    /// `( object* )` with the opening paren already consumed; builds the
    /// rdf:first / rdf:rest chain and returns its head node.
    fn collection(&mut self) -> Result<Iri> {
        let first = Iri::new(rdf::FIRST);
        let rest = Iri::new(rdf::REST);

        let mut head: Option<Iri> = None;
        let mut tail: Option<Iri> = None;

        while !matches!(self.peek().kind, TokenKind::CloseParen) {
            if matches!(self.peek().kind, TokenKind::Eof) {
                let tok = self.peek().clone();
                return Err(self.unexpected(&tok, "an object or ')'"));
            }
            let object = self.object()?;
            let cell = self.fresh_blank();
            self.sink.triple(cell.clone(), first.clone(), object);
            match tail.take() {
                Some(prev) => {
                    self.sink
                        .triple(prev, rest.clone(), Object::Resource(cell.clone()));
                }
                None => head = Some(cell.clone()),
            }
            tail = Some(cell);
        }
        self.advance(); // ')'

        match (head, tail) {
            (Some(head), Some(last)) => {
                self.sink
                    .triple(last, rest, Object::Resource(Iri::new(rdf::NIL)));
                Ok(head)
            }
            _ => Ok(Iri::new(rdf::NIL)),
        }
    }

    // -- name expansion ----------------------------------------------------

    /// Mint a fresh anonymous blank node, skipping any label the document
    /// has already claimed.
    fn fresh_blank(&mut self) -> Iri {
        loop {
            let label = format!("genid{}", self.bnode_seq);
            self.bnode_seq += 1;
            if self.bnode_used.insert(label.clone()) {
                return Iri::blank(label);
            }
        }
    }

    /// Resolve a document-supplied blank node label.
    ///
    /// A label is stable across its occurrences. If it collides with an
    /// already-minted generated label it is remapped to a fresh node so two
    /// distinct blank nodes never share a resource row.
    fn blank_label(&mut self, label: &str) -> Iri {
        if let Some(iri) = self.bnode_labels.get(label) {
            return iri.clone();
        }
        let iri = if self.bnode_used.insert(label.to_string()) {
            Iri::blank(label)
        } else {
            self.fresh_blank()
        };
        self.bnode_labels.insert(label.to_string(), iri.clone());
        iri
    }

    fn resolve(&self, reference: &str) -> Result<String> {
        iri::resolve(self.base.as_deref(), reference)
    }

    fn expand_pname(&self, prefix: &str, local: &str, offset: usize) -> Result<Iri> {
        match self.prefixes.get(prefix) {
            Some(namespace) => Ok(Iri::new(format!("{}{}", namespace, local))),
            None => Err(ParseError::undefined_prefix(self.src, offset, prefix)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lex::tokenize;
    use terrapin_graph::TripleBuffer;

    fn parse(src: &str) -> Vec<terrapin_graph::Triple> {
        let mut buf = TripleBuffer::new();
        let tokens = tokenize(src).unwrap();
        Parser::new(src, tokens, &mut buf).run().unwrap();
        buf.into_triples()
    }

    fn parse_err(src: &str) -> ParseError {
        let mut buf = TripleBuffer::new();
        let tokens = tokenize(src).unwrap();
        Parser::new(src, tokens, &mut buf).run().unwrap_err()
    }

    #[test]
    fn single_triple() {
        let triples = parse("<http://e.org/a> <http://e.org/p> <http://e.org/b> .");
        assert_eq!(triples.len(), 1);
        assert_eq!(triples[0].subject.as_str(), "http://e.org/a");
        assert_eq!(triples[0].predicate.as_str(), "http://e.org/p");
        assert_eq!(
            triples[0].object.as_resource().unwrap().as_str(),
            "http://e.org/b"
        );
    }

    #[test]
    fn prefixed_names_expand() {
        let triples = parse("@prefix ex: <http://e.org/> . ex:a ex:p ex:b .");
        assert_eq!(triples[0].subject.as_str(), "http://e.org/a");
        assert_eq!(triples[0].object.as_resource().unwrap().as_str(), "http://e.org/b");
    }

    #[test]
    fn default_prefix() {
        let triples = parse("@prefix : <http://e.org/> . :a :p :b .");
        assert_eq!(triples[0].subject.as_str(), "http://e.org/a");
    }

    #[test]
    fn sparql_style_directives() {
        let triples = parse("PREFIX ex: <http://e.org/>\nBASE <http://base.org/>\nex:a ex:p <x> .");
        assert_eq!(
            triples[0].object.as_resource().unwrap().as_str(),
            "http://base.org/x"
        );
    }

    #[test]
    fn a_is_rdf_type() {
        let triples = parse("@prefix ex: <http://e.org/> . ex:adam a ex:Person .");
        assert_eq!(triples[0].predicate.as_str(), rdf::TYPE);
    }

    #[test]
    fn base_resolves_relative_iris() {
        let triples = parse("@base <http://e.org/data/> . <adam> <knows> <people/karissa> .");
        assert_eq!(triples[0].subject.as_str(), "http://e.org/data/adam");
        assert_eq!(
            triples[0].object.as_resource().unwrap().as_str(),
            "http://e.org/data/people/karissa"
        );
    }

    #[test]
    fn predicate_object_and_object_lists() {
        let triples = parse(
            "@prefix ex: <http://e.org/> .\n\
             ex:a ex:p ex:b , ex:c ; ex:q \"v\" .",
        );
        assert_eq!(triples.len(), 3);
        assert!(triples.iter().all(|t| t.subject.as_str() == "http://e.org/a"));
        assert!(triples[2].object.is_literal());
    }

    #[test]
    fn trailing_semicolon_is_legal() {
        let triples = parse("@prefix ex: <http://e.org/> . ex:a ex:p ex:b ; .");
        assert_eq!(triples.len(), 1);
    }

    #[test]
    fn literals_carry_datatype_and_language() {
        let triples = parse(
            "@prefix ex: <http://e.org/> .\n\
             @prefix xsd: <http://www.w3.org/2001/XMLSchema#> .\n\
             ex:a ex:name \"Adam\" ;\n\
                  ex:motto \"hello\"@en ;\n\
                  ex:age 30 ;\n\
                  ex:height 1.75 ;\n\
                  ex:score 1.0e2 ;\n\
                  ex:active true ;\n\
                  ex:born \"1990-01-01\"^^xsd:date .",
        );
        assert_eq!(triples.len(), 7);
        let lit = |i: usize| triples[i].object.as_literal().unwrap();
        assert!(lit(0).datatype.is_xsd_string());
        assert_eq!(lit(1).language.as_deref(), Some("en"));
        assert_eq!(lit(2).value.lexical(), "30");
        assert_eq!(lit(3).value.lexical(), "1.75");
        assert_eq!(lit(5).value.lexical(), "true");
        assert_eq!(
            lit(6).datatype.as_iri(),
            "http://www.w3.org/2001/XMLSchema#date"
        );
    }

    #[test]
    fn labeled_blank_nodes_are_stable() {
        let triples = parse("_:b0 <http://e.org/p> _:b0 .");
        assert_eq!(triples[0].subject.as_str(), "_:b0");
        assert_eq!(triples[0].object.as_resource().unwrap().as_str(), "_:b0");
    }

    #[test]
    fn anonymous_blank_nodes_are_distinct() {
        let triples = parse("[] <http://e.org/p> [] .");
        assert_eq!(triples.len(), 1);
        assert_ne!(
            triples[0].subject.as_str(),
            triples[0].object.as_resource().unwrap().as_str()
        );
        assert!(triples[0].subject.is_blank());
    }

    #[test]
    fn generated_labels_avoid_document_labels() {
        // anonymous node minted first, document then uses the same label
        let triples = parse("[] <http://e.org/p> <http://e.org/o> . _:genid0 <http://e.org/q> <http://e.org/r> .");
        assert_eq!(triples.len(), 2);
        assert_ne!(triples[0].subject, triples[1].subject);

        // document claims the label first, generator must skip it
        let triples = parse("_:genid0 <http://e.org/p> <http://e.org/o> . [] <http://e.org/q> <http://e.org/r> .");
        assert_eq!(triples[0].subject.as_str(), "_:genid0");
        assert_ne!(triples[0].subject, triples[1].subject);
    }

    #[test]
    fn remapped_document_label_stays_stable() {
        // _:genid0 collides with the anonymous node and is remapped, but both
        // of its occurrences must still name the same node
        let triples = parse("[] <http://e.org/p> <http://e.org/o> . _:genid0 <http://e.org/q> _:genid0 .");
        assert_eq!(
            triples[1].subject,
            *triples[1].object.as_resource().unwrap()
        );
        assert_ne!(triples[0].subject, triples[1].subject);
    }

    #[test]
    fn blank_node_property_list() {
        let triples = parse(
            "@prefix ex: <http://e.org/> .\n\
             ex:adam ex:address [ ex:city \"Waterloo\" ; ex:country ex:Canada ] .",
        );
        assert_eq!(triples.len(), 3);
        // inner triples come first, then the edge to the list node
        let addr = triples[2].object.as_resource().unwrap();
        assert!(addr.is_blank());
        assert_eq!(triples[0].subject, *addr);
        assert_eq!(triples[1].subject, *addr);
    }

    #[test]
    fn standalone_property_list_subject() {
        let triples = parse("@prefix ex: <http://e.org/> . [ ex:p ex:o ] .");
        assert_eq!(triples.len(), 1);
        assert!(triples[0].subject.is_blank());
    }

    #[test]
    fn collections_chain_first_rest_nil() {
        let triples = parse("@prefix ex: <http://e.org/> . ex:a ex:list (ex:x ex:y) .");
        // 2 first + 2 rest + the ex:list edge
        assert_eq!(triples.len(), 5);
        let firsts: Vec<_> = triples
            .iter()
            .filter(|t| t.predicate.as_str() == rdf::FIRST)
            .collect();
        assert_eq!(firsts.len(), 2);
        let nil_terminated = triples.iter().any(|t| {
            t.predicate.as_str() == rdf::REST
                && t.object.as_resource().is_some_and(|r| r.as_str() == rdf::NIL)
        });
        assert!(nil_terminated);
        // the ex:list edge points at the head cell
        let head = triples
            .iter()
            .find(|t| t.predicate.as_str() == "http://e.org/list")
            .unwrap();
        assert_eq!(head.object.as_resource(), Some(&firsts[0].subject));
    }

    #[test]
    fn empty_collection_is_nil() {
        let triples = parse("@prefix ex: <http://e.org/> . ex:a ex:list () .");
        assert_eq!(triples.len(), 1);
        assert_eq!(triples[0].object.as_resource().unwrap().as_str(), rdf::NIL);
    }

    #[test]
    fn undefined_prefix_is_an_error() {
        let err = parse_err("nope:a <http://e.org/p> <http://e.org/b> .");
        match err {
            ParseError::UndefinedPrefix { prefix, line, .. } => {
                assert_eq!(prefix, "nope");
                assert_eq!(line, 1);
            }
            other => panic!("wrong error: {other}"),
        }
    }

    #[test]
    fn relative_iri_without_base_is_an_error() {
        let err = parse_err("<adam> <http://e.org/p> <http://e.org/b> .");
        assert!(matches!(err, ParseError::IriResolution { .. }));
    }

    #[test]
    fn missing_dot_is_an_error() {
        let err = parse_err("<http://e.org/a> <http://e.org/p> <http://e.org/b>");
        assert!(err.to_string().contains("expected"));
    }

    #[test]
    fn rebased_base_resolves_against_previous() {
        let triples = parse(
            "@base <http://e.org/a/> .\n\
             @base <sub/> .\n\
             <x> <p> <y> .",
        );
        assert_eq!(triples[0].subject.as_str(), "http://e.org/a/sub/x");
    }
}
