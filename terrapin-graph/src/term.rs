//! Term types for the triple-to-table mapping.
//!
//! Subjects and predicates are always IRIs. Objects are either a resource
//! reference (an IRI) or a literal; that distinction alone decides which
//! edge table a triple lands in.

use crate::Datatype;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// An expanded IRI, the unique key of a resource node.
///
/// Prefixed names never appear here; the parser expands them before any term
/// reaches this crate. Blank nodes are materialized with a synthetic
/// `_:label` key so they can share the resource table.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Iri(Arc<str>);

impl Iri {
    /// Create an IRI term from an expanded IRI string.
    pub fn new(iri: impl AsRef<str>) -> Self {
        Self(Arc::from(iri.as_ref()))
    }

    /// Create the synthetic resource key for a blank node label.
    ///
    /// The label should not include the `_:` prefix.
    pub fn blank(label: impl AsRef<str>) -> Self {
        Self(Arc::from(format!("_:{}", label.as_ref())))
    }

    /// The IRI as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if this key denotes a materialized blank node.
    pub fn is_blank(&self) -> bool {
        self.0.starts_with("_:")
    }
}

impl From<&str> for Iri {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Iri {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl std::fmt::Display for Iri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_blank() {
            write!(f, "{}", self.0)
        } else {
            write!(f, "<{}>", self.0)
        }
    }
}

/// Scalar storage for a literal node.
///
/// `Decimal` keeps the lexical form to preserve precision. `Double` compares
/// and hashes by bit pattern so the type has a total order.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum LiteralValue {
    /// UTF-8 string value
    String(Arc<str>),
    /// Boolean value
    Boolean(bool),
    /// Integer value (i64 range)
    Integer(i64),
    /// Decimal value, lexical form
    Decimal(Arc<str>),
    /// Floating point value
    Double(f64),
}

impl LiteralValue {
    /// Create a string value.
    pub fn string(s: impl AsRef<str>) -> Self {
        LiteralValue::String(Arc::from(s.as_ref()))
    }

    /// Create a decimal value from its lexical form.
    pub fn decimal(s: impl AsRef<str>) -> Self {
        LiteralValue::Decimal(Arc::from(s.as_ref()))
    }

    /// The lexical representation of this value.
    pub fn lexical(&self) -> String {
        match self {
            LiteralValue::String(s) => s.to_string(),
            LiteralValue::Boolean(b) => b.to_string(),
            LiteralValue::Integer(i) => i.to_string(),
            LiteralValue::Decimal(s) => s.to_string(),
            LiteralValue::Double(d) => {
                if d.is_nan() {
                    "NaN".to_string()
                } else if d.is_infinite() {
                    if d.is_sign_positive() { "INF" } else { "-INF" }.to_string()
                } else {
                    d.to_string()
                }
            }
        }
    }

    /// Try to get as a string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            LiteralValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as an integer.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            LiteralValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            LiteralValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl PartialEq for LiteralValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (LiteralValue::String(a), LiteralValue::String(b)) => a == b,
            (LiteralValue::Boolean(a), LiteralValue::Boolean(b)) => a == b,
            (LiteralValue::Integer(a), LiteralValue::Integer(b)) => a == b,
            (LiteralValue::Decimal(a), LiteralValue::Decimal(b)) => a == b,
            (LiteralValue::Double(a), LiteralValue::Double(b)) => a.to_bits() == b.to_bits(),
            _ => false,
        }
    }
}

impl Eq for LiteralValue {}

impl Hash for LiteralValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            LiteralValue::String(s) => s.hash(state),
            LiteralValue::Boolean(b) => b.hash(state),
            LiteralValue::Integer(i) => i.hash(state),
            LiteralValue::Decimal(s) => s.hash(state),
            LiteralValue::Double(d) => d.to_bits().hash(state),
        }
    }
}

impl PartialOrd for LiteralValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LiteralValue {
    fn cmp(&self, other: &Self) -> Ordering {
        fn rank(v: &LiteralValue) -> u8 {
            match v {
                LiteralValue::String(_) => 0,
                LiteralValue::Boolean(_) => 1,
                LiteralValue::Integer(_) => 2,
                LiteralValue::Decimal(_) => 3,
                LiteralValue::Double(_) => 4,
            }
        }

        match rank(self).cmp(&rank(other)) {
            Ordering::Equal => {}
            ord => return ord,
        }

        match (self, other) {
            (LiteralValue::String(a), LiteralValue::String(b)) => a.cmp(b),
            (LiteralValue::Boolean(a), LiteralValue::Boolean(b)) => a.cmp(b),
            (LiteralValue::Integer(a), LiteralValue::Integer(b)) => a.cmp(b),
            (LiteralValue::Decimal(a), LiteralValue::Decimal(b)) => a.cmp(b),
            (LiteralValue::Double(a), LiteralValue::Double(b)) => a
                .partial_cmp(b)
                .unwrap_or_else(|| a.to_bits().cmp(&b.to_bits())),
            _ => Ordering::Equal,
        }
    }
}

/// A literal node: scalar value, explicit datatype, optional language tag.
///
/// Literal nodes have no key; duplicates across triples are permitted and
/// each occurrence gets its own row in the literal table.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Literal {
    /// The scalar value
    pub value: LiteralValue,
    /// Datatype IRI, always present
    pub datatype: Datatype,
    /// Language tag, only set when datatype is rdf:langString
    pub language: Option<Arc<str>>,
}

impl Literal {
    /// Plain string literal (xsd:string).
    pub fn string(value: impl AsRef<str>) -> Self {
        Self {
            value: LiteralValue::string(value),
            datatype: Datatype::xsd_string(),
            language: None,
        }
    }

    /// Integer literal (xsd:integer).
    pub fn integer(value: i64) -> Self {
        Self {
            value: LiteralValue::Integer(value),
            datatype: Datatype::xsd_integer(),
            language: None,
        }
    }

    /// Boolean literal (xsd:boolean).
    pub fn boolean(value: bool) -> Self {
        Self {
            value: LiteralValue::Boolean(value),
            datatype: Datatype::xsd_boolean(),
            language: None,
        }
    }

    /// Double literal (xsd:double).
    pub fn double(value: f64) -> Self {
        Self {
            value: LiteralValue::Double(value),
            datatype: Datatype::xsd_double(),
            language: None,
        }
    }

    /// Decimal literal (xsd:decimal), lexical form preserved.
    pub fn decimal(value: impl AsRef<str>) -> Self {
        Self {
            value: LiteralValue::decimal(value),
            datatype: Datatype::xsd_decimal(),
            language: None,
        }
    }

    /// Typed literal with an explicit datatype IRI.
    pub fn typed(value: impl AsRef<str>, datatype: Datatype) -> Self {
        Self {
            value: LiteralValue::string(value),
            datatype,
            language: None,
        }
    }

    /// Language-tagged string literal (rdf:langString).
    pub fn lang_string(value: impl AsRef<str>, lang: impl AsRef<str>) -> Self {
        Self {
            value: LiteralValue::string(value),
            datatype: Datatype::lang_string(),
            language: Some(Arc::from(lang.as_ref())),
        }
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\"", self.value.lexical())?;
        if let Some(lang) = &self.language {
            write!(f, "@{}", lang)
        } else if !self.datatype.is_xsd_string() {
            write!(f, "^^<{}>", self.datatype.as_iri())
        } else {
            Ok(())
        }
    }
}

/// The object position of a triple.
///
/// This enum is the entire edge-category decision: a `Resource` object
/// produces a resource→resource edge, a `Literal` object produces a
/// resource→literal edge.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Object {
    /// An IRI reference to a resource node
    Resource(Iri),
    /// A literal node value
    Literal(Literal),
}

impl Object {
    /// True if the object is a resource reference.
    pub fn is_resource(&self) -> bool {
        matches!(self, Object::Resource(_))
    }

    /// True if the object is a literal.
    pub fn is_literal(&self) -> bool {
        matches!(self, Object::Literal(_))
    }

    /// Try to get the resource IRI.
    pub fn as_resource(&self) -> Option<&Iri> {
        match self {
            Object::Resource(iri) => Some(iri),
            Object::Literal(_) => None,
        }
    }

    /// Try to get the literal.
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Object::Literal(lit) => Some(lit),
            Object::Resource(_) => None,
        }
    }
}

impl From<Iri> for Object {
    fn from(iri: Iri) -> Self {
        Object::Resource(iri)
    }
}

impl From<Literal> for Object {
    fn from(lit: Literal) -> Self {
        Object::Literal(lit)
    }
}

impl std::fmt::Display for Object {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Object::Resource(iri) => write!(f, "{}", iri),
            Object::Literal(lit) => write!(f, "{}", lit),
        }
    }
}

/// A single RDF statement, the atomic unit of ingestion.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Triple {
    /// Subject resource key
    pub subject: Iri,
    /// Predicate IRI (stored as an edge attribute, never as a node)
    pub predicate: Iri,
    /// Object term
    pub object: Object,
}

impl Triple {
    /// Create a triple from its three components.
    pub fn new(subject: Iri, predicate: Iri, object: Object) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }
}

impl std::fmt::Display for Triple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}
