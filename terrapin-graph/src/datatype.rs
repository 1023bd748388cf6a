//! Literal datatype representation.
//!
//! Datatypes are never optional in this model: plain strings carry
//! `xsd:string` and language-tagged strings carry `rdf:langString`.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use terrapin_vocab::{rdf, xsd};

/// An expanded datatype IRI attached to a literal node.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Datatype(Arc<str>);

impl Datatype {
    /// Create a datatype from an expanded IRI.
    pub fn from_iri(iri: impl AsRef<str>) -> Self {
        Self(Arc::from(iri.as_ref()))
    }

    /// xsd:string, the default for plain string literals.
    pub fn xsd_string() -> Self {
        Self(Arc::from(xsd::STRING))
    }

    /// xsd:boolean
    pub fn xsd_boolean() -> Self {
        Self(Arc::from(xsd::BOOLEAN))
    }

    /// xsd:integer
    pub fn xsd_integer() -> Self {
        Self(Arc::from(xsd::INTEGER))
    }

    /// xsd:decimal
    pub fn xsd_decimal() -> Self {
        Self(Arc::from(xsd::DECIMAL))
    }

    /// xsd:double
    pub fn xsd_double() -> Self {
        Self(Arc::from(xsd::DOUBLE))
    }

    /// rdf:langString, the datatype of language-tagged literals.
    pub fn lang_string() -> Self {
        Self(Arc::from(rdf::LANG_STRING))
    }

    /// The expanded IRI of this datatype.
    pub fn as_iri(&self) -> &str {
        &self.0
    }

    /// True for xsd:string.
    pub fn is_xsd_string(&self) -> bool {
        self.0.as_ref() == xsd::STRING
    }

    /// True for rdf:langString.
    pub fn is_lang_string(&self) -> bool {
        self.0.as_ref() == rdf::LANG_STRING
    }

    /// True for the numeric XSD types this model can produce.
    pub fn is_numeric(&self) -> bool {
        matches!(self.0.as_ref(), xsd::INTEGER | xsd::DECIMAL | xsd::DOUBLE)
    }
}

impl std::fmt::Display for Datatype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_expand_to_vocab_iris() {
        assert_eq!(Datatype::xsd_string().as_iri(), xsd::STRING);
        assert_eq!(Datatype::xsd_integer().as_iri(), xsd::INTEGER);
        assert_eq!(Datatype::lang_string().as_iri(), rdf::LANG_STRING);
    }

    #[test]
    fn predicates() {
        assert!(Datatype::xsd_string().is_xsd_string());
        assert!(!Datatype::xsd_string().is_numeric());
        assert!(Datatype::lang_string().is_lang_string());
        assert!(Datatype::xsd_integer().is_numeric());
        assert!(Datatype::xsd_double().is_numeric());
    }

    #[test]
    fn from_iri_roundtrips() {
        let dt = Datatype::from_iri("http://www.w3.org/2001/XMLSchema#date");
        assert_eq!(dt.as_iri(), "http://www.w3.org/2001/XMLSchema#date");
        assert!(!dt.is_xsd_string());
    }
}
