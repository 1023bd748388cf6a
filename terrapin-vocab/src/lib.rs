//! RDF vocabulary constants shared across the Terrapin workspace.
//!
//! All IRIs are stored fully expanded. Constants are grouped by the
//! vocabulary they come from:
//! - `rdf`  - http://www.w3.org/1999/02/22-rdf-syntax-ns#
//! - `rdfs` - http://www.w3.org/2000/01/rdf-schema#
//! - `xsd`  - http://www.w3.org/2001/XMLSchema#

/// RDF vocabulary
pub mod rdf {
    /// rdf:type (the expansion of the Turtle `a` keyword)
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

    /// rdf:langString (datatype of language-tagged literals)
    pub const LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";

    /// rdf:first (RDF collection head)
    pub const FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";

    /// rdf:rest (RDF collection tail)
    pub const REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";

    /// rdf:nil (RDF collection terminator)
    pub const NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";
}

/// RDFS vocabulary
pub mod rdfs {
    /// rdfs:subClassOf
    pub const SUB_CLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";

    /// rdfs:subPropertyOf
    pub const SUB_PROPERTY_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subPropertyOf";

    /// rdfs:label
    pub const LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
}

/// XSD datatype vocabulary
pub mod xsd {
    /// xsd:string (default datatype of plain string literals)
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

    /// xsd:boolean
    pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";

    /// xsd:integer
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";

    /// xsd:decimal
    pub const DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";

    /// xsd:double
    pub const DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";

    /// xsd:date
    pub const DATE: &str = "http://www.w3.org/2001/XMLSchema#date";

    /// xsd:dateTime
    pub const DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";

    /// xsd:anyURI
    pub const ANY_URI: &str = "http://www.w3.org/2001/XMLSchema#anyURI";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespaces_are_consistent() {
        for iri in [rdf::TYPE, rdf::LANG_STRING, rdf::FIRST, rdf::REST, rdf::NIL] {
            assert!(iri.starts_with("http://www.w3.org/1999/02/22-rdf-syntax-ns#"));
        }
        for iri in [rdfs::SUB_CLASS_OF, rdfs::SUB_PROPERTY_OF, rdfs::LABEL] {
            assert!(iri.starts_with("http://www.w3.org/2000/01/rdf-schema#"));
        }
        for iri in [xsd::STRING, xsd::BOOLEAN, xsd::INTEGER, xsd::DECIMAL, xsd::DOUBLE] {
            assert!(iri.starts_with("http://www.w3.org/2001/XMLSchema#"));
        }
    }
}
