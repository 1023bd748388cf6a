//! The single error kind of Turtle ingestion.
//!
//! Any failure aborts the whole batch: the first malformed token, undeclared
//! prefix, or unresolvable IRI surfaces immediately and no partial tables are
//! produced.

/// Error raised when the input stream is not well-formed Turtle.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Lexical or grammatical error, with source position.
    #[error("syntax error at line {line}, column {column}: {message}")]
    Syntax {
        /// 1-indexed source line
        line: usize,
        /// 1-indexed source column
        column: usize,
        /// What went wrong, possibly with a rendered source excerpt
        message: String,
    },

    /// A prefixed name used a prefix that was never declared.
    #[error("undefined prefix '{prefix}:' at line {line}, column {column}")]
    UndefinedPrefix {
        /// The undeclared prefix (without the colon)
        prefix: String,
        /// 1-indexed source line
        line: usize,
        /// 1-indexed source column
        column: usize,
    },

    /// A relative IRI could not be resolved.
    #[error("cannot resolve IRI reference '{reference}': {reason}")]
    IriResolution {
        /// The offending reference
        reference: String,
        /// Why resolution failed
        reason: String,
    },
}

/// Result alias for Turtle operations.
pub type Result<T> = std::result::Result<T, ParseError>;

impl ParseError {
    /// Create a syntax error at a byte offset into `src`.
    pub(crate) fn syntax(src: &str, offset: usize, message: impl Into<String>) -> Self {
        let (line, column) = line_col(src, offset);
        ParseError::Syntax {
            line,
            column,
            message: message.into(),
        }
    }

    /// Create an undefined-prefix error at a byte offset into `src`.
    pub(crate) fn undefined_prefix(src: &str, offset: usize, prefix: impl Into<String>) -> Self {
        let (line, column) = line_col(src, offset);
        ParseError::UndefinedPrefix {
            prefix: prefix.into(),
            line,
            column,
        }
    }

    /// Create an IRI resolution error.
    pub(crate) fn iri(reference: impl Into<String>, reason: impl Into<String>) -> Self {
        ParseError::IriResolution {
            reference: reference.into(),
            reason: reason.into(),
        }
    }
}

/// Convert a byte offset to a 1-indexed (line, column) pair.
pub(crate) fn line_col(src: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut column = 1;
    for (i, c) in src.char_indices() {
        if i >= offset {
            break;
        }
        if c == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}

/// The content of a 1-indexed source line, for diagnostics.
pub(crate) fn source_line(src: &str, line: usize) -> &str {
    src.lines().nth(line.saturating_sub(1)).unwrap_or("")
}
