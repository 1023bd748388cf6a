use std::path::PathBuf;

/// Errors surfaced by the ingest binary.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: terrapin_turtle::ParseError,
    },

    #[error("no .ttl files found in the given inputs")]
    NoInputs,

    #[error("failed to serialize graph: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, IngestError>;
