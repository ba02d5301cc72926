use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Failure to bring an index directory into memory.
///
/// Any of these leaves the caller without a store; there is no partially
/// loaded state.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Artifact not found: {}", path.display())]
    MissingArtifact { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt {artifact} artifact: {reason}")]
    Corrupt { artifact: &'static str, reason: String },

    #[error("Invalid document at position {position}: {reason}")]
    InvalidDocument { position: usize, reason: String },

    #[error("Dimension mismatch: vectorizer produces {vectorizer}D vectors, index holds {index}D vectors")]
    DimensionMismatch { vectorizer: usize, index: usize },

    #[error("Count mismatch: index holds {vectors} vectors but there are {documents} documents")]
    CountMismatch { vectors: usize, documents: usize },

    #[error("Checksum mismatch for {artifact}: manifest has {expected}, file has {actual}")]
    ChecksumMismatch {
        artifact: String,
        expected: String,
        actual: String,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("top_k must be a positive integer")]
    InvalidTopK,

    #[error("Query vector has {actual} dimensions, index expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Query vector contains non-finite components")]
    DegenerateVector,
}
