//! Error types for graph mutation, queries, and the wire codec

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Debug, Error)]
pub enum GraphError {
    /// A vertex id was looked up without upsert and is absent.
    #[error("vertex `{0}` not found")]
    NotFound(String),

    /// Compressed encoding needs more distinct tokens than the code space
    /// can represent. The caller must fall back to the raw form or
    /// partition the graph.
    #[error("dictionary capacity exceeded after {distinct} distinct tokens")]
    CapacityExceeded { distinct: usize },

    /// A payload could not be decoded. The target graph is left unmodified.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}
