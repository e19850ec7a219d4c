//! Error types for the hashring crate.
//!
//! Ring operations themselves never fail; these errors only come out of
//! parsing caller-supplied node descriptions.

/// Result type alias for the hashring crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while describing nodes for the ring.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Node description is malformed (e.g. empty name).
    #[error("invalid node: {0}")]
    InvalidNode(String),
    /// Weight part of a node description is not a number.
    #[error("invalid weight {value:?} for node {node:?}")]
    InvalidWeight { node: String, value: String },
}
