//! Error type for structural tree operations.
//!
//! Parsing has its own error type, see [ParsingError](crate::parser::ParsingError).

use thiserror::Error;

/// Errors raised by tree operations.
///
/// Every operation validates its input before touching the tree,
/// so a returned error never leaves a tree partially modified.
#[derive(Debug, Error)]
pub enum TreeError {
    /// Operation not valid for the position of a node,
    /// e.g. unpacking the root or walking between non-adjacent nodes.
    #[error("Invalid operation - {0}")]
    InvalidOperation(String),

    /// Input violates a precondition, e.g. duplicate or empty leaf names,
    /// or an outgroup that is not a subset of the leaves.
    #[error("Malformed input - {0}")]
    MalformedInput(String),

    /// A queried taxon is not present in the tree.
    #[error("Not found - {0}")]
    NotFound(String),

    /// Two trees share no leaf names.
    #[error("Trees have no overlapping taxa")]
    NoOverlap,

    /// Reading input files failed.
    #[error("IO error - {0}")]
    Io(#[from] std::io::Error),
}

impl TreeError {
    pub(crate) fn invalid_operation<S: Into<String>>(msg: S) -> Self {
        TreeError::InvalidOperation(msg.into())
    }

    pub(crate) fn malformed_input<S: Into<String>>(msg: S) -> Self {
        TreeError::MalformedInput(msg.into())
    }

    pub(crate) fn not_found<S: Into<String>>(msg: S) -> Self {
        TreeError::NotFound(msg.into())
    }
}

/// Result alias for tree operations.
pub type Result<T> = std::result::Result<T, TreeError>;
