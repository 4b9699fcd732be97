//! Configuration and parsing errors.
//!
//! Everything here is a setup-time failure: an unknown selector string,
//! a malformed instance file, or processing-time data that violates the
//! instance invariants. Evaluation itself never returns errors.

use thiserror::Error;

/// Errors raised while building instances and problem configurations.
#[derive(Debug, Error)]
pub enum FlowShopError {
    /// Unrecognised scheduling variant name.
    #[error("unknown flow-shop variant: {0}")]
    UnknownVariant(String),

    /// Unrecognised objective name.
    #[error("unknown objective: {0}")]
    UnknownObjective(String),

    /// Unrecognised evaluation budget name.
    #[error("unknown budget: {0}")]
    UnknownBudget(String),

    /// Instance text could not be parsed.
    #[error("parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number in the input.
        line: usize,
        /// What was expected or found.
        message: String,
    },

    /// Processing-time data is structurally invalid.
    #[error("invalid instance: {0}")]
    InvalidInstance(String),

    /// Instance file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FlowShopError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}

/// Result alias for fallible setup operations.
pub type Result<T> = std::result::Result<T, FlowShopError>;
