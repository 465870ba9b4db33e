//! Error types for GCL core operations.
//!
//! This module defines well-structured error types using `thiserror` for
//! library-level errors, while higher-level code can use `anyhow` for
//! convenient error handling.
//!
//! "No match" is never an error: probes report it through the sentinel
//! intervals and iteration simply ends.

use thiserror::Error;

/// Result type alias using GclError
pub type Result<T> = std::result::Result<T, GclError>;

/// Core error types for GCL operations.
#[derive(Error, Debug)]
pub enum GclError {
    // === Query Construction Errors ===
    /// The operator exists in the query language but has no evaluator
    #[error("operator not implemented: {operator}")]
    NotImplemented { operator: &'static str },

    /// A numbered parameter was referenced but no argument was supplied for it
    #[error("unbound parameter %{index}: only {supplied} argument(s) supplied")]
    UnboundParameter { index: usize, supplied: usize },

    /// The query text could not be parsed
    #[error("syntax error at offset {offset}: {reason}")]
    Syntax { offset: usize, reason: String },

    /// A factory was called with arguments that describe no valid generator
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    // === Evaluation Errors ===
    /// A retry loop ran past its iteration guard
    #[error("iteration limit of {limit} exceeded in {operator}")]
    IterationLimitExceeded { operator: &'static str, limit: usize },

    // === Configuration Errors ===
    /// Configuration file parsing failed
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    // === I/O Errors ===
    /// Generic I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GclError {
    /// Returns true if this error was caused by the query itself (its text,
    /// its arguments, or an unsupported operator) rather than by the
    /// environment or an internal fault.
    pub fn is_query_error(&self) -> bool {
        matches!(
            self,
            GclError::NotImplemented { .. }
                | GclError::UnboundParameter { .. }
                | GclError::Syntax { .. }
                | GclError::InvalidArgument { .. }
        )
    }

    /// Create an invalid argument error
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        GclError::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Create a syntax error at the given byte offset
    pub fn syntax(offset: usize, reason: impl Into<String>) -> Self {
        GclError::Syntax {
            offset,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_query_error() {
        let err = GclError::UnboundParameter {
            index: 3,
            supplied: 1,
        };
        assert!(err.is_query_error());

        let err = GclError::NotImplemented {
            operator: "NotContaining",
        };
        assert!(err.is_query_error());

        let err = GclError::IterationLimitExceeded {
            operator: "Containing",
            limit: 10,
        };
        assert!(!err.is_query_error());
    }

    #[test]
    fn test_messages_name_the_problem() {
        let err = GclError::UnboundParameter {
            index: 2,
            supplied: 1,
        };
        assert_eq!(
            err.to_string(),
            "unbound parameter %2: only 1 argument(s) supplied"
        );

        let err = GclError::syntax(4, "unexpected `)`");
        assert_eq!(err.to_string(), "syntax error at offset 4: unexpected `)`");
    }
}
