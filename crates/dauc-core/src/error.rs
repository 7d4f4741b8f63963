//! Unified error types for the dauc workspace
//!
//! [`DaucError`] covers every failure that can cross a crate boundary:
//! reading case files, validating data, assembling a model and talking to a
//! solver backend. Solver *outcomes* such as infeasibility are not errors;
//! they are reported through [`crate::SolveStatus`].
//!
//! # Example
//!
//! ```ignore
//! use dauc_core::{DaucError, DaucResult};
//!
//! fn run(path: &str) -> DaucResult<()> {
//!     let case = load_case(path)?;
//!     case.validate()?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Unified error type for all dauc operations.
#[derive(Error, Debug)]
pub enum DaucError {
    /// I/O errors (file access)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing/deserialization errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Case data validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Model construction errors (bad variable references, malformed cones)
    #[error("Model error: {0}")]
    Model(String),

    /// Solver/backend errors
    #[error("Solver error: {0}")]
    Solver(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic errors (for wrapping external errors)
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Results using DaucError.
pub type DaucResult<T> = Result<T, DaucError>;

impl From<anyhow::Error> for DaucError {
    fn from(err: anyhow::Error) -> Self {
        DaucError::Other(err.to_string())
    }
}

impl From<String> for DaucError {
    fn from(s: String) -> Self {
        DaucError::Other(s)
    }
}

impl From<&str> for DaucError {
    fn from(s: &str) -> Self {
        DaucError::Other(s.to_string())
    }
}

impl From<serde_json::Error> for DaucError {
    fn from(err: serde_json::Error) -> Self {
        DaucError::Parse(err.to_string())
    }
}
