//! Error definitions for the I/O edges of code generation.
//!
//! Generation itself never fails: unsupported field types are reported as
//! [`crate::ast::Diagnostic`] values instead.

use thiserror::Error;

#[derive(Debug, Error)]
/// Top-level error type returned by public APIs.
pub enum CodegenError {
    /// Input schema JSON could not be read as a schema description.
    #[error("schema error: {0}")]
    SchemaError(String),
    /// Configuration file or command-line override could not be parsed.
    #[error("config error: {0}")]
    ConfigError(String),
    /// Filesystem I/O error from CLI or callers that propagate I/O.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
