use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during item construction, computation or export.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FacturaeError {
    /// Malformed caller input (items, adjustments, taxes or required invoice fields).
    #[error("validation failed: {0}")]
    Validation(String),

    /// The precision table has no entry for a field that must be rendered.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The signature injector refused to sign the document.
    #[error(transparent)]
    Signing(#[from] SigningError),

    /// An extension hook aborted the export.
    #[error("extension error: {0}")]
    Extension(String),

    /// Persisting the assembled document failed.
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// XML generation error.
    #[error("XML error: {0}")]
    Xml(String),
}

impl FacturaeError {
    /// Collapse a list of validation errors into a single `Validation` error.
    pub fn from_validation(errors: &[ValidationError]) -> Self {
        let msg = errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        Self::Validation(msg)
    }
}

/// Failure reported by a [`Signer`](crate::export::Signer) implementation.
#[derive(Debug, Error)]
#[error("signing failed: {message}")]
pub struct SigningError {
    pub message: String,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl SigningError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// A single validation error with field path and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Path to the invalid field (e.g. "items[0].discounts[1]").
    pub field: String,
    /// Human-readable error description.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}
