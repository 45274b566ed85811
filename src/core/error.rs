use thiserror::Error;

/// Errors that can occur while building inputs or calculating tax.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TaxError {
    /// The order draft is structurally invalid (caller error).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An amount left the representable range.
    #[error("arithmetic error: {0}")]
    Arithmetic(String),

    /// A profile or draft document could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// Builder encountered invalid or missing configuration.
    #[error("builder error: {0}")]
    Builder(String),
}

impl TaxError {
    /// Collapse a list of diagnostics into one `InvalidInput` error.
    pub(crate) fn invalid_input(errors: &[ValidationError]) -> Self {
        let msg = errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        Self::InvalidInput(msg)
    }
}

/// A single diagnostic with field path and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dot-separated path to the offending field (e.g. "lines[2].quantity").
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
