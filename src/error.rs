use thiserror::Error;

/// Error taxonomy for the data-access layer.
///
/// Each pipeline stage fails with its own variant and the first failure is
/// returned to the caller verbatim, so callers can tell configuration
/// mistakes from bad input from database-side failures without unwrapping a
/// generic error type.
#[derive(Debug, Error)]
pub enum DalError {
    /// No template source was configured on the facade.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The template name did not resolve to existing content.
    #[error("Template not found: {0}")]
    NotFound(String),

    /// The template source produced content that could not be read.
    #[error("Template read error: {0}")]
    ReadError(String),

    /// A placeholder in the template has no entry in the parameter mapping.
    #[error("Missing parameter: {0}")]
    MissingParameter(String),

    /// The database rejected the rewritten SQL text.
    #[error("Prepare error: {0}")]
    PrepareError(String),

    /// Execution against the prepared statement failed.
    #[error("SQL execution error: {0}")]
    ExecError(String),
}

impl DalError {
    /// Whether this error was produced before any database interaction.
    #[must_use]
    pub fn is_pre_database(&self) -> bool {
        matches!(
            self,
            DalError::ConfigError(_)
                | DalError::NotFound(_)
                | DalError::ReadError(_)
                | DalError::MissingParameter(_)
        )
    }
}
