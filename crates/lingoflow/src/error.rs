use std::path::PathBuf;
use thiserror::Error;

/// Catch-all for callers that drive config loading, storage, and
/// submission together and want a single error type to bubble up.
/// Library code itself returns the component errors.
#[derive(Error, Debug)]
pub enum LingoflowError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] crate::db::DatabaseError),

    #[error("Allocation error: {0}")]
    Allocation(#[from] crate::request::AllocationError),

    #[error("Submission error: {0}")]
    Submit(#[from] crate::bureau::SubmitError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidField { field: String, reason: String },
}

pub type Result<T> = std::result::Result<T, LingoflowError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DatabaseError;

    fn open_store() -> std::result::Result<(), DatabaseError> {
        Err(DatabaseError::LockPoisoned)
    }

    fn caller_flow() -> Result<()> {
        open_store()?;
        Ok(())
    }

    #[test]
    fn test_component_errors_convert_through_question_mark() {
        match caller_flow() {
            Err(LingoflowError::Database(DatabaseError::LockPoisoned)) => {}
            other => panic!("expected wrapped database error, got {:?}", other),
        }
    }

    #[test]
    fn test_messages_name_the_failing_component() {
        let err = LingoflowError::from(ConfigError::Validation {
            message: "unsupported version".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "Configuration error: Config validation failed: unsupported version"
        );
    }
}
