use serde::Serialize;

use crate::storage::StorageError;

#[derive(Debug, thiserror::Error, Serialize)]
pub enum ServiceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A persisted container could not be decoded.
    #[error("Corrupt persisted state under '{key}': {message}")]
    CorruptState { key: String, message: String },

    #[error("Storage error: {0}")]
    StorageError(
        #[from]
        #[serde(skip)]
        StorageError,
    ),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Export error: {0}")]
    ExportError(String),

    /// A derived amount does not fit the decimal range.
    #[error("Value out of range: {0}")]
    ValueOverflow(String),

    #[error("Other error: {0}")]
    Other(
        #[from]
        #[serde(skip)]
        anyhow::Error,
    ),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::SerializationError(err.to_string())
    }
}

impl From<csv::Error> for ServiceError {
    fn from(err: csv::Error) -> Self {
        ServiceError::ExportError(err.to_string())
    }
}

impl ServiceError {
    /// Convenience constructor for a missing entity of the given kind.
    pub fn not_found(kind: &str, id: &str) -> Self {
        ServiceError::NotFound(format!("{} with ID {} not found", kind, id))
    }

    pub fn corrupt_state(key: impl Into<String>, message: impl Into<String>) -> Self {
        ServiceError::CorruptState {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Short machine-readable code, used in JSON output.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::NotFound(_) => "not_found",
            ServiceError::ValidationError(_) => "validation_error",
            ServiceError::InvalidInput(_) => "invalid_input",
            ServiceError::CorruptState { .. } => "corrupt_state",
            ServiceError::StorageError(_) => "storage_error",
            ServiceError::SerializationError(_) => "serialization_error",
            ServiceError::ExportError(_) => "export_error",
            ServiceError::ValueOverflow(_) => "value_overflow",
            ServiceError::Other(_) => "internal_error",
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_the_entity() {
        let err = ServiceError::not_found("Product", "42");
        assert_eq!(err.to_string(), "Not found: Product with ID 42 not found");
        assert_eq!(err.code(), "not_found");
    }

    #[test]
    fn json_errors_become_serialization_errors() {
        let parse = serde_json::from_str::<Vec<u32>>("[1, 2").unwrap_err();
        let err: ServiceError = parse.into();
        assert_eq!(err.code(), "serialization_error");
    }

    #[test]
    fn corrupt_state_carries_the_key() {
        let err = ServiceError::corrupt_state("inventory-products", "expected value");
        assert!(err.to_string().contains("inventory-products"));
    }
}
