use rmcp::model::{ErrorCode, ErrorData};
use thiserror::Error;

/// Errors that can occur in the unreasonable thinking service
#[derive(Debug, Error)]
pub enum ThinkingError {
    #[error("Invalid input: {field} - {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Storage failure: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Connection pool error: {0}")]
    Pool(#[from] deadpool_redis::PoolError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

/// Coarse classification used when reporting failures to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    UnknownOperation,
    StorageFailure,
}

impl ThinkingError {
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ThinkingError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ThinkingError::InvalidInput { .. } | ThinkingError::Config(_) => ErrorKind::InvalidInput,
            ThinkingError::NotFound(_) => ErrorKind::NotFound,
            ThinkingError::UnknownOperation(_) => ErrorKind::UnknownOperation,
            ThinkingError::Storage(_)
            | ThinkingError::Io(_)
            | ThinkingError::Serialization(_)
            | ThinkingError::Redis(_)
            | ThinkingError::Pool(_) => ErrorKind::StorageFailure,
        }
    }
}

/// Convert ValidationError to ThinkingError
impl From<crate::validation::ValidationError> for ThinkingError {
    fn from(err: crate::validation::ValidationError) -> Self {
        use crate::validation::ValidationError;

        let field = match &err {
            ValidationError::EmptyProblem | ValidationError::ProblemTooLong { .. } => "problem",
            ValidationError::EmptyThoughtId { field } => *field,
            ValidationError::EmptyDirection => "direction",
            ValidationError::InvalidLimit => "limit",
        };
        ThinkingError::invalid_input(field, err.to_string())
    }
}

/// Convert ThinkingError to MCP-compatible ErrorData
impl From<ThinkingError> for ErrorData {
    fn from(err: ThinkingError) -> Self {
        match err.kind() {
            ErrorKind::InvalidInput | ErrorKind::NotFound => {
                ErrorData::invalid_params(err.to_string(), None)
            }
            ErrorKind::UnknownOperation => {
                ErrorData::new(ErrorCode::METHOD_NOT_FOUND, err.to_string(), None)
            }
            ErrorKind::StorageFailure => ErrorData::internal_error(err.to_string(), None),
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ThinkingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(ThinkingError::NotFound("x".into()).kind(), ErrorKind::NotFound);
        assert_eq!(
            ThinkingError::invalid_input("problem", "empty").kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(
            ThinkingError::Storage("disk full".into()).kind(),
            ErrorKind::StorageFailure
        );

        let corrupt = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(ThinkingError::from(corrupt).kind(), ErrorKind::StorageFailure);
    }

    #[test]
    fn test_error_data_codes() {
        let not_found: ErrorData = ThinkingError::NotFound("thought_1".into()).into();
        assert_eq!(not_found.code, ErrorCode::INVALID_PARAMS);
        assert!(not_found.message.contains("thought_1"));

        let unknown: ErrorData = ThinkingError::UnknownOperation("bogus".into()).into();
        assert_eq!(unknown.code, ErrorCode::METHOD_NOT_FOUND);

        let storage: ErrorData = ThinkingError::Storage("boom".into()).into();
        assert_eq!(storage.code, ErrorCode::INTERNAL_ERROR);
    }
}
