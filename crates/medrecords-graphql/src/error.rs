//! Error types for GraphQL operations.
//!
//! These cover failures outside query execution (bad transport parameters,
//! schema construction). Errors raised inside resolvers travel in the
//! response's `errors` array instead.

use thiserror::Error;

/// Errors that can occur around GraphQL execution.
#[derive(Debug, Error)]
pub enum GraphQLError {
    /// Schema build failed.
    #[error("Failed to build GraphQL schema: {0}")]
    SchemaBuildFailed(String),

    /// Invalid request (missing query, malformed variables).
    #[error("Invalid GraphQL request: {0}")]
    InvalidQuery(String),

    /// Storage error.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GraphQLError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidQuery(_) => 400,
            Self::Storage(_) => 502,
            Self::SchemaBuildFailed(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code placed in `extensions.code`.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::SchemaBuildFailed(_) => "SCHEMA_BUILD_FAILED",
            Self::InvalidQuery(_) => "BAD_REQUEST",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<medrecords_storage::StorageError> for GraphQLError {
    fn from(err: medrecords_storage::StorageError) -> Self {
        Self::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medrecords_storage::StorageError;

    #[test]
    fn test_status_codes() {
        assert_eq!(GraphQLError::InvalidQuery("x".into()).status_code(), 400);
        assert_eq!(GraphQLError::Storage("x".into()).status_code(), 502);
        assert_eq!(GraphQLError::Internal("x".into()).status_code(), 500);
        assert_eq!(
            GraphQLError::SchemaBuildFailed("x".into()).status_code(),
            500
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            GraphQLError::InvalidQuery("x".into()).error_code(),
            "BAD_REQUEST"
        );
        assert_eq!(
            GraphQLError::SchemaBuildFailed("x".into()).error_code(),
            "SCHEMA_BUILD_FAILED"
        );
    }

    #[test]
    fn test_from_storage_error_keeps_message() {
        let err: GraphQLError = StorageError::backend("quota exceeded").into();
        assert!(matches!(err, GraphQLError::Storage(_)));
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[test]
    fn test_display_prefixes_variant() {
        assert_eq!(
            GraphQLError::InvalidQuery("variables must be a JSON object".into()).to_string(),
            "Invalid GraphQL request: variables must be a JSON object"
        );
        assert_eq!(
            GraphQLError::SchemaBuildFailed("duplicate type".into()).to_string(),
            "Failed to build GraphQL schema: duplicate type"
        );
    }
}
