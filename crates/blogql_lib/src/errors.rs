//! Errors surfaced to GraphQL clients. Each variant maps to a stable
//! `extensions.code`.

use std::sync::Arc;

use async_graphql::ErrorExtensions;
use blogql_common_types::Id;
use blogql_store::StoreError;

#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    /// Missing or malformed input, detected before touching the store.
    #[error("{0}")]
    Validation(String),
    #[error("{entity} with id {id:?} does not exist")]
    NotFound { entity: &'static str, id: Id },
    /// The store failed, or rejected a write.
    #[error("{operation}: {source}")]
    Collaborator {
        operation: String,
        source: Arc<StoreError>,
    },
    #[error("{0}")]
    InvariantViolation(String),
}

impl ApiError {
    pub const VALIDATION_CODE: &'static str = "VALIDATION_ERROR";

    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => Self::VALIDATION_CODE,
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Collaborator { .. } => "COLLABORATOR_ERROR",
            Self::InvariantViolation(_) => "INVARIANT_VIOLATION",
        }
    }

    /// Wraps a store error with the name of the operation that caused it.
    /// [`StoreError::NotFound`] is the only store error clients can act on,
    /// so it keeps its own code.
    pub fn collaborator(operation: impl Into<String>, err: impl Into<Arc<StoreError>>) -> Self {
        let err = err.into();
        match &*err {
            StoreError::NotFound { entity, id } => Self::NotFound {
                entity: *entity,
                id: id.clone(),
            },
            _ => Self::Collaborator {
                operation: operation.into(),
                source: err,
            },
        }
    }
}

impl ErrorExtensions for ApiError {
    fn extend(&self) -> async_graphql::Error {
        let code = self.code();
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| e.set("code", code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_not_found_keeps_its_code() {
        let err = ApiError::collaborator(
            "updateBlog",
            StoreError::NotFound {
                entity: "Blog",
                id: "b9".to_string(),
            },
        );
        assert_eq!(err.code(), "NOT_FOUND");
        assert_eq!(err.to_string(), "Blog with id \"b9\" does not exist");
    }

    #[test]
    fn collaborator_errors_name_the_operation() {
        let err = ApiError::collaborator(
            "createBlog",
            StoreError::Constraint("authorId \"u9\" references a missing User".to_string()),
        );
        assert_eq!(err.code(), "COLLABORATOR_ERROR");
        assert!(err.to_string().starts_with("createBlog: constraint violation"));
    }

    #[test]
    fn extensions_carry_the_code() {
        let err = ApiError::InvariantViolation("two profiles".to_string()).extend();
        let code = err
            .extensions
            .as_ref()
            .and_then(|ext| ext.get("code"))
            .cloned();
        assert_eq!(code, Some(async_graphql::Value::from("INVARIANT_VIOLATION")));
    }
}
