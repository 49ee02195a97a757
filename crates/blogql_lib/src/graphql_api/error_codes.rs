//! Tags errors raised by async-graphql itself (syntax errors, query
//! validation, argument parsing and input validators) with the
//! `VALIDATION_ERROR` code, so every error a client sees carries a code.

use std::sync::Arc;

use async_graphql::extensions::{
    Extension, ExtensionContext, ExtensionFactory, NextParseQuery, NextResolve, NextValidation,
    ResolveInfo,
};
use async_graphql::parser::types::ExecutableDocument;
use async_graphql::{ServerError, ServerResult, ValidationResult, Value, Variables};

use crate::errors::ApiError;

pub struct ValidationErrorCodes;

impl ExtensionFactory for ValidationErrorCodes {
    fn create(&self) -> Arc<dyn Extension> {
        Arc::new(ValidationErrorCodesExtension)
    }
}

struct ValidationErrorCodesExtension;

#[async_trait::async_trait]
impl Extension for ValidationErrorCodesExtension {
    async fn parse_query(
        &self,
        ctx: &ExtensionContext<'_>,
        query: &str,
        variables: &Variables,
        next: NextParseQuery<'_>,
    ) -> ServerResult<ExecutableDocument> {
        next.run(ctx, query, variables).await.map_err(with_code)
    }

    async fn validation(
        &self,
        ctx: &ExtensionContext<'_>,
        next: NextValidation<'_>,
    ) -> Result<ValidationResult, Vec<ServerError>> {
        next.run(ctx)
            .await
            .map_err(|errors| errors.into_iter().map(with_code).collect())
    }

    async fn resolve(
        &self,
        ctx: &ExtensionContext<'_>,
        info: ResolveInfo<'_>,
        next: NextResolve<'_>,
    ) -> ServerResult<Option<Value>> {
        // Resolvers only fail with an `ApiError`, which always has a code. An
        // error without one was raised while parsing the field's arguments.
        next.run(ctx, info).await.map_err(with_code)
    }
}

/// Adds the validation code unless the error already has a code.
fn with_code(mut err: ServerError) -> ServerError {
    let extensions = err.extensions.get_or_insert_with(Default::default);
    if extensions.get("code").is_none() {
        extensions.set("code", ApiError::VALIDATION_CODE);
    }
    err
}

#[cfg(test)]
mod tests {
    use async_graphql::ErrorExtensions;

    use super::*;

    fn code(err: &ServerError) -> Option<&Value> {
        err.extensions.as_ref().and_then(|ext| ext.get("code"))
    }

    #[test]
    fn uncoded_errors_become_validation_errors() {
        let err = with_code(ServerError::new("invalid email", None));
        assert_eq!(code(&err), Some(&Value::from("VALIDATION_ERROR")));
    }

    #[test]
    fn existing_codes_are_kept() {
        let err = ApiError::NotFound {
            entity: "Blog",
            id: "b9".to_string(),
        }
        .extend()
        .into_server_error(Default::default());

        let err = with_code(err);
        assert_eq!(code(&err), Some(&Value::from("NOT_FOUND")));
    }
}
