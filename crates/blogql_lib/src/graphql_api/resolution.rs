//! Lookups behind the relational fields of the GraphQL object types.
//!
//! Every function here is read-only and independent of its siblings, so
//! async-graphql is free to run them concurrently.

use blogql_store::{Entity, EntityKey, Filter};
use tracing::trace;

use super::ApiSchemaContext;
use crate::errors::ApiError;

/// Resolves a to-one relation whose target id is stored on the parent. A
/// dangling id resolves to `None`.
pub async fn one_by_local_key<E: Entity>(
    ctx: &ApiSchemaContext,
    field: &str,
    id: &str,
) -> Result<Option<E>, ApiError> {
    trace!(field, id, batched = ctx.loader.is_some(), "Resolving relation");

    match &ctx.loader {
        Some(loader) => loader
            .load_one(EntityKey::<E>::new(id))
            .await
            .map_err(|err| ApiError::collaborator(field, err)),
        None => E::store(ctx.store.as_ref())
            .get_by_id(id)
            .await
            .map_err(|err| ApiError::collaborator(field, err)),
    }
}

/// Like [`one_by_local_key`], but for nullable keys. A `None` key resolves
/// to `None` without touching the store.
pub async fn one_by_optional_local_key<E: Entity>(
    ctx: &ApiSchemaContext,
    field: &str,
    id: Option<&str>,
) -> Result<Option<E>, ApiError> {
    match id {
        Some(id) => one_by_local_key(ctx, field, id).await,
        None => Ok(None),
    }
}

/// Resolves a to-one relation whose target stores the parent's id. More than
/// one match is an error, not an arbitrary pick.
pub async fn one_by_inverse_key<E: Entity>(
    ctx: &ApiSchemaContext,
    field: &str,
    column: E::Column,
    parent_id: &str,
) -> Result<Option<E>, ApiError> {
    let mut matches = many_by_inverse_key::<E>(ctx, field, column, parent_id).await?;

    match matches.len() {
        0 | 1 => Ok(matches.pop()),
        n => Err(ApiError::InvariantViolation(format!(
            "{}: expected at most one {} with {} {:?}, found {}",
            field,
            E::SCHEMA.name,
            column,
            parent_id,
            n
        ))),
    }
}

/// Resolves a to-many relation, in insertion order.
pub async fn many_by_inverse_key<E: Entity>(
    ctx: &ApiSchemaContext,
    field: &str,
    column: E::Column,
    parent_id: &str,
) -> Result<Vec<E>, ApiError> {
    trace!(field, %column, parent_id, "Resolving relation");

    E::store(ctx.store.as_ref())
        .find_many(Some(Filter::eq(column, parent_id)))
        .await
        .map_err(|err| ApiError::collaborator(field, err))
}
