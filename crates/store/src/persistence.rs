//! The persistence interface consumed by the GraphQL API.
//!
//! Storage engines implement [`EntityStore`] once per entity type and expose
//! them together through [`Persistence`]. The API never touches a connection
//! directly, so the PostgreSQL [`Store`](crate::Store) and the
//! [`InMemoryStore`](crate::InMemoryStore) are interchangeable.

use async_trait::async_trait;
use blogql_common_types::Id;

use crate::entity::Entity;
use crate::models::{Blog, BlogComment, BlogPost, Profile, User};

/// Equality filter on one of an entity's filterable columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter<C> {
    pub column: C,
    pub value: Id,
}

impl<C> Filter<C> {
    pub fn eq(column: C, value: impl Into<Id>) -> Self {
        Self {
            column,
            value: value.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{entity} with id {id:?} does not exist")]
    NotFound { entity: &'static str, id: Id },
    /// A uniqueness or referential constraint rejected the write.
    #[error("constraint violation: {0}")]
    Constraint(String),
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl StoreError {
    pub fn not_found<E: Entity>(id: impl Into<Id>) -> Self {
        Self::NotFound {
            entity: E::SCHEMA.name,
            id: id.into(),
        }
    }
}

/// Storage operations for a single entity type.
#[async_trait]
pub trait EntityStore<E: Entity>: Send + Sync {
    async fn get_by_id(&self, id: &str) -> Result<Option<E>, StoreError>;

    /// Fetches every record whose id is in `ids`. Missing ids are skipped and
    /// the result order is unspecified. Stores that can do better than one
    /// lookup per id should override this.
    async fn get_many_by_ids(&self, ids: &[Id]) -> Result<Vec<E>, StoreError> {
        let mut found = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(record) = self.get_by_id(id).await? {
                found.push(record);
            }
        }
        Ok(found)
    }

    /// Returns all records matching `filter` (or all records, if there's no
    /// filter) in insertion order.
    async fn find_many(&self, filter: Option<Filter<E::Column>>) -> Result<Vec<E>, StoreError>;

    async fn create(&self, new: E::New) -> Result<E, StoreError>;

    /// Merges `changes` onto the stored record. Fails with
    /// [`StoreError::NotFound`] if there's no record with the given id.
    async fn update(&self, id: &str, changes: E::Changes) -> Result<E, StoreError>;
}

/// All entity stores of a storage engine.
pub trait Persistence: Send + Sync + 'static {
    fn users(&self) -> &dyn EntityStore<User>;
    fn profiles(&self) -> &dyn EntityStore<Profile>;
    fn blogs(&self) -> &dyn EntityStore<Blog>;
    fn blog_posts(&self) -> &dyn EntityStore<BlogPost>;
    fn blog_comments(&self) -> &dyn EntityStore<BlogComment>;
}
