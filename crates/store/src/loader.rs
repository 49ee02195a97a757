//! Batched primary-key lookups for the GraphQL layer.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::Arc;

use async_graphql::dataloader::Loader;
use blogql_common_types::Id;
use tracing::trace;

use crate::entity::Entity;
use crate::persistence::{Persistence, StoreError};

/// An id tagged with the entity type it refers to, so that a single
/// [`PersistenceLoader`] can batch lookups for every entity type without
/// mixing them up.
pub struct EntityKey<E> {
    id: Id,
    phantom: PhantomData<fn() -> E>,
}

impl<E> EntityKey<E> {
    pub fn new(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            phantom: PhantomData,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl<E> Clone for EntityKey<E> {
    fn clone(&self) -> Self {
        Self::new(self.id.clone())
    }
}

impl<E> PartialEq for EntityKey<E> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<E> Eq for EntityKey<E> {}

impl<E> Hash for EntityKey<E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<E> fmt::Debug for EntityKey<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EntityKey").field(&self.id).finish()
    }
}

pub struct PersistenceLoader {
    store: Arc<dyn Persistence>,
}

impl PersistenceLoader {
    pub fn new(store: Arc<dyn Persistence>) -> Self {
        Self { store }
    }
}

impl<E: Entity> Loader<EntityKey<E>> for PersistenceLoader {
    type Value = E;
    type Error = Arc<StoreError>;

    async fn load(&self, keys: &[EntityKey<E>]) -> Result<HashMap<EntityKey<E>, E>, Self::Error> {
        trace!(entity = E::SCHEMA.name, keys = keys.len(), "Loading batch");

        let ids: Vec<Id> = keys.iter().map(|key| key.id.clone()).collect();
        let records = E::store(self.store.as_ref())
            .get_many_by_ids(&ids)
            .await
            .map_err(Arc::new)?;

        Ok(records
            .into_iter()
            .map(|record| (EntityKey::new(record.id()), record))
            .collect())
    }
}
