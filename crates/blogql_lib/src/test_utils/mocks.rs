use std::collections::HashSet;
use std::sync::Mutex;

use anyhow::anyhow;
use async_trait::async_trait;
use blogql_common_types::Id;
use blogql_store::models::{Blog, BlogComment, BlogPost, Profile, User};
use blogql_store::{Entity, EntityStore, Filter, InMemoryStore, Persistence, StoreError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StoreCall {
    pub entity: &'static str,
    pub method: &'static str,
}

/// A [`Persistence`] wrapper around an [`InMemoryStore`] that records every
/// call and can be told to fail all calls for chosen entity types.
#[derive(Debug, Default)]
pub struct MockPersistence {
    inner: InMemoryStore,
    calls: Mutex<Vec<StoreCall>>,
    failing: Mutex<HashSet<&'static str>>,
}

impl MockPersistence {
    pub fn new(inner: InMemoryStore) -> Self {
        Self {
            inner,
            ..Default::default()
        }
    }

    /// Makes every subsequent call for the entity named `entity` fail.
    pub fn fail(&self, entity: &'static str) {
        self.failing.lock().unwrap().insert(entity);
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, entity: &str, method: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.entity == entity && call.method == method)
            .count()
    }

    pub fn reset_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record<E: Entity>(&self, method: &'static str) -> Result<(), StoreError> {
        let entity = E::SCHEMA.name;
        self.calls.lock().unwrap().push(StoreCall { entity, method });

        if self.failing.lock().unwrap().contains(entity) {
            Err(StoreError::Backend(anyhow!("{} store is unavailable", entity)))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl<E: Entity> EntityStore<E> for MockPersistence {
    async fn get_by_id(&self, id: &str) -> Result<Option<E>, StoreError> {
        self.record::<E>("get_by_id")?;
        E::store(&self.inner).get_by_id(id).await
    }

    async fn get_many_by_ids(&self, ids: &[Id]) -> Result<Vec<E>, StoreError> {
        self.record::<E>("get_many_by_ids")?;
        E::store(&self.inner).get_many_by_ids(ids).await
    }

    async fn find_many(&self, filter: Option<Filter<E::Column>>) -> Result<Vec<E>, StoreError> {
        self.record::<E>("find_many")?;
        E::store(&self.inner).find_many(filter).await
    }

    async fn create(&self, new: E::New) -> Result<E, StoreError> {
        self.record::<E>("create")?;
        E::store(&self.inner).create(new).await
    }

    async fn update(&self, id: &str, changes: E::Changes) -> Result<E, StoreError> {
        self.record::<E>("update")?;
        E::store(&self.inner).update(id, changes).await
    }
}

impl Persistence for MockPersistence {
    fn users(&self) -> &dyn EntityStore<User> {
        self
    }

    fn profiles(&self) -> &dyn EntityStore<Profile> {
        self
    }

    fn blogs(&self) -> &dyn EntityStore<Blog> {
        self
    }

    fn blog_posts(&self) -> &dyn EntityStore<BlogPost> {
        self
    }

    fn blog_comments(&self) -> &dyn EntityStore<BlogComment> {
        self
    }
}
