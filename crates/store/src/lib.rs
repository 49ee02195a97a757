//! Persistence for users, profiles, blogs, blog posts and blog comments.
//!
//! The GraphQL API only ever talks to the [`Persistence`] trait. This crate
//! provides a PostgreSQL implementation ([`Store`]), an in-process one
//! ([`InMemoryStore`]) and a [`PersistenceLoader`] that batches primary-key
//! lookups on top of either.

pub mod entity;
mod loader;
mod memory;
pub mod models;
pub mod persistence;
mod schema;
mod store;

pub use entity::Entity;
pub use loader::{EntityKey, PersistenceLoader};
pub use memory::{InMemoryStore, MemoryRecord, Tables};
pub use persistence::{EntityStore, Filter, Persistence, StoreError};
pub use store::Store;
