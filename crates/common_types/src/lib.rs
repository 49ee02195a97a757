//! Types shared between the GraphQL API and the persistence layer.
//!
//! Most of these are the input objects that GraphQL operations accept. The
//! store converts them into its own insert and changeset rows, so they live
//! in a crate that both sides can depend on.

pub mod inputs;

/// Identifiers are opaque strings assigned by the persistence layer.
pub type Id = String;
