//! Fixtures and helpers shared by unit and integration tests.

pub mod mocks;

use std::sync::Arc;

use async_graphql::{Request, Variables};
use blogql_store::models::{Blog, BlogComment, BlogPost, Profile, User};
use blogql_store::{InMemoryStore, Persistence};
use chrono::Utc;
use serde_json::Value;

use crate::config::GraphQlConfig;
use crate::graphql_api::{api_schema, ApiSchema, ApiSchemaContext};

/// An [`InMemoryStore`] with a small, well-known data set:
///
/// - users `u1` (ada) and `u2` (grace), `u1` with profile `pr1`;
/// - blog `b1` by `u1`, with posts `p1` (published) and `p2`;
/// - comment `c1` by `u2` on `p1`, and `c2` by `u1` replying to `c1`.
pub async fn seeded_store() -> InMemoryStore {
    let store = InMemoryStore::new();
    let now = Utc::now();

    for (id, email, username) in [
        ("u1", "ada@example.com", "ada"),
        ("u2", "grace@example.com", "grace"),
    ] {
        store
            .insert(User {
                id: id.to_string(),
                created_at: now,
                updated_at: now,
                username: Some(username.to_string()),
                email: email.to_string(),
            })
            .await
            .unwrap();
    }

    store
        .insert(Profile {
            id: "pr1".to_string(),
            created_at: now,
            updated_at: now,
            user_id: "u1".to_string(),
            bio: "Analyst".to_string(),
        })
        .await
        .unwrap();

    store
        .insert(Blog {
            id: "b1".to_string(),
            created_at: now,
            updated_at: now,
            author_id: "u1".to_string(),
            name: "Engine notes".to_string(),
            description: "Notes on the analytical engine".to_string(),
        })
        .await
        .unwrap();

    for (id, title, published) in [("p1", "Note G", true), ("p2", "Bernoulli numbers", false)] {
        store
            .insert(BlogPost {
                id: id.to_string(),
                created_at: now,
                updated_at: now,
                author_id: "u1".to_string(),
                blog_id: "b1".to_string(),
                title: title.to_string(),
                content: format!("{title}..."),
                published,
            })
            .await
            .unwrap();
    }

    for (id, author_id, parent_id) in [("c1", "u2", None), ("c2", "u1", Some("c1"))] {
        store
            .insert(BlogComment {
                id: id.to_string(),
                created_at: now,
                updated_at: now,
                author_id: author_id.to_string(),
                blog_post_id: "p1".to_string(),
                parent_id: parent_id.map(str::to_string),
                content: format!("comment {id}"),
            })
            .await
            .unwrap();
    }

    store
}

pub fn test_schema(store: Arc<dyn Persistence>, batch_relation_lookups: bool) -> ApiSchema {
    let config = GraphQlConfig {
        batch_relation_lookups,
        ..Default::default()
    };
    api_schema(ApiSchemaContext::new(store, &config), &config)
}

/// Runs `query` and returns the response's `data` as JSON, panicking on any
/// error.
pub async fn query_ok(schema: &ApiSchema, query: &str) -> Value {
    let response = schema.execute(Request::new(query)).await;
    assert!(
        response.errors.is_empty(),
        "unexpected errors: {:?}",
        response.errors
    );
    response.data.into_json().unwrap()
}

/// Like [`query_ok`], with JSON variables.
pub async fn query_vars_ok(schema: &ApiSchema, query: &str, variables: Value) -> Value {
    let request = Request::new(query).variables(Variables::from_json(variables));
    let response = schema.execute(request).await;
    assert!(
        response.errors.is_empty(),
        "unexpected errors: {:?}",
        response.errors
    );
    response.data.into_json().unwrap()
}

/// Runs `query` and returns `data` and `errors` as JSON, without asserting
/// anything about them.
pub async fn query(schema: &ApiSchema, query: &str) -> (Value, Vec<Value>) {
    let response = schema.execute(Request::new(query)).await;
    let errors = response
        .errors
        .iter()
        .map(|err| serde_json::to_value(err).unwrap())
        .collect();
    (response.data.into_json().unwrap(), errors)
}
