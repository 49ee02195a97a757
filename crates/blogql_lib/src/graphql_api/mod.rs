pub mod api_types;
mod error_codes;
pub mod resolution;
mod server;

use std::sync::Arc;
use std::time::Duration;

use async_graphql::dataloader::DataLoader;
use async_graphql::extensions::Tracing;
use async_graphql::{Context, EmptySubscription, Schema, SchemaBuilder};
use blogql_store::{Persistence, PersistenceLoader};

pub use self::error_codes::ValidationErrorCodes;
pub use self::server::{MutationRoot, QueryRoot};
use crate::config::GraphQlConfig;

pub type ApiSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub struct ApiSchemaContext {
    pub store: Arc<dyn Persistence>,
    /// Batches to-one lookups by primary key. `None` if batching is disabled,
    /// in which case every lookup is a separate store call.
    pub loader: Option<DataLoader<PersistenceLoader>>,
}

impl ApiSchemaContext {
    pub fn new(store: Arc<dyn Persistence>, config: &GraphQlConfig) -> Self {
        // The default delay is 1ms, but we're happy to wait a bit longer to
        // collect bigger batches.
        let delay = Duration::from_millis(3);

        let loader = config.batch_relation_lookups.then(|| {
            DataLoader::new(PersistenceLoader::new(store.clone()), tokio::task::spawn)
                .delay(delay)
        });

        Self { store, loader }
    }
}

pub fn api_schema_builder() -> SchemaBuilder<QueryRoot, MutationRoot, EmptySubscription> {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .extension(Tracing)
        .extension(ValidationErrorCodes)
}

pub fn api_schema(ctx: ApiSchemaContext, config: &GraphQlConfig) -> ApiSchema {
    let builder = api_schema_builder().data(ctx);

    if config.introspection {
        builder.finish()
    } else {
        builder.disable_introspection().finish()
    }
}

pub fn ctx_data<'a>(ctx: &'a Context) -> &'a ApiSchemaContext {
    ctx.data::<ApiSchemaContext>()
        .expect("Failed to get API context")
}
