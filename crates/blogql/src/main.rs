use std::net::Ipv4Addr;
use std::sync::Arc;

use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use blogql_lib::config::{Config, GraphQlConfig};
use blogql_lib::graphql_api::{self, ApiSchema, ApiSchemaContext};
use blogql_lib::{metrics, CliOptions, PrometheusExporter, BLOGQL_VERSION};
use blogql_store::{InMemoryStore, Persistence, Store};
use clap::Parser;
use prometheus_exporter::prometheus;
use tokio::net::TcpListener;
use tracing::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    info!(version = BLOGQL_VERSION, "Parse options");
    let cli_options = CliOptions::parse();

    let mut config = match &cli_options.config {
        Some(path) => {
            info!(path = %path.display(), "Loading configuration file");
            Config::read(path)?
        }
        None => {
            info!("No configuration file given, using defaults");
            Config::default()
        }
    };
    if let Some(database_url) = cli_options.database_url {
        config.database_url = Some(database_url);
    }

    let store = init_store(&config).await?;

    // Prometheus metrics.
    let _exporter = if config.prometheus_port == 0 {
        info!("Prometheus exporter disabled");
        None
    } else {
        let registry = prometheus::default_registry().clone();
        // Registers the metrics before the first scrape.
        metrics();
        Some(PrometheusExporter::start(config.prometheus_port, registry)?)
    };

    let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, config.graphql.port)).await?;
    info!(port = config.graphql.port, "GraphQL API listening");

    // Listen to requests forever.
    axum::serve(listener, axum_server(store, &config.graphql)).await?;

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn init_store(config: &Config) -> anyhow::Result<Arc<dyn Persistence>> {
    match &config.database_url {
        Some(database_url) => {
            info!("Initialize store and running migrations");
            let store = Store::new(database_url).await?;
            info!("Store initialization successful");
            Ok(Arc::new(store))
        }
        None => {
            warn!("No database URL configured; records are kept in memory and lost on shutdown");
            Ok(Arc::new(InMemoryStore::new()))
        }
    }
}

fn axum_server(store: Arc<dyn Persistence>, config: &GraphQlConfig) -> Router<()> {
    let api_schema = graphql_api::api_schema(ApiSchemaContext::new(store, config), config);

    Router::new()
        .route("/", get(|| async { "Ready to roll!" }))
        .route("/graphql", get(graphiql_route).post(graphql_handler))
        .with_state(api_schema)
}

async fn graphiql_route() -> impl IntoResponse {
    axum::response::Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

async fn graphql_handler(
    State(schema): State<ApiSchema>,
    request: GraphQLRequest,
) -> GraphQLResponse {
    let request = request.into_inner();
    let operation = request.operation_name.clone();

    let response = schema.execute(request).await;
    metrics().observe_request(operation.as_deref(), response.is_ok());

    response.into()
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use blogql_lib::test_utils::seeded_store;
    use serde_json::{json, Value};

    use super::*;

    async fn serve(config: GraphQlConfig) -> SocketAddr {
        let store = Arc::new(seeded_store().await);
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, axum_server(store, &config))
                .await
                .unwrap()
        });
        addr
    }

    #[tokio::test]
    async fn health_check() {
        let addr = serve(GraphQlConfig::default()).await;
        let body = reqwest::get(format!("http://{addr}/"))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(body, "Ready to roll!");
    }

    #[tokio::test]
    async fn graphiql_is_served() {
        let addr = serve(GraphQlConfig::default()).await;
        let body = reqwest::get(format!("http://{addr}/graphql"))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert!(body.to_lowercase().contains("graphiql"));
    }

    #[tokio::test]
    async fn graphql_over_http() {
        let addr = serve(GraphQlConfig::default()).await;

        let response: Value = reqwest::Client::new()
            .post(format!("http://{addr}/graphql"))
            .json(&json!({
                "query": "query PostsOfBlog { blogPostsByBlogId(data: {id: \"b1\"}) { title author { username } } }",
                "operationName": "PostsOfBlog",
            }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(
            response,
            json!({
                "data": {
                    "blogPostsByBlogId": [
                        { "title": "Note G", "author": { "username": "ada" } },
                        { "title": "Bernoulli numbers", "author": { "username": "ada" } },
                    ]
                }
            })
        );
        assert!(
            metrics()
                .graphql_requests
                .with_label_values(&["PostsOfBlog", "true"])
                .get()
                >= 1
        );
    }

    #[tokio::test]
    async fn introspection_can_be_disabled() {
        let query = json!({ "query": "{ __schema { queryType { name } } }" });

        let addr = serve(GraphQlConfig::default()).await;
        let enabled: Value = reqwest::Client::new()
            .post(format!("http://{addr}/graphql"))
            .json(&query)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(enabled["data"]["__schema"]["queryType"]["name"], "QueryRoot");

        let addr = serve(GraphQlConfig {
            introspection: false,
            ..Default::default()
        })
        .await;
        let disabled: Value = reqwest::Client::new()
            .post(format!("http://{addr}/graphql"))
            .json(&query)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_ne!(disabled["data"]["__schema"]["queryType"]["name"], "QueryRoot");
    }
}
