//! The blogql GraphQL API: object types, queries and mutations over a
//! [`blogql_store::Persistence`] implementation, plus the configuration and
//! metrics shared with the `blogql` binary.

mod cli;
pub mod config;
pub mod errors;
pub mod graphql_api;
mod prometheus_metrics;

#[cfg(feature = "tests")]
pub mod test_utils;

pub use cli::CliOptions;
pub use prometheus_metrics::{metrics, PrometheusExporter, PrometheusMetrics};

pub const BLOGQL_VERSION: &str = env!("CARGO_PKG_VERSION");
