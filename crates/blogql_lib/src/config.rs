//! blogql configuration parsing.

use std::fs::File;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQlConfig {
    /// The port on which the GraphQL API server should listen.
    #[serde(default = "Config::default_graphql_api_port")]
    pub port: u16,
    /// Whether clients may run introspection queries. GraphiQL needs them.
    #[serde(default = "Config::default_true")]
    pub introspection: bool,
    /// Batch to-one relation lookups within a request into a single store
    /// call per entity type.
    #[serde(default = "Config::default_true")]
    pub batch_relation_lookups: bool,
}

impl Default for GraphQlConfig {
    fn default() -> Self {
        Self {
            port: Config::default_graphql_api_port(),
            introspection: true,
            batch_relation_lookups: true,
        }
    }
}

/// A [`serde`]-compatible representation of blogql's YAML configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// GraphQL API configuration.
    #[serde(default)]
    pub graphql: GraphQlConfig,
    /// The URL of the PostgreSQL database to use. Records are kept in memory
    /// and lost on shutdown if this is not set.
    #[serde(default)]
    pub database_url: Option<String>,
    /// The port on which the Prometheus exporter should listen. 0 disables
    /// the exporter.
    #[serde(default = "Config::default_prometheus_port")]
    pub prometheus_port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            graphql: GraphQlConfig::default(),
            database_url: None,
            prometheus_port: Config::default_prometheus_port(),
        }
    }
}

impl Config {
    pub fn read(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("can't open config file {}", path.display()))?;
        serde_yaml::from_reader(file).context("invalid config file")
    }

    fn default_prometheus_port() -> u16 {
        9184
    }

    fn default_graphql_api_port() -> u16 {
        3030
    }

    fn default_true() -> bool {
        true
    }
}
