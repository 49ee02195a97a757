use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::sync::OnceLock;

// It's important to use the exported crate `prometheus_exporter::prometheus`
// instead of `prometheus`, as different versions of that crate have
// incompatible global registries.
use prometheus_exporter::prometheus;

pub struct PrometheusMetrics {
    pub graphql_requests: prometheus::IntCounterVec,
}

static METRICS: OnceLock<PrometheusMetrics> = OnceLock::new();

pub fn metrics() -> &'static PrometheusMetrics {
    METRICS.get_or_init(|| PrometheusMetrics::new(prometheus::default_registry().clone()))
}

impl PrometheusMetrics {
    fn new(registry: prometheus::Registry) -> Self {
        let graphql_requests = prometheus::register_int_counter_vec_with_registry!(
            "graphql_requests",
            "Number of GraphQL requests served",
            &["operation", "success"],
            registry
        )
        .unwrap();

        Self { graphql_requests }
    }

    /// Counts one executed GraphQL request. Anonymous operations are counted
    /// under `"anonymous"`.
    pub fn observe_request(&self, operation: Option<&str>, success: bool) {
        let success = if success { "true" } else { "false" };
        self.graphql_requests
            .with_label_values(&[operation.unwrap_or("anonymous"), success])
            .inc();
    }
}

#[derive(Debug)]
pub struct PrometheusExporter {
    binding: SocketAddr,
    _exporter: prometheus_exporter::Exporter,
}

impl PrometheusExporter {
    /// Starts exporting Prometheus metrics at `http://0.0.0.0:{port}/metrics`. The server
    /// will keep running until the returned [`PrometheusExporter`] is dropped.
    pub fn start(port: u16, registry: prometheus::Registry) -> anyhow::Result<Self> {
        let binding = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, port));
        let exporter = {
            let mut builder = prometheus_exporter::Builder::new(binding);
            builder.with_registry(registry);
            builder.start()?
        };

        Ok(Self {
            binding,
            _exporter: exporter,
        })
    }

    /// Returns the port this Prometheus exporter is bound to.
    pub fn port(&self) -> u16 {
        self.binding.port()
    }
}
