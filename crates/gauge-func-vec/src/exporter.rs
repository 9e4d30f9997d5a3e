//! Metrics exporter for Prometheus scraping

use crate::error::Result;
use prometheus::{Encoder, Registry, TextEncoder};

/// Gather `registry` and render it in Prometheus text format.
///
/// Gathering evaluates every registered gauge function.
pub fn export_metrics(registry: &Registry) -> Result<String> {
    let encoder = TextEncoder::new();
    let metric_families = registry.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

/// HTTP handler for metrics endpoint (requires "http" feature)
#[cfg(feature = "http")]
pub mod http {
    use axum::{
        extract::State,
        http::StatusCode,
        response::{IntoResponse, Response},
    };
    use prometheus::Registry;
    use std::sync::Arc;

    /// Metrics endpoint state
    #[derive(Clone)]
    pub struct MetricsState {
        pub registry: Arc<Registry>,
    }

    impl MetricsState {
        pub fn new(registry: Arc<Registry>) -> Self {
            Self { registry }
        }
    }

    /// Handler for GET /metrics
    pub async fn metrics_handler(State(state): State<MetricsState>) -> Response {
        match super::export_metrics(&state.registry) {
            Ok(metrics) => (
                StatusCode::OK,
                [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
                metrics,
            )
                .into_response(),
            Err(err) => {
                tracing::warn!(error = %err, "failed to encode metrics");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
            }
        }
    }

    /// Create an axum router for metrics
    pub fn metrics_router(registry: Arc<Registry>) -> axum::Router {
        use axum::routing::get;

        axum::Router::new()
            .route("/metrics", get(metrics_handler))
            .with_state(MetricsState::new(registry))
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GaugeFuncVec;
    use prometheus::Opts;
    use std::collections::HashMap;

    #[test]
    fn test_export_metrics() {
        let registry = Registry::new();
        let vec = GaugeFuncVec::new(Opts::new("test_gauge", "A test gauge"), &[]).unwrap();
        vec.must_register(&HashMap::new(), || 288.0);
        registry.register(Box::new(vec)).unwrap();

        let output = export_metrics(&registry).unwrap();
        assert_eq!(
            output,
            "# HELP test_gauge A test gauge\n# TYPE test_gauge gauge\ntest_gauge 288\n"
        );
    }

    #[test]
    fn test_export_empty_registry() {
        let registry = Registry::new();
        assert_eq!(export_metrics(&registry).unwrap(), "");
    }
}
