//! Observability infrastructure - Prometheus metrics

mod metrics;

pub use self::metrics::{
    create_metrics_router, init_metrics, record_credential_operation, record_http_request,
    PrometheusMetrics,
};
