//! API middleware components

pub mod logging;
pub mod metrics;

pub use logging::{logging_middleware, redact_json_sensitive_fields, truncate_for_log};
pub use self::metrics::metrics_middleware;
