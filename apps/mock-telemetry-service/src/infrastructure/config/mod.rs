//! Configuration Module
//!
//! Configuration loading for the generator service.

mod settings;

pub use settings::{
    ConfigError, DEFAULT_DEPLOYMENT_ENVIRONMENT, DEFAULT_METRIC_EXPORT_INTERVAL,
    DEFAULT_OTLP_ENDPOINT, DEFAULT_SERVICE_NAME, OtlpProtocol, ServiceConfig, Signal,
    TelemetrySettings,
};
