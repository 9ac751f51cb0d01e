//! Service Configuration Settings
//!
//! Configuration types for the generator, loaded from environment variables.
//! Parsing goes through a key lookup so the same code serves the process
//! environment and test fixtures.

use std::time::Duration;

use crate::application::services::{InvalidSetting, SimulationSettings};

/// Default collector base URL.
pub const DEFAULT_OTLP_ENDPOINT: &str = "http://otel-collector:4318";

/// Default `service.name` resource attribute.
pub const DEFAULT_SERVICE_NAME: &str = "mock-telemetry-service";

/// Default `deployment.environment` resource attribute.
pub const DEFAULT_DEPLOYMENT_ENVIRONMENT: &str = "development";

/// Default metric export interval.
pub const DEFAULT_METRIC_EXPORT_INTERVAL: Duration = Duration::from_secs(10);

/// OTLP transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OtlpProtocol {
    /// Protobuf over HTTP, one path per signal.
    #[default]
    HttpProtobuf,
    /// gRPC via tonic.
    Grpc,
}

impl OtlpProtocol {
    /// Parse a protocol name, case-insensitively. Unknown values mean HTTP.
    #[must_use]
    pub fn from_str_case_insensitive(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "grpc" => Self::Grpc,
            _ => Self::HttpProtobuf,
        }
    }

    /// Protocol name as used by `OTEL_EXPORTER_OTLP_PROTOCOL`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::HttpProtobuf => "http/protobuf",
            Self::Grpc => "grpc",
        }
    }
}

/// Telemetry signal, for per-signal HTTP paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Spans.
    Traces,
    /// Counters, histograms, gauges.
    Metrics,
    /// Log records.
    Logs,
}

impl Signal {
    const fn path(self) -> &'static str {
        match self {
            Self::Traces => "v1/traces",
            Self::Metrics => "v1/metrics",
            Self::Logs => "v1/logs",
        }
    }
}

/// Exporter and resource settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetrySettings {
    /// Whether OTLP export is enabled.
    pub enabled: bool,
    /// Collector base URL.
    pub endpoint: String,
    /// Transport.
    pub protocol: OtlpProtocol,
    /// `service.name`.
    pub service_name: String,
    /// `service.version`.
    pub service_version: String,
    /// `deployment.environment`.
    pub deployment_environment: String,
    /// Periodic metric reader interval.
    pub metric_export_interval: Duration,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: DEFAULT_OTLP_ENDPOINT.to_string(),
            protocol: OtlpProtocol::default(),
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            deployment_environment: DEFAULT_DEPLOYMENT_ENVIRONMENT.to_string(),
            metric_export_interval: DEFAULT_METRIC_EXPORT_INTERVAL,
        }
    }
}

impl TelemetrySettings {
    /// Exporter URL for `signal`.
    ///
    /// HTTP appends the signal path to the base URL; gRPC uses the base URL.
    #[must_use]
    pub fn signal_endpoint(&self, signal: Signal) -> String {
        match self.protocol {
            OtlpProtocol::HttpProtobuf => {
                format!("{}/{}", self.endpoint.trim_end_matches('/'), signal.path())
            }
            OtlpProtocol::Grpc => self.endpoint.clone(),
        }
    }

    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let metric_export_interval = parse_strict::<u64>(lookup, "OTEL_METRIC_EXPORT_INTERVAL")?
            .map_or(defaults.metric_export_interval, Duration::from_millis);

        Ok(Self {
            enabled: lookup("OTEL_ENABLED").is_none_or(|v| v.to_lowercase() != "false"),
            endpoint: lookup("OTEL_EXPORTER_OTLP_ENDPOINT")
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.endpoint),
            protocol: lookup("OTEL_EXPORTER_OTLP_PROTOCOL")
                .map(|v| OtlpProtocol::from_str_case_insensitive(&v))
                .unwrap_or_default(),
            service_name: lookup("OTEL_SERVICE_NAME")
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.service_name),
            service_version: defaults.service_version,
            deployment_environment: lookup("DEPLOYMENT_ENVIRONMENT")
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.deployment_environment),
            metric_export_interval,
        })
    }
}

/// Complete service configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceConfig {
    /// Exporter and resource settings.
    pub telemetry: TelemetrySettings,
    /// Workload settings.
    pub simulation: SimulationSettings,
    /// RNG seed; `None` seeds from OS entropy.
    pub seed: Option<u64>,
    /// Iteration limit; `None` runs until interrupted.
    pub max_iterations: Option<u64>,
}

impl ServiceConfig {
    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable cannot be parsed or a
    /// simulation setting is out of bounds.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric value cannot be parsed or a simulation
    /// setting is out of bounds.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let telemetry = TelemetrySettings::from_lookup(&lookup)?;

        let mut simulation = SimulationSettings::default();
        if let Some(probability) = parse_strict::<f64>(&lookup, "MOCK_TELEMETRY_FAILURE_PROBABILITY")? {
            simulation.failure_probability = probability;
        }
        simulation.validate()?;

        let seed = parse_strict::<u64>(&lookup, "MOCK_TELEMETRY_SEED")?;
        let max_iterations =
            parse_strict::<u64>(&lookup, "MOCK_TELEMETRY_MAX_ITERATIONS")?.filter(|max| *max > 0);

        Ok(Self {
            telemetry,
            simulation,
            seed,
            max_iterations,
        })
    }
}

/// Configuration error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Environment variable could not be parsed.
    #[error("environment variable {key} has invalid value {value:?}")]
    InvalidValue {
        /// Variable name.
        key: String,
        /// Raw value.
        value: String,
    },
    /// A simulation setting is out of bounds.
    #[error(transparent)]
    InvalidSetting(#[from] InvalidSetting),
}

fn parse_strict<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, ConfigError> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw,
            }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let config = ServiceConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config, ServiceConfig::default());
        assert!(config.telemetry.enabled);
        assert_eq!(config.telemetry.endpoint, "http://otel-collector:4318");
        assert_eq!(config.telemetry.service_name, "mock-telemetry-service");
        assert_eq!(config.telemetry.metric_export_interval, Duration::from_secs(10));
        assert_eq!(config.seed, None);
        assert_eq!(config.max_iterations, None);
    }

    #[test]
    fn reads_overrides() {
        let config = ServiceConfig::from_lookup(lookup_from(&[
            ("OTEL_ENABLED", "FALSE"),
            ("OTEL_EXPORTER_OTLP_ENDPOINT", "http://localhost:4317"),
            ("OTEL_EXPORTER_OTLP_PROTOCOL", "grpc"),
            ("OTEL_SERVICE_NAME", "load-gen"),
            ("DEPLOYMENT_ENVIRONMENT", "staging"),
            ("OTEL_METRIC_EXPORT_INTERVAL", "2500"),
            ("MOCK_TELEMETRY_SEED", "42"),
            ("MOCK_TELEMETRY_MAX_ITERATIONS", "3"),
            ("MOCK_TELEMETRY_FAILURE_PROBABILITY", "0.25"),
        ]))
        .unwrap();

        assert!(!config.telemetry.enabled);
        assert_eq!(config.telemetry.protocol, OtlpProtocol::Grpc);
        assert_eq!(config.telemetry.service_name, "load-gen");
        assert_eq!(config.telemetry.deployment_environment, "staging");
        assert_eq!(config.telemetry.metric_export_interval, Duration::from_millis(2500));
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.max_iterations, Some(3));
        assert_eq!(config.simulation.failure_probability, 0.25);
    }

    #[test]
    fn zero_iterations_means_unlimited() {
        let config =
            ServiceConfig::from_lookup(lookup_from(&[("MOCK_TELEMETRY_MAX_ITERATIONS", "0")]))
                .unwrap();
        assert_eq!(config.max_iterations, None);
    }

    #[test]
    fn rejects_unparsable_seed() {
        let err = ServiceConfig::from_lookup(lookup_from(&[("MOCK_TELEMETRY_SEED", "abc")]))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: "MOCK_TELEMETRY_SEED".to_string(),
                value: "abc".to_string(),
            }
        );
    }

    #[test]
    fn rejects_unparsable_interval() {
        let err = ServiceConfig::from_lookup(lookup_from(&[(
            "OTEL_METRIC_EXPORT_INTERVAL",
            "ten-seconds",
        )]))
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: "OTEL_METRIC_EXPORT_INTERVAL".to_string(),
                value: "ten-seconds".to_string(),
            }
        );
    }

    #[test]
    fn rejects_out_of_range_probability() {
        let err = ServiceConfig::from_lookup(lookup_from(&[(
            "MOCK_TELEMETRY_FAILURE_PROBABILITY",
            "1.2",
        )]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSetting(_)));
    }

    #[test]
    fn protocol_parsing() {
        assert_eq!(OtlpProtocol::from_str_case_insensitive("GRPC"), OtlpProtocol::Grpc);
        assert_eq!(
            OtlpProtocol::from_str_case_insensitive("http/protobuf"),
            OtlpProtocol::HttpProtobuf
        );
        assert_eq!(
            OtlpProtocol::from_str_case_insensitive("http/json"),
            OtlpProtocol::HttpProtobuf
        );
    }

    #[test]
    fn http_endpoints_get_signal_paths() {
        let settings = TelemetrySettings {
            endpoint: "http://collector:4318/".to_string(),
            ..TelemetrySettings::default()
        };
        assert_eq!(
            settings.signal_endpoint(Signal::Traces),
            "http://collector:4318/v1/traces"
        );
        assert_eq!(
            settings.signal_endpoint(Signal::Metrics),
            "http://collector:4318/v1/metrics"
        );
        assert_eq!(settings.signal_endpoint(Signal::Logs), "http://collector:4318/v1/logs");
    }

    #[test]
    fn grpc_endpoint_is_used_as_is() {
        let settings = TelemetrySettings {
            endpoint: "http://collector:4317".to_string(),
            protocol: OtlpProtocol::Grpc,
            ..TelemetrySettings::default()
        };
        assert_eq!(settings.signal_endpoint(Signal::Logs), "http://collector:4317");
    }
}
