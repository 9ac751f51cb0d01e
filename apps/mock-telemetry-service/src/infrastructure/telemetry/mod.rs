//! OpenTelemetry Integration
//!
//! Builds the tracer, meter, and logger providers for the OTLP collector and
//! wires them into `tracing`:
//!
//! - spans: `tracing-opentelemetry` layer → batch span exporter
//! - logs: `tracing` events → `opentelemetry-appender-tracing` bridge → batch log exporter
//! - metrics: [`OtelSink`] instruments → periodic metric reader
//!
//! Console output always goes through a `fmt` layer filtered by `RUST_LOG`.
//!
//! # Environment Variables
//!
//! - `OTEL_ENABLED`: Set to "false" to disable export (default: true)
//! - `OTEL_EXPORTER_OTLP_ENDPOINT`: Collector base URL (default: <http://otel-collector:4318>)
//! - `OTEL_EXPORTER_OTLP_PROTOCOL`: `http/protobuf` or `grpc` (default: `http/protobuf`)
//! - `OTEL_SERVICE_NAME`: Service name (default: mock-telemetry-service)
//!
//! # Usage
//!
//! ```ignore
//! let telemetry = telemetry::init(&config.telemetry)?;
//! if let Some(meter) = telemetry.meter() {
//!     let sink = OtelSink::new(&meter);
//!     // ...
//! }
//! telemetry.shutdown();
//! ```

mod gauge;
mod memory;
mod sink;

pub use gauge::{GaugeSource, PriceCell};
pub use memory::{DurationStats, InMemorySink, SinkSnapshot};
pub use sink::{DURATION_METRIC, OtelSink, PRICE_METRIC, REQUESTS_METRIC};

use opentelemetry::KeyValue;
use opentelemetry::metrics::{Meter, MeterProvider as _};
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use opentelemetry_otlp::{LogExporter, MetricExporter, SpanExporter, WithExportConfig};
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::logs::SdkLoggerProvider;
use opentelemetry_sdk::metrics::{PeriodicReader, SdkMeterProvider};
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::infrastructure::config::{OtlpProtocol, Signal, TelemetrySettings};

/// Instrumentation scope for tracer and meter.
const INSTRUMENTATION_SCOPE: &str = "mock-telemetry-service";

/// Console filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "info,h2=warn,hyper=warn,tonic=warn,reqwest=warn";

/// Crates whose own events must never be fed back into the log exporter.
const EXPORTER_CRATES: [&str; 6] = ["opentelemetry", "hyper", "h2", "tonic", "reqwest", "tower"];

/// Telemetry initialization error.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// Failed to create an OTLP exporter.
    #[error("failed to create OTLP {signal} exporter: {reason}")]
    Exporter {
        /// Signal whose exporter failed.
        signal: &'static str,
        /// Underlying error.
        reason: String,
    },
    /// Failed to install the global tracing subscriber.
    #[error("failed to initialize tracing subscriber: {0}")]
    Subscriber(String),
}

struct Providers {
    tracer: SdkTracerProvider,
    meter: SdkMeterProvider,
    logger: SdkLoggerProvider,
}

impl Providers {
    fn shutdown(self) {
        if let Err(e) = self.tracer.shutdown() {
            eprintln!("Failed to shutdown OpenTelemetry tracer provider: {e}");
        }
        if let Err(e) = self.meter.shutdown() {
            eprintln!("Failed to shutdown OpenTelemetry meter provider: {e}");
        }
        if let Err(e) = self.logger.shutdown() {
            eprintln!("Failed to shutdown OpenTelemetry logger provider: {e}");
        }
    }
}

/// Guard that owns the OpenTelemetry providers.
///
/// Providers are shut down (flushing pending spans, metrics, and logs) by
/// [`TelemetryGuard::shutdown`] or when the guard is dropped.
pub struct TelemetryGuard {
    providers: Option<Providers>,
}

impl TelemetryGuard {
    /// Meter for creating instruments. `None` when export is disabled.
    #[must_use]
    pub fn meter(&self) -> Option<Meter> {
        self.providers
            .as_ref()
            .map(|providers| providers.meter.meter(INSTRUMENTATION_SCOPE))
    }

    /// Whether telemetry is being exported.
    #[must_use]
    pub const fn is_exporting(&self) -> bool {
        self.providers.is_some()
    }

    /// Flush and shut down all providers.
    pub fn shutdown(mut self) {
        if let Some(providers) = self.providers.take() {
            providers.shutdown();
        }
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(providers) = self.providers.take() {
            providers.shutdown();
        }
    }
}

/// Initialize telemetry from `settings` and install the global subscriber.
///
/// # Errors
///
/// Returns an error if an exporter cannot be built or a global subscriber is
/// already installed.
pub fn init(settings: &TelemetrySettings) -> Result<TelemetryGuard, TelemetryError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    if !settings.enabled {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::Subscriber(e.to_string()))?;

        return Ok(TelemetryGuard { providers: None });
    }

    let providers = build_providers(settings)?;

    let tracer = providers.tracer.tracer(INSTRUMENTATION_SCOPE);
    let otel_layer = tracing_opentelemetry::layer().with_tracer(tracer);

    let log_bridge = OpenTelemetryTracingBridge::new(&providers.logger).with_filter(
        EXPORTER_CRATES
            .iter()
            .fold(Targets::new().with_default(LevelFilter::INFO), |targets, krate| {
                targets.with_target(*krate, LevelFilter::OFF)
            }),
    );

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(otel_layer)
        .with(log_bridge)
        .try_init();

    if let Err(e) = installed {
        providers.shutdown();
        return Err(TelemetryError::Subscriber(e.to_string()));
    }

    tracing::info!(
        service_name = %settings.service_name,
        endpoint = %settings.endpoint,
        protocol = settings.protocol.as_str(),
        "OpenTelemetry initialized"
    );

    Ok(TelemetryGuard {
        providers: Some(providers),
    })
}

fn build_providers(settings: &TelemetrySettings) -> Result<Providers, TelemetryError> {
    let resource = build_resource(settings);

    let tracer = SdkTracerProvider::builder()
        .with_batch_exporter(span_exporter(settings)?)
        .with_resource(resource.clone())
        .build();

    let reader = PeriodicReader::builder(metric_exporter(settings)?)
        .with_interval(settings.metric_export_interval)
        .build();
    let meter = SdkMeterProvider::builder()
        .with_reader(reader)
        .with_resource(resource.clone())
        .build();

    let logger = SdkLoggerProvider::builder()
        .with_batch_exporter(log_exporter(settings)?)
        .with_resource(resource)
        .build();

    Ok(Providers {
        tracer,
        meter,
        logger,
    })
}

fn build_resource(settings: &TelemetrySettings) -> Resource {
    Resource::builder()
        .with_service_name(settings.service_name.clone())
        .with_attributes([
            KeyValue::new("service.version", settings.service_version.clone()),
            KeyValue::new(
                "deployment.environment",
                settings.deployment_environment.clone(),
            ),
        ])
        .build()
}

fn span_exporter(settings: &TelemetrySettings) -> Result<SpanExporter, TelemetryError> {
    let endpoint = settings.signal_endpoint(Signal::Traces);
    match settings.protocol {
        OtlpProtocol::HttpProtobuf => SpanExporter::builder()
            .with_http()
            .with_endpoint(endpoint)
            .build(),
        OtlpProtocol::Grpc => SpanExporter::builder()
            .with_tonic()
            .with_endpoint(endpoint)
            .build(),
    }
    .map_err(|e| TelemetryError::Exporter {
        signal: "span",
        reason: e.to_string(),
    })
}

fn metric_exporter(settings: &TelemetrySettings) -> Result<MetricExporter, TelemetryError> {
    let endpoint = settings.signal_endpoint(Signal::Metrics);
    match settings.protocol {
        OtlpProtocol::HttpProtobuf => MetricExporter::builder()
            .with_http()
            .with_endpoint(endpoint)
            .build(),
        OtlpProtocol::Grpc => MetricExporter::builder()
            .with_tonic()
            .with_endpoint(endpoint)
            .build(),
    }
    .map_err(|e| TelemetryError::Exporter {
        signal: "metric",
        reason: e.to_string(),
    })
}

fn log_exporter(settings: &TelemetrySettings) -> Result<LogExporter, TelemetryError> {
    let endpoint = settings.signal_endpoint(Signal::Logs);
    match settings.protocol {
        OtlpProtocol::HttpProtobuf => LogExporter::builder()
            .with_http()
            .with_endpoint(endpoint)
            .build(),
        OtlpProtocol::Grpc => LogExporter::builder()
            .with_tonic()
            .with_endpoint(endpoint)
            .build(),
    }
    .map_err(|e| TelemetryError::Exporter {
        signal: "log",
        reason: e.to_string(),
    })
}

// =============================================================================
// Tests
// =============================================================================
