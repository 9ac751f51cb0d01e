//! Mock Telemetry Service Binary
//!
//! Generates synthetic crypto exchange traffic until interrupted.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin mock-telemetry-service
//! ```
//!
//! # Environment Variables
//!
//! - `OTEL_ENABLED`: Export to the collector (default: true)
//! - `OTEL_EXPORTER_OTLP_ENDPOINT`: Collector base URL (default: <http://otel-collector:4318>)
//! - `OTEL_EXPORTER_OTLP_PROTOCOL`: `http/protobuf` | `grpc` (default: http/protobuf)
//! - `OTEL_SERVICE_NAME`: Service name (default: mock-telemetry-service)
//! - `OTEL_METRIC_EXPORT_INTERVAL`: Metric export interval in ms (default: 10000)
//! - `DEPLOYMENT_ENVIRONMENT`: Resource attribute (default: development)
//! - `MOCK_TELEMETRY_SEED`: Deterministic RNG seed (default: OS entropy)
//! - `MOCK_TELEMETRY_MAX_ITERATIONS`: Stop after N iterations, 0 = unlimited (default: 0)
//! - `MOCK_TELEMETRY_FAILURE_PROBABILITY`: Simulated failure rate (default: 0.1)
//! - `RUST_LOG`: Log level (default: info)

use mock_telemetry_service::{
    Driver, DriverSummary, InMemorySink, OtelSink, RequestStatus, ServiceConfig, Simulator,
    TelemetrySink, init_telemetry,
};
use tokio::signal;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    let config = ServiceConfig::from_env()?;
    let telemetry = init_telemetry(&config.telemetry)?;

    tracing::info!("Starting {}", config.telemetry.service_name);
    if telemetry.is_exporting() {
        tracing::info!("Sending telemetry to {}", config.telemetry.endpoint);
    } else {
        tracing::info!("OpenTelemetry disabled (OTEL_ENABLED=false), using console logging only");
    }
    log_config(&config);

    let shutdown_token = CancellationToken::new();
    tokio::spawn(await_shutdown(shutdown_token.clone()));

    let result = if let Some(meter) = telemetry.meter() {
        let sink = OtelSink::new(&meter);
        let result = generate(&sink, &config, shutdown_token).await;
        sink.close();
        result
    } else {
        let sink = InMemorySink::new();
        let result = generate(&sink, &config, shutdown_token).await;
        sink.close();

        let snapshot = sink.snapshot();
        tracing::info!(
            successful_requests = snapshot.request_count(RequestStatus::Success),
            failed_requests = snapshot.request_count(RequestStatus::Error),
            duration_samples = snapshot.duration_count(),
            last_price = ?snapshot.last_price,
            "In-memory telemetry totals"
        );
        result
    };

    match result {
        Ok(summary) => {
            tracing::info!(
                iterations = summary.iterations,
                operations = summary.operations,
                failed_operations = summary.failed_operations,
                workflows = summary.workflows,
                "Mock telemetry service stopped"
            );
            telemetry.shutdown();
            Ok(())
        }
        Err(err) => {
            telemetry.shutdown();
            Err(err)
        }
    }
}

/// Run the driver loop against `sink`.
async fn generate(
    sink: &dyn TelemetrySink,
    config: &ServiceConfig,
    shutdown_token: CancellationToken,
) -> anyhow::Result<DriverSummary> {
    let simulator = Simulator::from_seed(sink, config.simulation.clone(), config.seed)?;
    let mut driver =
        Driver::new(simulator, shutdown_token).with_max_iterations(config.max_iterations);
    Ok(driver.run().await?)
}

/// Log the parsed configuration.
fn log_config(config: &ServiceConfig) {
    tracing::info!(
        protocol = config.telemetry.protocol.as_str(),
        deployment_environment = %config.telemetry.deployment_environment,
        metric_export_interval_ms = u64::try_from(config.telemetry.metric_export_interval.as_millis()).unwrap_or(u64::MAX),
        failure_probability = config.simulation.failure_probability,
        seed = ?config.seed,
        max_iterations = ?config.max_iterations,
        "Configuration loaded"
    );
}

/// Load .env file from current directory or any ancestor directory.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Wait for shutdown signal (SIGTERM or SIGINT), then cancel the token.
async fn await_shutdown(shutdown_token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }

    shutdown_token.cancel();
}
