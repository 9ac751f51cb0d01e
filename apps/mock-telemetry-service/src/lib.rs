#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::cast_possible_truncation,
        clippy::too_many_lines
    )
)]

//! Mock Telemetry Service - Synthetic Workload Generator
//!
//! Fabricates crypto exchange operations and reports each one as traces,
//! metrics, and logs to an OTLP collector, so an observability pipeline has
//! realistic, continuously changing data to ingest.
//!
//! # Layers (inside → outside)
//!
//! - **Domain**: Simulated market vocabulary and result records
//!   - `market`: Tickers, venues, operation kinds, reference prices
//!   - `records`: Operation and workflow records
//!
//! - **Application**: Workload generation and port definitions
//!   - `ports`: The `TelemetrySink` metric port
//!   - `services`: Event generator, workflow composer, driver loop
//!
//! - **Infrastructure**: Adapters and external integrations
//!   - `config`: Environment-driven configuration
//!   - `telemetry`: OpenTelemetry providers, `tracing` wiring, sinks
//!
//! # Data Flow
//!
//! ```text
//! Driver ──► Simulator ──┬─► tracing spans ──► tracing-opentelemetry ──┐
//!    │                   ├─► tracing events ─► log bridge ─────────────┼─► OTLP collector
//!    └─► workflows ──────┴─► TelemetrySink ──► OTel instruments ───────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Module Declarations
// =============================================================================

/// Domain layer - Market vocabulary and records with no external dependencies.
pub mod domain;

/// Application layer - Workload services and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Re-exports
// =============================================================================

// Domain types
pub use domain::market::{
    DEFAULT_BASE_PRICE, Decision, Exchange, OperationKind, SIMULATED_ERRORS, Symbol, base_price,
    quote_price,
};
pub use domain::records::{OperationLabels, OperationRecord, RequestStatus, WorkflowRecord};

// Ports and services
pub use application::ports::{SinkError, TelemetrySink};
pub use application::services::{
    CountRange, DelayRange, Driver, DriverState, DriverSummary, FloatRange, InvalidSetting,
    SimulationError, SimulationSettings, Simulator,
};

// Infrastructure config
pub use infrastructure::config::{ConfigError, OtlpProtocol, ServiceConfig, TelemetrySettings};

// Telemetry
pub use infrastructure::telemetry::{
    DurationStats, InMemorySink, OtelSink, PriceCell, SinkSnapshot, TelemetryError, TelemetryGuard,
    init as init_telemetry,
};
