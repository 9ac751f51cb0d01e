//! Infrastructure Layer - Adapters and external integrations.
//!
//! This layer contains the concrete implementations of the port interfaces
//! defined in the application layer, plus process configuration.

/// Configuration loaded from environment variables.
pub mod config;

/// OpenTelemetry providers, `tracing` wiring, and telemetry sinks.
pub mod telemetry;
