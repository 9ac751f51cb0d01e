//! Application Layer - Simulation services and port definitions.
//!
//! The services here produce the synthetic workload; the ports describe the
//! telemetry collaborator they report to.

/// Port interfaces for the telemetry sink.
pub mod ports;

/// Event generator, workflow composer, and driver loop.
pub mod services;
