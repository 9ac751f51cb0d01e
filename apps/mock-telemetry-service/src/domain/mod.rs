//! Domain Layer - Simulated market vocabulary and result records.
//!
//! Pure types with no I/O and no telemetry dependencies.

/// Tickers, venues, operation kinds, and reference prices.
pub mod market;

/// Operation and workflow records.
pub mod records;
