//! Port Interfaces
//!
//! The simulator reports metrics through [`TelemetrySink`] rather than
//! touching SDK instruments directly. Spans and logs go through `tracing`;
//! only the numeric stream needs an explicit port.
//!
//! ## Driven Ports (Outbound)
//!
//! - `TelemetrySink`: request counter, duration histogram, latest-price gauge

use crate::domain::records::{OperationLabels, RequestStatus};

/// Error raised by a telemetry sink.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SinkError {
    /// The sink was shut down and accepts no more data.
    #[error("telemetry sink is closed")]
    Closed,
    /// The sink refused a value.
    #[error("telemetry sink rejected {instrument}: {reason}")]
    Rejected {
        /// Instrument that refused the value.
        instrument: &'static str,
        /// Why it was refused.
        reason: String,
    },
}

/// Write-only destination for simulation metrics.
///
/// Implementations must not block on delivery; batching and export belong to
/// the implementation.
pub trait TelemetrySink {
    /// Increment the request counter for one finished call.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink can no longer accept data.
    fn record_request(
        &self,
        labels: &OperationLabels,
        status: RequestStatus,
    ) -> Result<(), SinkError>;

    /// Record the processing time of a successful call.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink can no longer accept data.
    fn record_duration(&self, labels: &OperationLabels, duration_ms: f64)
    -> Result<(), SinkError>;

    /// Publish the latest quoted price for the price gauge.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink can no longer accept data.
    fn publish_price(&self, price: f64) -> Result<(), SinkError>;
}
