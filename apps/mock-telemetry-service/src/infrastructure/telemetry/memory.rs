//! In-Memory Telemetry Sink
//!
//! Aggregates metric observations in memory. Used when OpenTelemetry export
//! is disabled (totals are logged at shutdown) and by tests that assert on
//! the exact metric shape of a simulated call. State is bounded by the number
//! of label sets, not by the number of observations.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::application::ports::{SinkError, TelemetrySink};
use crate::domain::records::{OperationLabels, RequestStatus};

/// Running summary of the duration observations for one label set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationStats {
    /// Number of observations.
    pub count: u64,
    /// Sum of observed milliseconds.
    pub sum_ms: f64,
    /// Smallest observation.
    pub min_ms: f64,
    /// Largest observation.
    pub max_ms: f64,
}

impl DurationStats {
    fn first(duration_ms: f64) -> Self {
        Self {
            count: 1,
            sum_ms: duration_ms,
            min_ms: duration_ms,
            max_ms: duration_ms,
        }
    }

    fn observe(&mut self, duration_ms: f64) {
        self.count += 1;
        self.sum_ms += duration_ms;
        self.min_ms = self.min_ms.min(duration_ms);
        self.max_ms = self.max_ms.max(duration_ms);
    }

    /// Mean observation.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_ms(&self) -> f64 {
        self.sum_ms / self.count as f64
    }
}

/// Point-in-time copy of everything an [`InMemorySink`] received.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SinkSnapshot {
    /// Request counter values by label set and status.
    pub requests: HashMap<(OperationLabels, RequestStatus), u64>,
    /// Duration summaries by label set.
    pub durations: HashMap<OperationLabels, DurationStats>,
    /// Most recent published price.
    pub last_price: Option<f64>,
}

impl SinkSnapshot {
    /// Total requests with `status` across all label sets.
    #[must_use]
    pub fn request_count(&self, status: RequestStatus) -> u64 {
        self.requests
            .iter()
            .filter(|((_, s), _)| *s == status)
            .map(|(_, count)| count)
            .sum()
    }

    /// Requests for one label set and status.
    #[must_use]
    pub fn requests_for(&self, labels: &OperationLabels, status: RequestStatus) -> u64 {
        self.requests.get(&(*labels, status)).copied().unwrap_or(0)
    }

    /// Total requests of any status.
    #[must_use]
    pub fn total_requests(&self) -> u64 {
        self.requests.values().sum()
    }

    /// Duration summary for one label set.
    #[must_use]
    pub fn durations_for(&self, labels: &OperationLabels) -> Option<DurationStats> {
        self.durations.get(labels).copied()
    }

    /// Total duration observations across all label sets.
    #[must_use]
    pub fn duration_count(&self) -> u64 {
        self.durations.values().map(|stats| stats.count).sum()
    }
}

/// Sink that records observations in memory.
#[derive(Debug, Default)]
pub struct InMemorySink {
    state: Mutex<SinkSnapshot>,
    closed: AtomicBool,
}

impl InMemorySink {
    /// Create an empty, open sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy the current state.
    #[must_use]
    pub fn snapshot(&self) -> SinkSnapshot {
        self.state.lock().clone()
    }

    /// Refuse all further observations.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    fn ensure_open(&self) -> Result<(), SinkError> {
        if self.closed.load(Ordering::Acquire) {
            Err(SinkError::Closed)
        } else {
            Ok(())
        }
    }
}

impl TelemetrySink for InMemorySink {
    fn record_request(
        &self,
        labels: &OperationLabels,
        status: RequestStatus,
    ) -> Result<(), SinkError> {
        self.ensure_open()?;
        *self
            .state
            .lock()
            .requests
            .entry((*labels, status))
            .or_insert(0) += 1;
        Ok(())
    }

    fn record_duration(
        &self,
        labels: &OperationLabels,
        duration_ms: f64,
    ) -> Result<(), SinkError> {
        self.ensure_open()?;
        self.state
            .lock()
            .durations
            .entry(*labels)
            .and_modify(|stats| stats.observe(duration_ms))
            .or_insert_with(|| DurationStats::first(duration_ms));
        Ok(())
    }

    fn publish_price(&self, price: f64) -> Result<(), SinkError> {
        self.ensure_open()?;
        self.state.lock().last_price = Some(price);
        Ok(())
    }
}
