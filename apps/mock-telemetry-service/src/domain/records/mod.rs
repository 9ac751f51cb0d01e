//! Simulation Records
//!
//! Immutable results of one simulated operation or workflow. Records are
//! produced, reported, and dropped; nothing is persisted.

use super::market::{Decision, Exchange, OperationKind, Symbol};

// =============================================================================
// Operation Labels
// =============================================================================

/// The attribute set identifying a simulated operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperationLabels {
    /// Operation kind.
    pub operation: OperationKind,
    /// Ticker.
    pub symbol: Symbol,
    /// Venue.
    pub exchange: Exchange,
}

impl OperationLabels {
    /// Create a label set.
    #[must_use]
    pub const fn new(operation: OperationKind, symbol: Symbol, exchange: Exchange) -> Self {
        Self {
            operation,
            symbol,
            exchange,
        }
    }
}

/// Request outcome as reported on the request counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestStatus {
    /// The simulated call returned a price.
    Success,
    /// The simulated call failed.
    Error,
}

impl RequestStatus {
    /// Status label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

// =============================================================================
// Operation Record
// =============================================================================

/// Result of one simulated exchange call.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationRecord {
    labels: OperationLabels,
    price: f64,
    duration_ms: f64,
    error_message: Option<&'static str>,
}

impl OperationRecord {
    /// Record a call that returned a quote.
    #[must_use]
    pub const fn succeeded(labels: OperationLabels, price: f64, duration_ms: f64) -> Self {
        Self {
            labels,
            price,
            duration_ms,
            error_message: None,
        }
    }

    /// Record a call that failed with `error_message`.
    ///
    /// The computed price is kept for inspection but never exposed through
    /// [`Self::price`].
    #[must_use]
    pub const fn failed(
        labels: OperationLabels,
        price: f64,
        duration_ms: f64,
        error_message: &'static str,
    ) -> Self {
        Self {
            labels,
            price,
            duration_ms,
            error_message: Some(error_message),
        }
    }

    /// Labels of the call.
    #[must_use]
    pub const fn labels(&self) -> OperationLabels {
        self.labels
    }

    /// Quoted price, present only when the call succeeded.
    #[must_use]
    pub const fn price(&self) -> Option<f64> {
        if self.error_message.is_none() {
            Some(self.price)
        } else {
            None
        }
    }

    /// Price computed for the call, whether or not it was returned.
    #[must_use]
    pub const fn computed_price(&self) -> f64 {
        self.price
    }

    /// Simulated processing time in milliseconds.
    #[must_use]
    pub const fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    /// Whether the call succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.error_message.is_none()
    }

    /// Simulated error message, if the call failed.
    #[must_use]
    pub const fn error_message(&self) -> Option<&'static str> {
        self.error_message
    }

    /// Counter status for this record.
    #[must_use]
    pub const fn status(&self) -> RequestStatus {
        if self.is_success() {
            RequestStatus::Success
        } else {
            RequestStatus::Error
        }
    }
}

// =============================================================================
// Workflow Record
// =============================================================================

/// Result of one trading-signal workflow.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowRecord {
    /// Ticker for every step.
    pub symbol: Symbol,
    /// Venue for every step.
    pub exchange: Exchange,
    /// Final decision.
    pub decision: Decision,
    /// Confidence attached to the decision.
    pub confidence: f64,
    /// Step (a): current price lookup.
    pub price_fetch: OperationRecord,
    /// Step (b): order book snapshot.
    pub orderbook_fetch: OperationRecord,
    /// Step (c): recent trades.
    pub trades_fetch: OperationRecord,
}

impl WorkflowRecord {
    /// Price seen by step (a), if it succeeded.
    #[must_use]
    pub const fn current_price(&self) -> Option<f64> {
        self.price_fetch.price()
    }

    /// The three operation records in execution order.
    #[must_use]
    pub const fn operations(&self) -> [&OperationRecord; 3] {
        [&self.price_fetch, &self.orderbook_fetch, &self.trades_fetch]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> OperationLabels {
        OperationLabels::new(OperationKind::FetchPrice, Symbol::Btc, Exchange::Binance)
    }

    #[test]
    fn succeeded_record_exposes_price() {
        let record = OperationRecord::succeeded(labels(), 45_100.0, 120.0);

        assert!(record.is_success());
        assert_eq!(record.price(), Some(45_100.0));
        assert_eq!(record.status(), RequestStatus::Success);
        assert_eq!(record.error_message(), None);
    }

    #[test]
    fn failed_record_hides_price() {
        let record = OperationRecord::failed(labels(), 45_100.0, 80.0, "Market closed");

        assert!(!record.is_success());
        assert_eq!(record.price(), None);
        assert_eq!(record.computed_price(), 45_100.0);
        assert_eq!(record.status(), RequestStatus::Error);
        assert_eq!(record.error_message(), Some("Market closed"));
    }

    #[test]
    fn status_labels() {
        assert_eq!(RequestStatus::Success.as_str(), "success");
        assert_eq!(RequestStatus::Error.as_str(), "error");
    }
}
