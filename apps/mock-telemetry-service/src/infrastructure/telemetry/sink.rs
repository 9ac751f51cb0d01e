//! OpenTelemetry Metrics Sink
//!
//! [`TelemetrySink`] adapter backed by OTel instruments. Instruments are
//! created once from the meter handed out by [`super::TelemetryGuard`] and
//! exported by the SDK's periodic reader.
//!
//! # Instruments
//!
//! - `crypto.requests.total` (counter, unit `1`): symbol, exchange, operation, status
//! - `crypto.request.duration` (histogram, unit `ms`): symbol, exchange, operation
//! - `crypto_price` (observable gauge): currency

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use opentelemetry::KeyValue;
use opentelemetry::metrics::{Counter, Histogram, Meter, ObservableGauge};

use super::gauge::{GaugeSource, PriceCell};
use crate::application::ports::{SinkError, TelemetrySink};
use crate::domain::records::{OperationLabels, RequestStatus};

/// Request counter name.
pub const REQUESTS_METRIC: &str = "crypto.requests.total";

/// Request duration histogram name.
pub const DURATION_METRIC: &str = "crypto.request.duration";

/// Latest price gauge name.
pub const PRICE_METRIC: &str = "crypto_price";

/// Metrics sink that reports through OpenTelemetry instruments.
pub struct OtelSink {
    requests: Counter<u64>,
    duration: Histogram<f64>,
    _price_gauge: ObservableGauge<f64>,
    price: PriceCell,
    closed: AtomicBool,
}

impl OtelSink {
    /// Create the instruments on `meter`.
    #[must_use]
    pub fn new(meter: &Meter) -> Self {
        Self::with_price_cell(meter, PriceCell::new())
    }

    /// Create the instruments on `meter`, reading the price gauge from `price`.
    #[must_use]
    pub fn with_price_cell(meter: &Meter, price: PriceCell) -> Self {
        let requests = meter
            .u64_counter(REQUESTS_METRIC)
            .with_description("Total number of crypto requests")
            .with_unit("1")
            .build();

        let duration = meter
            .f64_histogram(DURATION_METRIC)
            .with_description("Request duration in milliseconds")
            .with_unit("ms")
            .build();

        let source: Arc<dyn GaugeSource> = Arc::new(price.clone());
        let price_gauge = meter
            .f64_observable_gauge(PRICE_METRIC)
            .with_description("Current cryptocurrency price")
            .with_callback(move |observer| {
                observer.observe(source.poll(), &[KeyValue::new("currency", "USD")]);
            })
            .build();

        Self {
            requests,
            duration,
            _price_gauge: price_gauge,
            price,
            closed: AtomicBool::new(false),
        }
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

impl TelemetrySink for OtelSink {
    fn record_request(
        &self,
        labels: &OperationLabels,
        status: RequestStatus,
    ) -> Result<(), SinkError> {
        self.ensure_open()?;
        let [symbol, exchange, operation] = label_attributes(labels);
        self.requests.add(
            1,
            &[
                symbol,
                exchange,
                operation,
                KeyValue::new("status", status.as_str()),
            ],
        );
        Ok(())
    }

    fn record_duration(
        &self,
        labels: &OperationLabels,
        duration_ms: f64,
    ) -> Result<(), SinkError> {
        self.ensure_open()?;
        if !duration_ms.is_finite() {
            return Err(SinkError::Rejected {
                instrument: DURATION_METRIC,
                reason: format!("non-finite duration {duration_ms}"),
            });
        }
        self.duration.record(duration_ms, &label_attributes(labels));
        Ok(())
    }

    fn publish_price(&self, price: f64) -> Result<(), SinkError> {
        self.ensure_open()?;
        self.price.set(price);
        Ok(())
    }
}

fn label_attributes(labels: &OperationLabels) -> [KeyValue; 3] {
    [
        KeyValue::new("symbol", labels.symbol.as_str()),
        KeyValue::new("exchange", labels.exchange.as_str()),
        KeyValue::new("operation", labels.operation.as_str()),
    ]
}
