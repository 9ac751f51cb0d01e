//! Event Generator
//!
//! Simulates a single exchange call: waits a random processing time, quotes a
//! jittered price, and decides whether the call failed. Each call is reported
//! as one span, one log event, and one or two metric observations.
//!
//! # Draw Order
//!
//! Random values are drawn in a fixed order (delay, price multiplier, failure,
//! error message) so a seeded simulator replays the same sequence.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::field::{Empty, display};
use tracing::{Instrument, Span};

use super::settings::{CountRange, DelayRange, FloatRange, InvalidSetting, SimulationSettings};
use crate::application::ports::{SinkError, TelemetrySink};
use crate::domain::market::{Exchange, OperationKind, SIMULATED_ERRORS, Symbol, quote_price};
use crate::domain::records::{OperationLabels, OperationRecord, RequestStatus};

/// Fault that is not part of the simulated workload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimulationError {
    /// The telemetry sink refused data.
    #[error("telemetry sink failure: {0}")]
    Sink(#[from] SinkError),
}

/// Generates simulated operations and reports them to a sink.
pub struct Simulator<'a> {
    sink: &'a dyn TelemetrySink,
    settings: SimulationSettings,
    rng: StdRng,
}

impl<'a> Simulator<'a> {
    /// Create a simulator seeded from OS entropy.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidSetting`] if `settings` cannot be sampled.
    pub fn new(
        sink: &'a dyn TelemetrySink,
        settings: SimulationSettings,
    ) -> Result<Self, InvalidSetting> {
        settings.validate()?;
        Ok(Self {
            sink,
            settings,
            rng: StdRng::from_os_rng(),
        })
    }

    /// Create a simulator that replays the sequence for `seed`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidSetting`] if `settings` cannot be sampled.
    pub fn with_seed(
        sink: &'a dyn TelemetrySink,
        settings: SimulationSettings,
        seed: u64,
    ) -> Result<Self, InvalidSetting> {
        settings.validate()?;
        Ok(Self {
            sink,
            settings,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Create a seeded simulator when `seed` is set, an entropy-seeded one otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidSetting`] if `settings` cannot be sampled.
    pub fn from_seed(
        sink: &'a dyn TelemetrySink,
        settings: SimulationSettings,
        seed: Option<u64>,
    ) -> Result<Self, InvalidSetting> {
        match seed {
            Some(seed) => Self::with_seed(sink, settings, seed),
            None => Self::new(sink, settings),
        }
    }

    /// Active settings.
    #[must_use]
    pub const fn settings(&self) -> &SimulationSettings {
        &self.settings
    }

    /// Draw a fresh operation kind, ticker, and venue.
    pub fn random_labels(&mut self) -> OperationLabels {
        let operation = self.pick(&OperationKind::ALL);
        let symbol = self.random_symbol();
        let exchange = self.random_exchange();
        OperationLabels::new(operation, symbol, exchange)
    }

    /// Draw a ticker.
    pub fn random_symbol(&mut self) -> Symbol {
        self.pick(&Symbol::ALL)
    }

    /// Draw a venue.
    pub fn random_exchange(&mut self) -> Exchange {
        self.pick(&Exchange::ALL)
    }

    /// Draw a delay from `range`.
    pub fn sample_delay(&mut self, range: DelayRange) -> Duration {
        range.sample(&mut self.rng)
    }

    /// Draw a count from `range`.
    pub fn sample_count(&mut self, range: CountRange) -> u32 {
        range.sample(&mut self.rng)
    }

    /// Draw a value from `range`.
    pub fn sample_float(&mut self, range: FloatRange) -> f64 {
        range.sample(&mut self.rng)
    }

    /// Quote a jittered price for `ticker`. Unknown tickers quote around the
    /// default reference price.
    pub fn quote(&mut self, ticker: &str) -> f64 {
        let multiplier = self.settings.price_jitter.sample(&mut self.rng);
        quote_price(ticker, multiplier)
    }

    /// Pick one item uniformly.
    pub(crate) fn pick<T: Copy, const N: usize>(&mut self, items: &[T; N]) -> T {
        items[self.rng.random_range(0..N)]
    }

    /// Simulate one exchange call.
    ///
    /// A simulated failure is a normal result: the record carries the error
    /// message and no price. Only sink faults are returned as errors, after
    /// being recorded on the operation span and logged.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::Sink`] if the sink refuses a metric.
    pub async fn simulate_operation(
        &mut self,
        labels: OperationLabels,
    ) -> Result<OperationRecord, SimulationError> {
        let span = tracing::info_span!(
            "operation",
            otel.name = labels.operation.as_str(),
            otel.status_code = Empty,
            crypto.symbol = labels.symbol.as_str(),
            crypto.exchange = labels.exchange.as_str(),
            "operation.type" = labels.operation.as_str(),
            crypto.price = Empty,
            http.status_code = Empty,
            error = Empty,
            error.message = Empty,
            exception.message = Empty,
        );

        let result = self.execute(labels).instrument(span.clone()).await;

        if let Err(err) = &result {
            span.record("error", true);
            span.record("otel.status_code", "ERROR");
            span.record("exception.message", display(err));
            span.in_scope(|| {
                tracing::error!(
                    symbol = labels.symbol.as_str(),
                    exchange = labels.exchange.as_str(),
                    operation = labels.operation.as_str(),
                    exception = %err,
                    "Unexpected error in {}",
                    labels.operation
                );
            });
        }

        result
    }

    async fn execute(&mut self, labels: OperationLabels) -> Result<OperationRecord, SimulationError> {
        let OperationLabels {
            operation,
            symbol,
            exchange,
        } = labels;

        let delay = self.settings.processing_delay.sample(&mut self.rng);
        tokio::time::sleep(delay).await;
        let duration_ms = delay.as_secs_f64() * 1_000.0;

        let price = self.quote(symbol.as_str());
        let span = Span::current();

        if self.rng.random_bool(self.settings.failure_probability) {
            let error_message = self.pick(&SIMULATED_ERRORS);

            span.record("error", true);
            span.record("error.message", error_message);

            self.sink.record_request(&labels, RequestStatus::Error)?;

            tracing::error!(
                symbol = symbol.as_str(),
                exchange = exchange.as_str(),
                operation = operation.as_str(),
                error = error_message,
                "Error in {operation} for {symbol} on {exchange}: {error_message}"
            );

            return Ok(OperationRecord::failed(
                labels,
                price,
                duration_ms,
                error_message,
            ));
        }

        span.record("crypto.price", price);
        span.record("http.status_code", 200_i64);

        self.sink.record_request(&labels, RequestStatus::Success)?;
        self.sink.record_duration(&labels, duration_ms)?;
        self.sink.publish_price(price)?;

        tracing::info!(
            symbol = symbol.as_str(),
            exchange = exchange.as_str(),
            operation = operation.as_str(),
            price,
            duration_ms,
            "Successfully executed {operation} for {symbol} on {exchange}: ${price:.2}"
        );

        Ok(OperationRecord::succeeded(labels, price, duration_ms))
    }
}

// =============================================================================
// Tests
// =============================================================================
