//! Workflow Composer
//!
//! Chains simulated calls into a trading-signal workflow so the trace
//! backend receives nested spans:
//!
//! ```text
//! process_trading_signal
//! ├── fetch_current_price   └── fetch_price
//! ├── analyze_orderbook     └── fetch_orderbook
//! ├── check_recent_trades   └── fetch_trades
//! └── make_trading_decision
//! ```
//!
//! Simulated step failures never abort the workflow; the parent span is
//! always marked completed.

use tracing::field::Empty;
use tracing::{Instrument, Span};

use super::simulator::{SimulationError, Simulator};
use crate::domain::market::{Decision, OperationKind};
use crate::domain::records::{OperationLabels, WorkflowRecord};

/// `workflow.type` attribute on the parent span.
pub const WORKFLOW_TYPE: &str = "trading_signal";

impl Simulator<'_> {
    /// Simulate one trading-signal workflow for a random ticker and venue.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError`] if a step hits a sink fault.
    pub async fn simulate_workflow(&mut self) -> Result<WorkflowRecord, SimulationError> {
        let symbol = self.random_symbol();
        let exchange = self.random_exchange();

        let span = tracing::info_span!(
            "workflow",
            otel.name = "process_trading_signal",
            crypto.symbol = symbol.as_str(),
            crypto.exchange = exchange.as_str(),
            "workflow.type" = WORKFLOW_TYPE,
            crypto.current_price = Empty,
            workflow.status = Empty,
        );

        self.run_workflow(OperationLabels::new(OperationKind::FetchPrice, symbol, exchange))
            .instrument(span)
            .await
    }

    async fn run_workflow(
        &mut self,
        labels: OperationLabels,
    ) -> Result<WorkflowRecord, SimulationError> {
        let OperationLabels {
            symbol, exchange, ..
        } = labels;
        let parent = Span::current();

        tracing::info!(
            symbol = symbol.as_str(),
            exchange = exchange.as_str(),
            "Starting trading signal processing for {symbol} on {exchange}"
        );

        let price_fetch = self
            .simulate_operation(labels)
            .instrument(step_span("fetch_current_price"))
            .await?;
        if let Some(price) = price_fetch.price() {
            parent.record("crypto.current_price", price);
        }

        let orderbook_pause = self.sample_delay(self.settings().orderbook_pause);
        let orderbook_fetch = async {
            let record = self
                .simulate_operation(OperationLabels {
                    operation: OperationKind::FetchOrderbook,
                    ..labels
                })
                .await?;
            tokio::time::sleep(orderbook_pause).await;
            Ok::<_, SimulationError>(record)
        }
        .instrument(step_span("analyze_orderbook"))
        .await?;

        let trades_pause = self.sample_delay(self.settings().trades_pause);
        let trades_fetch = async {
            let record = self
                .simulate_operation(OperationLabels {
                    operation: OperationKind::FetchTrades,
                    ..labels
                })
                .await?;
            tokio::time::sleep(trades_pause).await;
            Ok::<_, SimulationError>(record)
        }
        .instrument(step_span("check_recent_trades"))
        .await?;

        let current_price = price_fetch.price();
        let (decision, confidence) = {
            let decision_span = tracing::info_span!(
                "workflow_step",
                otel.name = "make_trading_decision",
                trading.decision = Empty,
                trading.confidence = Empty,
            );
            let _entered = decision_span.enter();

            let decision = self.pick(&Decision::ALL);
            let confidence = self.sample_float(self.settings().confidence);
            decision_span.record("trading.decision", decision.as_str());
            decision_span.record("trading.confidence", confidence);

            tracing::info!(
                symbol = symbol.as_str(),
                exchange = exchange.as_str(),
                decision = decision.as_str(),
                price = ?current_price,
                "Trading decision: {decision} for {symbol}"
            );

            (decision, confidence)
        };

        parent.record("workflow.status", "completed");
        tracing::info!(
            symbol = symbol.as_str(),
            exchange = exchange.as_str(),
            "Completed trading signal processing for {symbol}"
        );

        Ok(WorkflowRecord {
            symbol,
            exchange,
            decision,
            confidence,
            price_fetch,
            orderbook_fetch,
            trades_fetch,
        })
    }
}

fn step_span(name: &'static str) -> Span {
    tracing::info_span!("workflow_step", otel.name = name)
}
