//! Application Services
//!
//! Services that generate the synthetic workload.
//!
//! - `Simulator`: single simulated exchange calls (event generator)
//! - `workflow`: multi-step trading-signal workflows on top of the simulator
//! - `Driver`: the pacing loop that runs both until shutdown

mod driver;
mod settings;
mod simulator;
mod workflow;

pub use driver::{Driver, DriverState, DriverSummary};
pub use settings::{
    CountRange, DEFAULT_CONFIDENCE, DEFAULT_FAILURE_PROBABILITY, DEFAULT_ITERATION_PAUSE,
    DEFAULT_OPERATION_PAUSE, DEFAULT_OPERATIONS_PER_ITERATION, DEFAULT_ORDERBOOK_PAUSE,
    DEFAULT_PRICE_JITTER, DEFAULT_PROCESSING_DELAY, DEFAULT_TRADES_PAUSE, DEFAULT_WORKFLOW_PAUSE,
    DEFAULT_WORKFLOWS_PER_ITERATION, DelayRange, FloatRange, InvalidSetting, SimulationSettings,
};
pub use simulator::{SimulationError, Simulator};
pub use workflow::WORKFLOW_TYPE;
