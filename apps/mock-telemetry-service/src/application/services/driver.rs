//! Driver Loop
//!
//! Runs iterations of standalone operations followed by workflows, pausing a
//! random interval after each, until the shutdown token is cancelled or the
//! optional iteration limit is reached.
//!
//! Cancellation is observed at every suspension point, so an interrupt never
//! waits for the current iteration to finish. Sink faults end the loop with
//! an error; there is no retry.

use tokio_util::sync::CancellationToken;

use super::simulator::{SimulationError, Simulator};

/// Lifecycle of the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Generating workload.
    Running,
    /// Loop exited; no more workload will be generated.
    Stopping,
}

/// Totals accumulated across a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverSummary {
    /// Fully completed iterations.
    pub iterations: u64,
    /// Operations simulated, standalone and inside workflows.
    pub operations: u64,
    /// Operations that simulated a failure.
    pub failed_operations: u64,
    /// Workflows completed.
    pub workflows: u64,
}

/// Repeatedly drives a [`Simulator`].
pub struct Driver<'a> {
    simulator: Simulator<'a>,
    shutdown: CancellationToken,
    max_iterations: Option<u64>,
    state: DriverState,
    summary: DriverSummary,
}

impl<'a> Driver<'a> {
    /// Create a driver that runs until `shutdown` is cancelled.
    #[must_use]
    pub fn new(simulator: Simulator<'a>, shutdown: CancellationToken) -> Self {
        Self {
            simulator,
            shutdown,
            max_iterations: None,
            state: DriverState::Running,
            summary: DriverSummary::default(),
        }
    }

    /// Stop after `max` iterations. `None` runs until cancelled.
    #[must_use]
    pub fn with_max_iterations(mut self, max: Option<u64>) -> Self {
        self.max_iterations = max;
        self
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> DriverState {
        self.state
    }

    /// Totals so far.
    #[must_use]
    pub const fn summary(&self) -> DriverSummary {
        self.summary
    }

    /// Run until cancelled or the iteration limit is reached.
    ///
    /// # Errors
    ///
    /// Returns the first [`SimulationError`] raised by an iteration.
    pub async fn run(&mut self) -> Result<DriverSummary, SimulationError> {
        let shutdown = self.shutdown.clone();

        while !self.limit_reached() {
            let iteration = self.summary.iterations + 1;

            let outcome = tokio::select! {
                biased;
                () = shutdown.cancelled() => None,
                result = self.run_iteration(iteration) => Some(result),
            };

            match outcome {
                None => {
                    tracing::info!("Shutting down mock telemetry service");
                    break;
                }
                Some(Err(err)) => {
                    tracing::error!(error = %err, iteration, "Fatal error in main loop");
                    self.state = DriverState::Stopping;
                    return Err(err);
                }
                Some(Ok(())) => self.summary.iterations = iteration,
            }

            if self.limit_reached() {
                tracing::info!(iterations = self.summary.iterations, "Iteration limit reached");
                break;
            }

            let pause = self.simulator.sample_delay(self.simulator.settings().iteration_pause);
            tracing::debug!("Sleeping for {:.2} seconds", pause.as_secs_f64());

            tokio::select! {
                biased;
                () = shutdown.cancelled() => {
                    tracing::info!("Shutting down mock telemetry service");
                    break;
                }
                () = tokio::time::sleep(pause) => {}
            }
        }

        self.state = DriverState::Stopping;
        Ok(self.summary)
    }

    fn limit_reached(&self) -> bool {
        self.max_iterations
            .is_some_and(|max| self.summary.iterations >= max)
    }

    async fn run_iteration(&mut self, iteration: u64) -> Result<(), SimulationError> {
        tracing::info!(iteration, "Starting iteration {iteration}");

        let operations = self
            .simulator
            .sample_count(self.simulator.settings().operations_per_iteration);
        for _ in 0..operations {
            let labels = self.simulator.random_labels();
            let record = self.simulator.simulate_operation(labels).await?;
            self.summary.operations += 1;
            if !record.is_success() {
                self.summary.failed_operations += 1;
            }

            let pause = self
                .simulator
                .sample_delay(self.simulator.settings().operation_pause);
            tokio::time::sleep(pause).await;
        }

        let workflows = self
            .simulator
            .sample_count(self.simulator.settings().workflows_per_iteration);
        for _ in 0..workflows {
            let record = self.simulator.simulate_workflow().await?;
            self.summary.workflows += 1;
            for op in record.operations() {
                self.summary.operations += 1;
                if !op.is_success() {
                    self.summary.failed_operations += 1;
                }
            }

            let pause = self
                .simulator
                .sample_delay(self.simulator.settings().workflow_pause);
            tokio::time::sleep(pause).await;
        }

        tracing::info!(iteration, "Completed iteration {iteration}");
        Ok(())
    }
}
