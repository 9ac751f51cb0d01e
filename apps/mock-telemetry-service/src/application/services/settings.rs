//! Simulation Settings
//!
//! Every probability, delay, and count the generator draws from. Defaults
//! reproduce the reference workload; each value can be overridden at startup.

use std::time::Duration;

use rand::Rng;

/// Default probability that a simulated call fails.
pub const DEFAULT_FAILURE_PROBABILITY: f64 = 0.1;

/// Default simulated processing time per call.
pub const DEFAULT_PROCESSING_DELAY: DelayRange = DelayRange::from_millis(10, 500);

/// Default multiplier applied to the reference price.
pub const DEFAULT_PRICE_JITTER: FloatRange = FloatRange::new(0.95, 1.05);

/// Default confidence attached to workflow decisions.
pub const DEFAULT_CONFIDENCE: FloatRange = FloatRange::new(0.6, 0.95);

/// Default extra pause after the order book step of a workflow.
pub const DEFAULT_ORDERBOOK_PAUSE: DelayRange = DelayRange::from_millis(50, 150);

/// Default extra pause after the recent trades step of a workflow.
pub const DEFAULT_TRADES_PAUSE: DelayRange = DelayRange::from_millis(30, 100);

/// Default number of standalone operations per iteration.
pub const DEFAULT_OPERATIONS_PER_ITERATION: CountRange = CountRange::new(3, 8);

/// Default pause after each standalone operation.
pub const DEFAULT_OPERATION_PAUSE: DelayRange = DelayRange::from_millis(100, 500);

/// Default number of workflows per iteration.
pub const DEFAULT_WORKFLOWS_PER_ITERATION: CountRange = CountRange::new(1, 3);

/// Default pause after each workflow.
pub const DEFAULT_WORKFLOW_PAUSE: DelayRange = DelayRange::from_millis(500, 1_000);

/// Default pause between iterations.
pub const DEFAULT_ITERATION_PAUSE: DelayRange = DelayRange::from_millis(2_000, 5_000);

// =============================================================================
// Ranges
// =============================================================================

/// Inclusive range of durations, sampled uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayRange {
    /// Shortest delay.
    pub min: Duration,
    /// Longest delay.
    pub max: Duration,
}

impl DelayRange {
    /// Range between two millisecond bounds.
    #[must_use]
    pub const fn from_millis(min: u64, max: u64) -> Self {
        Self {
            min: Duration::from_millis(min),
            max: Duration::from_millis(max),
        }
    }

    /// Draw a delay.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        Duration::from_secs_f64(rng.random_range(self.min.as_secs_f64()..=self.max.as_secs_f64()))
    }

    const fn is_ordered(&self) -> bool {
        self.min.as_nanos() <= self.max.as_nanos()
    }
}

/// Inclusive range of counts, sampled uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountRange {
    /// Smallest count.
    pub min: u32,
    /// Largest count.
    pub max: u32,
}

impl CountRange {
    /// Range between two bounds.
    #[must_use]
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Draw a count.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        rng.random_range(self.min..=self.max)
    }
}

/// Inclusive range of floats, sampled uniformly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatRange {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

impl FloatRange {
    /// Range between two bounds.
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Draw a value.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        rng.random_range(self.min..=self.max)
    }

    /// Whether `value` lies inside the range.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

// =============================================================================
// Settings
// =============================================================================

/// A setting that cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid simulation setting {name}: {reason}")]
pub struct InvalidSetting {
    /// Setting name.
    pub name: &'static str,
    /// What is wrong with it.
    pub reason: String,
}

/// Knobs for the generator, composer, and driver.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationSettings {
    /// Probability that a simulated call fails.
    pub failure_probability: f64,
    /// Simulated processing time per call.
    pub processing_delay: DelayRange,
    /// Multiplier applied to the reference price.
    pub price_jitter: FloatRange,
    /// Confidence attached to workflow decisions.
    pub confidence: FloatRange,
    /// Pause after the order book step.
    pub orderbook_pause: DelayRange,
    /// Pause after the recent trades step.
    pub trades_pause: DelayRange,
    /// Standalone operations per iteration.
    pub operations_per_iteration: CountRange,
    /// Pause after each standalone operation.
    pub operation_pause: DelayRange,
    /// Workflows per iteration.
    pub workflows_per_iteration: CountRange,
    /// Pause after each workflow.
    pub workflow_pause: DelayRange,
    /// Pause between iterations.
    pub iteration_pause: DelayRange,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            failure_probability: DEFAULT_FAILURE_PROBABILITY,
            processing_delay: DEFAULT_PROCESSING_DELAY,
            price_jitter: DEFAULT_PRICE_JITTER,
            confidence: DEFAULT_CONFIDENCE,
            orderbook_pause: DEFAULT_ORDERBOOK_PAUSE,
            trades_pause: DEFAULT_TRADES_PAUSE,
            operations_per_iteration: DEFAULT_OPERATIONS_PER_ITERATION,
            operation_pause: DEFAULT_OPERATION_PAUSE,
            workflows_per_iteration: DEFAULT_WORKFLOWS_PER_ITERATION,
            workflow_pause: DEFAULT_WORKFLOW_PAUSE,
            iteration_pause: DEFAULT_ITERATION_PAUSE,
        }
    }
}

impl SimulationSettings {
    /// Check that every value can be sampled.
    ///
    /// # Errors
    ///
    /// Returns the first setting that is out of bounds.
    pub fn validate(&self) -> Result<(), InvalidSetting> {
        if !(0.0..=1.0).contains(&self.failure_probability) {
            return Err(InvalidSetting {
                name: "failure_probability",
                reason: format!("{} is outside [0, 1]", self.failure_probability),
            });
        }

        for (name, range) in [
            ("price_jitter", self.price_jitter),
            ("confidence", self.confidence),
        ] {
            if !range.min.is_finite() || !range.max.is_finite() || range.min > range.max {
                return Err(InvalidSetting {
                    name,
                    reason: format!("[{}, {}] is not a finite ordered range", range.min, range.max),
                });
            }
        }

        for (name, range) in [
            ("processing_delay", self.processing_delay),
            ("orderbook_pause", self.orderbook_pause),
            ("trades_pause", self.trades_pause),
            ("operation_pause", self.operation_pause),
            ("workflow_pause", self.workflow_pause),
            ("iteration_pause", self.iteration_pause),
        ] {
            if !range.is_ordered() {
                return Err(InvalidSetting {
                    name,
                    reason: format!("min {:?} exceeds max {:?}", range.min, range.max),
                });
            }
        }

        for (name, range) in [
            ("operations_per_iteration", self.operations_per_iteration),
            ("workflows_per_iteration", self.workflows_per_iteration),
        ] {
            if range.min > range.max {
                return Err(InvalidSetting {
                    name,
                    reason: format!("min {} exceeds max {}", range.min, range.max),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(SimulationSettings::default().validate(), Ok(()));
    }

    #[test]
    fn default_values() {
        let settings = SimulationSettings::default();
        assert_eq!(settings.failure_probability, 0.1);
        assert_eq!(settings.processing_delay.min, Duration::from_millis(10));
        assert_eq!(settings.processing_delay.max, Duration::from_millis(500));
        assert_eq!(settings.operations_per_iteration, CountRange::new(3, 8));
        assert_eq!(settings.workflows_per_iteration, CountRange::new(1, 3));
        assert_eq!(settings.iteration_pause.max, Duration::from_secs(5));
    }

    #[test]
    fn rejects_probability_above_one() {
        let settings = SimulationSettings {
            failure_probability: 1.5,
            ..SimulationSettings::default()
        };
        let err = settings.validate().unwrap_err();
        assert_eq!(err.name, "failure_probability");
    }

    #[test]
    fn rejects_nan_probability() {
        let settings = SimulationSettings {
            failure_probability: f64::NAN,
            ..SimulationSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn rejects_inverted_delay() {
        let settings = SimulationSettings {
            trades_pause: DelayRange::from_millis(100, 30),
            ..SimulationSettings::default()
        };
        let err = settings.validate().unwrap_err();
        assert_eq!(err.name, "trades_pause");
    }

    #[test]
    fn rejects_inverted_count() {
        let settings = SimulationSettings {
            workflows_per_iteration: CountRange::new(4, 2),
            ..SimulationSettings::default()
        };
        let err = settings.validate().unwrap_err();
        assert_eq!(err.name, "workflows_per_iteration");
    }

    #[test]
    fn samples_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let delay = DEFAULT_PROCESSING_DELAY.sample(&mut rng);
            assert!(delay >= Duration::from_millis(10) && delay <= Duration::from_millis(500));

            let count = DEFAULT_OPERATIONS_PER_ITERATION.sample(&mut rng);
            assert!((3..=8).contains(&count));

            assert!(DEFAULT_CONFIDENCE.contains(DEFAULT_CONFIDENCE.sample(&mut rng)));
        }
    }

    #[test]
    fn degenerate_range_returns_bound() {
        let mut rng = StdRng::seed_from_u64(1);
        let fixed = DelayRange::from_millis(0, 0);
        assert_eq!(fixed.sample(&mut rng), Duration::ZERO);
        assert_eq!(CountRange::new(2, 2).sample(&mut rng), 2);
    }
}
