//! Latest-value holder behind the `crypto_price` observable gauge.
//!
//! The simulator writes into the cell; the metric reader thread polls it
//! through [`GaugeSource`] on every collection cycle.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Value source polled by an observable gauge callback.
pub trait GaugeSource: Send + Sync {
    /// Latest value, read on each collection.
    fn poll(&self) -> f64;
}

/// Shared cell holding the most recently quoted price.
///
/// Clones share the same value. Reads before the first write return `0.0`.
#[derive(Debug, Clone, Default)]
pub struct PriceCell {
    bits: Arc<AtomicU64>,
}

impl PriceCell {
    /// Create a cell holding `0.0`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the held price.
    pub fn set(&self, price: f64) {
        self.bits.store(price.to_bits(), Ordering::Relaxed);
    }

    /// Read the held price.
    #[must_use]
    pub fn get(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Relaxed))
    }
}

impl GaugeSource for PriceCell {
    fn poll(&self) -> f64 {
        self.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero() {
        assert_eq!(PriceCell::new().poll(), 0.0);
    }

    #[test]
    fn clones_share_the_value() {
        let cell = PriceCell::new();
        let reader = cell.clone();

        cell.set(45_123.5);

        assert_eq!(reader.poll(), 45_123.5);
    }
}
