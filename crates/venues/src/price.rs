//! Price sources for simulated venues
//!
//! Venues do not draw randomness directly; they pull prices from a
//! [`PriceSource`] so tests can pin the exact execution path.

use parking_lot::Mutex;
use rand::Rng;

/// Supplies the next simulated execution price
pub trait PriceSource: Send + Sync {
    fn next_price(&self) -> f64;
}

/// Draws uniformly from a price band around a 1:1 reference
pub struct UniformPriceSource {
    lo: f64,
    hi: f64,
}

impl UniformPriceSource {
    pub fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }
}

impl PriceSource for UniformPriceSource {
    fn next_price(&self) -> f64 {
        if self.lo >= self.hi {
            return self.lo;
        }
        rand::thread_rng().gen_range(self.lo..self.hi)
    }
}

/// Replays a fixed sequence of prices, repeating the last one forever
///
/// Deterministic stand-in for [`UniformPriceSource`] in tests.
pub struct SequencePriceSource {
    prices: Vec<f64>,
    index: Mutex<usize>,
}

impl SequencePriceSource {
    pub fn new(prices: Vec<f64>) -> Self {
        assert!(!prices.is_empty(), "price sequence must not be empty");
        Self {
            prices,
            index: Mutex::new(0),
        }
    }

    /// A source that always returns the same price
    pub fn constant(price: f64) -> Self {
        Self::new(vec![price])
    }
}

impl PriceSource for SequencePriceSource {
    fn next_price(&self) -> f64 {
        let mut index = self.index.lock();
        let price = self.prices[*index];
        if *index + 1 < self.prices.len() {
            *index += 1;
        }
        price
    }
}
