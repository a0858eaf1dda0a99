//! Simulated AMM venue
//!
//! Stands in for a real venue integration: prices come from a
//! [`PriceSource`] band around a 1:1 reference, fees are flat fractions,
//! and transaction hashes are minted locally.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::distributions::Alphanumeric;
use rand::Rng;
use tracing::debug;

use crate::adapter::VenueAdapter;
use crate::error::{Result, VenueError};
use crate::price::{PriceSource, UniformPriceSource};
use crate::types::{round_dp, ExecutionResult, Quote};

const TX_HASH_PREFIX: &str = "MOCKTX_";
const TX_HASH_LEN: usize = 8;

/// A venue that simulates quoting and swapping against a price band
pub struct SimulatedVenue {
    name: String,
    fee: f64,
    prices: Arc<dyn PriceSource>,
    latency: Option<Duration>,
}

impl SimulatedVenue {
    /// Create a venue drawing prices uniformly from `[band_lo, band_hi)`
    pub fn new(name: impl Into<String>, band_lo: f64, band_hi: f64, fee: f64) -> Self {
        Self {
            name: name.into(),
            fee,
            prices: Arc::new(UniformPriceSource::new(band_lo, band_hi)),
            latency: None,
        }
    }

    /// Create a venue with an explicit price source (used by tests)
    pub fn with_price_source(
        name: impl Into<String>,
        fee: f64,
        prices: Arc<dyn PriceSource>,
    ) -> Self {
        Self {
            name: name.into(),
            fee,
            prices,
            latency: None,
        }
    }

    /// Add artificial per-call latency to mimic a live venue
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Raydium-flavored preset: ±2% band, 30bps fee
    pub fn raydium() -> Self {
        Self::new("raydium", 0.98, 1.02, 0.003)
    }

    /// Meteora-flavored preset: -3%/+2% band, 20bps fee
    pub fn meteora() -> Self {
        Self::new("meteora", 0.97, 1.02, 0.002)
    }

    pub fn fee(&self) -> f64 {
        self.fee
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn mint_tx_hash() -> String {
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(TX_HASH_LEN)
            .map(|c| (c as char).to_ascii_lowercase())
            .collect();
        format!("{}{}", TX_HASH_PREFIX, suffix)
    }
}

#[async_trait]
impl VenueAdapter for SimulatedVenue {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get_quote(&self, token_in: &str, token_out: &str, amount_in: f64) -> Result<Quote> {
        self.simulate_latency().await;

        let price = self.prices.next_price();
        let quote = Quote {
            price,
            amount_out: round_dp(amount_in * price, 6),
            fee: self.fee,
        };

        debug!(
            venue = %self.name,
            token_in,
            token_out,
            amount_in,
            price,
            amount_out = quote.amount_out,
            "Quote produced"
        );

        Ok(quote)
    }

    async fn execute_swap(&self, amount_in: f64, min_amount_out: f64) -> Result<ExecutionResult> {
        self.simulate_latency().await;

        // The swap re-prices; the fill can land anywhere in the band
        let executed_price = self.prices.next_price();
        let executed_out = amount_in * executed_price;

        if executed_out < min_amount_out {
            debug!(
                venue = %self.name,
                executed_out,
                min_amount_out,
                "Swap rejected by slippage floor"
            );
            return Err(VenueError::SlippageExceeded);
        }

        Ok(ExecutionResult {
            tx_hash: Self::mint_tx_hash(),
            executed_price,
            executed_amount_out: round_dp(executed_out, 6),
        })
    }
}
