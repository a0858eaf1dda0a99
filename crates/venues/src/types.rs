//! Quote and execution result types

use serde::{Deserialize, Serialize};

/// Round to `dp` decimal places, half away from zero.
///
/// Matches how the wire format has always presented these values
/// (e.g. `round_dp(10.0 * 0.99, 8) == 9.9`).
pub fn round_dp(value: f64, dp: u32) -> f64 {
    let factor = 10f64.powi(dp as i32);
    (value * factor).round() / factor
}

/// A venue's answer to "what would this swap yield right now"
///
/// `amount_out` is gross output; the venue's `fee` has not been deducted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Quoted execution price (token_out per token_in)
    pub price: f64,
    /// Gross output for the requested input, rounded to 6 decimals
    #[serde(rename = "amountOut")]
    pub amount_out: f64,
    /// Venue fee as a fraction (e.g. 0.003)
    pub fee: f64,
}

impl Quote {
    /// Net output after the venue fee; this is what routing compares
    pub fn score(&self) -> f64 {
        self.amount_out * (1.0 - self.fee)
    }
}

/// Outcome of a successfully executed swap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Venue transaction hash
    #[serde(rename = "txHash")]
    pub tx_hash: String,
    /// Price the swap actually executed at
    #[serde(rename = "executedPrice")]
    pub executed_price: f64,
    /// Realized output, rounded to 6 decimals
    #[serde(rename = "executedAmountOut")]
    pub executed_amount_out: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_dp() {
        assert_eq!(round_dp(10.0 * 0.99, 8), 9.9);
        assert_eq!(round_dp(1.2345678949, 6), 1.234568);
        assert_eq!(round_dp(-2.5, 0), -3.0);
        assert_eq!(round_dp(0.0, 6), 0.0);
    }

    #[test]
    fn test_quote_score_deducts_fee() {
        let quote = Quote {
            price: 1.0,
            amount_out: 100.0,
            fee: 0.01,
        };
        assert!((quote.score() - 99.0).abs() < 1e-12);
    }

    #[test]
    fn test_quote_serializes_camel_case() {
        let quote = Quote {
            price: 1.0,
            amount_out: 100.0,
            fee: 0.003,
        };
        let json = serde_json::to_value(&quote).unwrap();
        assert!(json.get("amountOut").is_some());
        assert!(json.get("amount_out").is_none());
    }
}
