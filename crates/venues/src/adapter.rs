//! VenueAdapter trait definition

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ExecutionResult, Quote};

/// A swap venue the router can quote and execute against
///
/// Implementations must be safe to query concurrently; the router fires
/// all quote requests at once.
#[async_trait]
pub trait VenueAdapter: Send + Sync {
    /// Stable venue name used for routing decisions and persistence
    fn name(&self) -> &str;

    /// Quote the gross output for swapping `amount_in` of `token_in`
    /// into `token_out`
    async fn get_quote(&self, token_in: &str, token_out: &str, amount_in: f64) -> Result<Quote>;

    /// Execute the swap
    ///
    /// # Errors
    /// Returns [`VenueError::SlippageExceeded`](crate::VenueError::SlippageExceeded)
    /// when the realized output lands below `min_amount_out`.
    async fn execute_swap(&self, amount_in: f64, min_amount_out: f64) -> Result<ExecutionResult>;
}
