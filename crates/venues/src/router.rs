//! Venue routing
//!
//! Quotes every configured venue concurrently and picks the one with the
//! best net output (gross output minus the venue fee).

use std::sync::Arc;

use futures::future::try_join_all;
use tracing::info;

use crate::adapter::VenueAdapter;
use crate::error::{Result, VenueError};
use crate::types::Quote;

/// The routing outcome: which venue won and with what quote
#[derive(Debug, Clone)]
pub struct RouteDecision {
    pub venue: String,
    pub quote: Quote,
}

/// Routes swaps across a fixed, ordered set of venues
///
/// The configuration order matters: when two venues score identically,
/// the earlier one wins.
pub struct VenueRouter {
    venues: Vec<Arc<dyn VenueAdapter>>,
}

impl VenueRouter {
    pub fn new(venues: Vec<Arc<dyn VenueAdapter>>) -> Self {
        Self { venues }
    }

    pub fn venue_count(&self) -> usize {
        self.venues.len()
    }

    /// Look up a venue by name, e.g. to execute against a routing decision
    pub fn adapter(&self, name: &str) -> Option<Arc<dyn VenueAdapter>> {
        self.venues.iter().find(|v| v.name() == name).cloned()
    }

    /// Quote all venues and select the best net output
    ///
    /// All quote requests run concurrently. If any venue fails to quote,
    /// the whole routing call fails; a degraded venue is never silently
    /// excluded from price discovery.
    pub async fn route(
        &self,
        token_in: &str,
        token_out: &str,
        amount_in: f64,
    ) -> Result<RouteDecision> {
        if self.venues.is_empty() {
            return Err(VenueError::NoVenues);
        }

        let quotes: Vec<Quote> = try_join_all(
            self.venues
                .iter()
                .map(|venue| venue.get_quote(token_in, token_out, amount_in)),
        )
        .await?;

        // Stable max scan: strictly-greater scores displace the leader,
        // so ties stay with the earliest venue
        let mut best = 0;
        for (i, quote) in quotes.iter().enumerate().skip(1) {
            if quote.score() > quotes[best].score() {
                best = i;
            }
        }

        let decision = RouteDecision {
            venue: self.venues[best].name().to_string(),
            quote: quotes[best],
        };

        info!(
            venue = %decision.venue,
            amount_out = decision.quote.amount_out,
            score = decision.quote.score(),
            "Routing decision made"
        );

        Ok(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::types::ExecutionResult;

    /// Venue returning a canned quote, or failing on demand
    struct StubVenue {
        name: String,
        quote: Option<Quote>,
    }

    impl StubVenue {
        fn quoting(name: &str, amount_out: f64, fee: f64) -> Arc<dyn VenueAdapter> {
            Arc::new(Self {
                name: name.to_string(),
                quote: Some(Quote {
                    price: 1.0,
                    amount_out,
                    fee,
                }),
            })
        }

        fn failing(name: &str) -> Arc<dyn VenueAdapter> {
            Arc::new(Self {
                name: name.to_string(),
                quote: None,
            })
        }
    }

    #[async_trait]
    impl VenueAdapter for StubVenue {
        fn name(&self) -> &str {
            &self.name
        }

        async fn get_quote(&self, _: &str, _: &str, _: f64) -> Result<Quote> {
            self.quote
                .ok_or_else(|| VenueError::quote_failed(&self.name, "venue offline"))
        }

        async fn execute_swap(&self, _: f64, _: f64) -> Result<ExecutionResult> {
            unimplemented!("router tests never execute")
        }
    }

    #[tokio::test]
    async fn test_strictly_better_score_wins() {
        let router = VenueRouter::new(vec![
            StubVenue::quoting("a", 100.0, 0.01),
            StubVenue::quoting("b", 90.0, 0.01),
        ]);
        let decision = router.route("SOL", "USDC", 10.0).await.unwrap();
        assert_eq!(decision.venue, "a");

        let router = VenueRouter::new(vec![
            StubVenue::quoting("a", 80.0, 0.01),
            StubVenue::quoting("b", 95.0, 0.01),
        ]);
        let decision = router.route("SOL", "USDC", 10.0).await.unwrap();
        assert_eq!(decision.venue, "b");
        assert_eq!(decision.quote.amount_out, 95.0);
    }

    #[tokio::test]
    async fn test_fee_changes_the_winner() {
        // b quotes more gross but charges enough fee to lose
        let router = VenueRouter::new(vec![
            StubVenue::quoting("a", 100.0, 0.001),
            StubVenue::quoting("b", 100.5, 0.01),
        ]);
        let decision = router.route("SOL", "USDC", 10.0).await.unwrap();
        assert_eq!(decision.venue, "a");
    }

    #[tokio::test]
    async fn test_tie_goes_to_earliest_configured() {
        let router = VenueRouter::new(vec![
            StubVenue::quoting("first", 100.0, 0.01),
            StubVenue::quoting("second", 100.0, 0.01),
        ]);
        let decision = router.route("SOL", "USDC", 10.0).await.unwrap();
        assert_eq!(decision.venue, "first");
    }

    #[tokio::test]
    async fn test_any_quote_failure_fails_routing() {
        let router = VenueRouter::new(vec![
            StubVenue::quoting("a", 100.0, 0.01),
            StubVenue::failing("b"),
        ]);
        let err = router.route("SOL", "USDC", 10.0).await.unwrap_err();
        assert!(matches!(err, VenueError::QuoteFailed { .. }));
    }

    #[tokio::test]
    async fn test_empty_router_fails() {
        let router = VenueRouter::new(vec![]);
        let err = router.route("SOL", "USDC", 10.0).await.unwrap_err();
        assert!(matches!(err, VenueError::NoVenues));
    }
}
