//! Venue error types

use thiserror::Error;

/// Errors that can occur when quoting or executing against a venue
#[derive(Error, Debug)]
pub enum VenueError {
    /// Realized output fell below the slippage floor
    #[error("Slippage exceeded, swap failed")]
    SlippageExceeded,

    /// Venue could not produce a quote
    #[error("Quote failed on {venue}: {reason}")]
    QuoteFailed { venue: String, reason: String },

    /// Venue rejected or lost the swap
    #[error("Execution failed on {venue}: {reason}")]
    ExecutionFailed { venue: String, reason: String },

    /// Router was constructed without any venues
    #[error("No venues available for routing")]
    NoVenues,
}

impl VenueError {
    pub fn quote_failed(venue: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::QuoteFailed {
            venue: venue.into(),
            reason: reason.into(),
        }
    }

    pub fn execution_failed(venue: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ExecutionFailed {
            venue: venue.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for venue operations
pub type Result<T> = std::result::Result<T, VenueError>;
