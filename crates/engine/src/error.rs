//! Engine error types

use oms::OmsError;
use thiserror::Error;
use uuid::Uuid;
use venues::VenueError;

/// Errors from the execution pipeline
#[derive(Error, Debug)]
pub enum EngineError {
    /// The order could not be loaded at the start of an attempt
    #[error("Failed to load order {order_id}: {source}")]
    Load {
        order_id: Uuid,
        #[source]
        source: OmsError,
    },

    /// Routing or execution failed at a venue
    #[error(transparent)]
    Venue(#[from] VenueError),

    /// A mid-pipeline persistence write failed
    #[error("Storage error: {0}")]
    Storage(OmsError),

    /// The router chose a venue it can no longer resolve
    #[error("Chosen venue '{0}' is not configured")]
    UnknownVenue(String),
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
