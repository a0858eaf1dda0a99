//! Venue adapters and smart routing for DexFlow
//!
//! This crate provides:
//! - The [`VenueAdapter`] trait for quoting and executing swaps
//! - [`SimulatedVenue`], a price-band simulation of an AMM venue
//! - [`VenueRouter`], which quotes every venue concurrently and picks
//!   the best net output

pub mod adapter;
pub mod error;
pub mod price;
pub mod router;
pub mod simulated;
pub mod types;

pub use adapter::VenueAdapter;
pub use error::{Result, VenueError};
pub use price::{PriceSource, SequencePriceSource, UniformPriceSource};
pub use router::{RouteDecision, VenueRouter};
pub use simulated::SimulatedVenue;
pub use types::{round_dp, ExecutionResult, Quote};
