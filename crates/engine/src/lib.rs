//! Order execution engine for DexFlow
//!
//! The heart of the system: [`OrderPipeline`] drives each order through
//! routing, transaction building and simulated execution, persisting
//! progress and fanning out [`StatusEvent`]s to subscribed clients via
//! the [`StatusBroadcaster`].

pub mod broadcast;
pub mod error;
pub mod event;
pub mod pipeline;

pub use broadcast::{StatusBroadcaster, SubscriberId};
pub use error::{EngineError, Result};
pub use event::StatusEvent;
pub use pipeline::OrderPipeline;
