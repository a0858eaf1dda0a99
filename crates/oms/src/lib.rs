//! Order domain and storage for DexFlow
//!
//! This crate owns the order lifecycle model and its persistence.
//!
//! # Features
//!
//! - Order creation and status tracking
//! - Forward-only execution status machine
//! - Pluggable storage via the [`OrderStore`] trait
//!
//! # Feature Flags
//!
//! - `postgres` - Enable PostgreSQL storage

pub mod error;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use error::{OmsError, Result};
pub use types::{Order, OrderStatus, OrderType, OrderUpdate};

// Store exports
pub use store::memory::InMemoryOrderStore;
pub use store::traits::{OmsResult, OrderStore};

#[cfg(feature = "postgres")]
pub use store::postgres::PostgresOrderStore;
