//! Shared types and domain logic for the Stockroom inventory platform
//!
//! This crate contains the entity models and the pure domain rules
//! (replenishment math, order lifecycle, invoice arithmetic) used by the
//! backend. Nothing in here touches the database or the network.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
