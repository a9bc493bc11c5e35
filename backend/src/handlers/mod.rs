//! HTTP handlers for the Stockroom API

pub mod auth;
pub mod catalog;
pub mod health;
pub mod inventory;
pub mod invoice;
pub mod order;
pub mod user;

pub use auth::*;
pub use catalog::*;
pub use health::*;
pub use inventory::*;
pub use invoice::*;
pub use order::*;
pub use user::*;
