//! Business logic services for the Stockroom backend

pub mod auth;
pub mod catalog;
pub mod inventory;
pub mod invoice;
pub mod notification;
pub mod order;
pub mod user;

pub use auth::AuthService;
pub use catalog::CatalogService;
pub use inventory::InventoryService;
pub use invoice::InvoicingService;
pub use notification::{Notification, NotificationClient};
pub use order::OrderService;
pub use user::UserService;
