//! API user accounts

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An account that may hold API tokens
///
/// The password hash never leaves the backend; this is the representation
/// returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub name: Option<String>,
    pub email: String,
    pub role: String,
    pub active: bool,
}
