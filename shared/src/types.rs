//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// Policy controlling which inventory rows seed a new order.
///
/// The store historically ran both behaviors at different times, so the
/// choice is configuration rather than code.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ReplenishmentPolicy {
    /// Only products whose inventory is at or below its reorder level.
    #[default]
    RunningLowOnly,
    /// Every product with an inventory record, regardless of level.
    AllProducts,
}

impl ReplenishmentPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReplenishmentPolicy::RunningLowOnly => "running-low-only",
            ReplenishmentPolicy::AllProducts => "all-products",
        }
    }
}
