//! Inventory items

use serde::{Deserialize, Serialize};

use crate::core::entity::Resource;
use crate::table::classify::StockLevel;

/// One tracked inventory item, as served by `GET /api/inventory`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    #[serde(rename = "_id", default)]
    pub id: String,
    pub name: String,
    pub quantity: u32,
    pub threshold: u32,
}

impl InventoryItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, quantity: u32, threshold: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            quantity,
            threshold,
        }
    }
}

impl Resource for InventoryItem {
    fn collection_path() -> &'static str {
        "/api/inventory"
    }

    fn resource_name() -> &'static str {
        "inventory"
    }

    fn id(&self) -> Option<&str> {
        (!self.id.is_empty()).then_some(self.id.as_str())
    }
}

impl StockLevel for InventoryItem {
    fn quantity(&self) -> Option<f64> {
        Some(self.quantity as f64)
    }

    fn threshold(&self) -> Option<f64> {
        Some(self.threshold as f64)
    }
}

/// Body of `DELETE /api/inventory`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteByName {
    pub name: String,
}
