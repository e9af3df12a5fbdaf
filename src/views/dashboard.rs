//! Home screen summary cards

use crate::entities::InventoryItem;
use crate::store::MirrorStore;
use crate::table::StockSummary;

/// Read-only summary over the mirrored inventory
#[derive(Clone)]
pub struct Dashboard {
    inventory: MirrorStore<InventoryItem>,
}

impl Dashboard {
    pub fn new(inventory: MirrorStore<InventoryItem>) -> Self {
        Self { inventory }
    }

    pub fn inventory_summary(&self) -> StockSummary {
        StockSummary::from_items(self.inventory.items().iter())
    }

    /// Text of the inventory card
    pub fn inventory_headline(&self) -> String {
        let below = self.inventory_summary().below_threshold;
        match below {
            1 => "You have 1 item below the threshold".to_string(),
            n => format!("You have {} items below the threshold", n),
        }
    }
}
