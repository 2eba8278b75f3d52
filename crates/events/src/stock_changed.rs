use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockyard_core::ItemId;

/// Something that happened to an entity, as broadcast on a feed.
///
/// Events are facts: immutable snapshots carrying a stable type name and a
/// schema version.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Dotted type name, e.g. `inventory.item.stock_changed`.
    fn event_type(&self) -> &'static str;

    fn version(&self) -> u32;

    /// Business time of the change.
    fn occurred_at(&self) -> DateTime<Utc>;
}

/// Stock health of an item at the moment of a single event.
///
/// Never stored: every evaluation recomputes it from the snapshot.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockLevel {
    Healthy,
    LowStock,
    OutOfStock,
}

impl StockLevel {
    pub fn classify(quantity: u64, threshold: u64) -> Self {
        if quantity == 0 {
            StockLevel::OutOfStock
        } else if quantity <= threshold {
            StockLevel::LowStock
        } else {
            StockLevel::Healthy
        }
    }
}

/// Event: the quantity of an item was written.
///
/// Carries the item's full post-update state relevant to alerting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockChanged {
    pub item_id: ItemId,
    pub sku: String,
    pub name: String,
    pub quantity: u64,
    pub threshold: u64,
    pub occurred_at: DateTime<Utc>,
}

impl StockChanged {
    pub fn level(&self) -> StockLevel {
        StockLevel::classify(self.quantity, self.threshold)
    }
}

impl Event for StockChanged {
    fn event_type(&self) -> &'static str {
        "inventory.item.stock_changed"
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}
