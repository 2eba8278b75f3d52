use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use stockyard_core::{Entity, ItemId, SupplierId};
use stockyard_events::StockChanged;

use crate::details::ItemDetails;

/// Threshold applied when a raw row does not carry one.
pub const DEFAULT_THRESHOLD: u64 = 10;
pub const DEFAULT_WARRANTY: &str = "1 year";
pub const DEFAULT_UNIT_SIZE: &str = "kg";

/// Item row as supplied by the storage collaborator (untyped).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawItem {
    pub id: ItemId,
    pub sku: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub item_type: String,
    #[serde(default)]
    pub quantity: Option<u64>,
    #[serde(default)]
    pub threshold: Option<u64>,
    #[serde(default)]
    pub zone: Option<String>,
    #[serde(default)]
    pub rack: Option<String>,
    #[serde(default)]
    pub bin: Option<String>,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default)]
    pub warranty: Option<String>,
    #[serde(default)]
    pub unit_size: Option<String>,
    /// Supplier the item is sourced from, if recorded.
    #[serde(default)]
    pub supplier_id: Option<SupplierId>,
}

/// The closed set of item kinds.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Base,
    Perishable,
    Electronic,
    Bulk,
}

impl ItemType {
    /// Case-insensitive tag lookup. Unrecognized tags resolve to `Base`, never an error.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "perishable" => ItemType::Perishable,
            "electronic" => ItemType::Electronic,
            "bulk" => ItemType::Bulk,
            _ => ItemType::Base,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Base => "base",
            ItemType::Perishable => "perishable",
            ItemType::Electronic => "electronic",
            ItemType::Bulk => "bulk",
        }
    }
}

/// Variant-specific data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemVariant {
    Base,
    Perishable { expiry_date: Option<NaiveDate> },
    Electronic { warranty: String },
    Bulk { unit_size: String },
}

impl ItemVariant {
    pub fn item_type(&self) -> ItemType {
        match self {
            ItemVariant::Base => ItemType::Base,
            ItemVariant::Perishable { .. } => ItemType::Perishable,
            ItemVariant::Electronic { .. } => ItemType::Electronic,
            ItemVariant::Bulk { .. } => ItemType::Bulk,
        }
    }
}

/// Path of an item into the location tree (by name, not by reference).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ItemLocation {
    pub zone: Option<String>,
    pub rack: Option<String>,
    pub bin: Option<String>,
}

impl ItemLocation {
    /// `zone-rack-bin`, skipping unassigned segments.
    pub fn path(&self) -> String {
        [&self.zone, &self.rack, &self.bin]
            .into_iter()
            .filter_map(|s| s.as_deref())
            .collect::<Vec<_>>()
            .join("-")
    }
}

/// Typed inventory item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    id: ItemId,
    sku: String,
    name: String,
    quantity: u64,
    threshold: u64,
    location: ItemLocation,
    variant: ItemVariant,
}

/// Build a typed item from a raw row, dispatching on `type_tag`.
pub fn resolve(type_tag: &str, raw: RawItem) -> Item {
    let variant = match ItemType::from_tag(type_tag) {
        ItemType::Base => ItemVariant::Base,
        ItemType::Perishable => ItemVariant::Perishable {
            expiry_date: raw.expiry_date,
        },
        ItemType::Electronic => ItemVariant::Electronic {
            warranty: raw.warranty.unwrap_or_else(|| DEFAULT_WARRANTY.to_string()),
        },
        ItemType::Bulk => ItemVariant::Bulk {
            unit_size: raw.unit_size.unwrap_or_else(|| DEFAULT_UNIT_SIZE.to_string()),
        },
    };

    Item {
        id: raw.id,
        sku: raw.sku,
        name: raw.name,
        quantity: raw.quantity.unwrap_or(0),
        threshold: raw.threshold.unwrap_or(DEFAULT_THRESHOLD),
        location: ItemLocation {
            zone: raw.zone,
            rack: raw.rack,
            bin: raw.bin,
        },
        variant,
    }
}

impl Item {
    /// Resolve a raw row using its own `type` column.
    pub fn from_raw(raw: RawItem) -> Self {
        let tag = raw.item_type.clone();
        resolve(&tag, raw)
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    pub fn location(&self) -> &ItemLocation {
        &self.location
    }

    pub fn variant(&self) -> &ItemVariant {
        &self.variant
    }

    pub fn item_type(&self) -> ItemType {
        self.variant.item_type()
    }

    /// Base projection extended with the variant's own keys.
    ///
    /// `type` carries the canonical tag of the resolved variant rather than the
    /// stored row tag, so `"Electronic"` reads `electronic` and an unrecognized
    /// tag reads `base`. Clients can rely on `type` naming the key set present.
    pub fn details(&self) -> ItemDetails {
        let mut details = ItemDetails::new();
        details.insert("id", self.id.to_string());
        details.insert("sku", self.sku.clone());
        details.insert("name", self.name.clone());
        details.insert("type", self.item_type().as_str());
        details.insert("quantity", self.quantity);
        details.insert("threshold", self.threshold);
        details.insert("location", self.location.path());

        match &self.variant {
            ItemVariant::Base => {}
            ItemVariant::Perishable { expiry_date } => {
                let expiry = expiry_date
                    .map(|d| JsonValue::String(d.format("%Y-%m-%d").to_string()))
                    .unwrap_or(JsonValue::Null);
                details.insert("expiryDate", expiry);
                details.insert("perishable", true);
            }
            ItemVariant::Electronic { warranty } => {
                details.insert("warranty", warranty.clone());
                details.insert("category", "electronics");
            }
            ItemVariant::Bulk { unit_size } => {
                details.insert("unitSize", unit_size.clone());
                details.insert("isBulk", true);
            }
        }

        details
    }

    /// Snapshot of this item's post-update state for the alert dispatcher.
    pub fn stock_changed(&self, occurred_at: DateTime<Utc>) -> StockChanged {
        StockChanged {
            item_id: self.id,
            sku: self.sku.clone(),
            name: self.name.clone(),
            quantity: self.quantity,
            threshold: self.threshold,
            occurred_at,
        }
    }
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(item_type: &str) -> RawItem {
        RawItem {
            sku: "SKU-1".to_string(),
            name: "Widget".to_string(),
            item_type: item_type.to_string(),
            quantity: Some(25),
            threshold: Some(5),
            zone: Some("A".to_string()),
            rack: Some("A1".to_string()),
            bin: Some("A1-1".to_string()),
            ..RawItem::default()
        }
    }

    #[test]
    fn tags_are_case_insensitive() {
        assert_eq!(ItemType::from_tag("PERISHABLE"), ItemType::Perishable);
        assert_eq!(ItemType::from_tag("Electronic"), ItemType::Electronic);
        assert_eq!(ItemType::from_tag(" bulk "), ItemType::Bulk);
    }

    #[test]
    fn resolution_keeps_row_identity() {
        let row = raw("bulk");
        let id = row.id;
        let item = Item::from_raw(row);
        assert_eq!(*item.id(), id);
        assert_eq!(item.item_type(), ItemType::Bulk);
    }

    #[test]
    fn unknown_tag_falls_back_to_base() {
        let item = resolve("furniture", raw("furniture"));
        assert_eq!(item.variant(), &ItemVariant::Base);
        assert_eq!(item.details().get("type"), Some(&JsonValue::from("base")));
    }

    #[test]
    fn missing_quantity_and_threshold_take_defaults() {
        let item = resolve(
            "base",
            RawItem {
                quantity: None,
                threshold: None,
                ..raw("base")
            },
        );
        assert_eq!(item.quantity(), 0);
        assert_eq!(item.threshold(), DEFAULT_THRESHOLD);
    }

    #[test]
    fn base_projection_has_location_path() {
        let details = resolve("base", raw("base")).details();
        assert_eq!(details.get("location"), Some(&JsonValue::from("A-A1-A1-1")));
        assert_eq!(details.get("quantity"), Some(&JsonValue::from(25u64)));
        assert_eq!(details.iter().count(), 7);
    }

    #[test]
    fn perishable_projection_adds_expiry() {
        let expiry = NaiveDate::from_ymd_opt(2026, 12, 31).unwrap();
        let item = resolve(
            "perishable",
            RawItem {
                expiry_date: Some(expiry),
                ..raw("perishable")
            },
        );
        let details = item.details();
        assert_eq!(details.get("expiryDate"), Some(&JsonValue::from("2026-12-31")));
        assert_eq!(details.get("perishable"), Some(&JsonValue::Bool(true)));
    }

    #[test]
    fn electronic_and_bulk_use_defaults() {
        let electronic = resolve("electronic", raw("electronic")).details();
        assert_eq!(electronic.get("warranty"), Some(&JsonValue::from("1 year")));
        assert_eq!(electronic.get("category"), Some(&JsonValue::from("electronics")));

        let bulk = resolve("bulk", raw("bulk")).details();
        assert_eq!(bulk.get("unitSize"), Some(&JsonValue::from("kg")));
        assert_eq!(bulk.get("isBulk"), Some(&JsonValue::Bool(true)));
    }

    #[test]
    fn variant_projection_extends_base_projection() {
        let base = resolve("base", raw("bulk")).details();
        let bulk = resolve("bulk", raw("bulk")).details();
        for (key, value) in base.iter() {
            if key == "type" {
                continue;
            }
            assert_eq!(bulk.get(key), Some(value), "key {key} changed");
        }
    }

    #[test]
    fn stock_changed_snapshots_current_quantity() {
        let item = resolve(
            "base",
            RawItem {
                quantity: Some(0),
                ..raw("base")
            },
        );
        let event = item.stock_changed(Utc::now());
        assert_eq!(event.item_id, *item.id());
        assert_eq!(event.quantity, 0);
        assert_eq!(event.threshold, 5);
    }
}
