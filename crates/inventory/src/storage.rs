//! Storage collaborator boundaries.
//!
//! The engine never speaks SQL. These traits are the narrow contract the
//! persistence layer implements; lookups with no matching rows return empty
//! values, not errors. Every call may block.

use stockyard_core::{ItemId, LocationId, StorageError, SupplierId};

use crate::details::Label;
use crate::item::RawItem;
use crate::location::LocationRow;
use crate::supplier::RawSupplier;

pub trait LocationReader: Send + Sync {
    fn fetch_location(&self, id: LocationId) -> Result<Option<LocationRow>, StorageError>;

    /// Direct children of a node, in storage order.
    fn fetch_children(&self, id: LocationId) -> Result<Vec<LocationRow>, StorageError>;

    /// Sum of quantities of the items assigned to the named bin.
    fn fetch_bin_stock(&self, bin_name: &str) -> Result<u64, StorageError>;

    /// Every `warehouse`-kind location.
    fn fetch_warehouses(&self) -> Result<Vec<LocationRow>, StorageError>;
}

pub trait ItemReader: Send + Sync {
    fn fetch_item(&self, id: ItemId) -> Result<Option<RawItem>, StorageError>;

    /// Every item, oldest first.
    fn list_items(&self) -> Result<Vec<RawItem>, StorageError>;

    fn fetch_item_labels(&self, id: ItemId) -> Result<Vec<Label>, StorageError>;
}

/// Write side for items; every call returns only once the write is confirmed.
pub trait ItemWriter: Send + Sync {
    /// Persist a new item and return the stored row.
    fn insert_item(&self, item: RawItem) -> Result<RawItem, StorageError>;

    /// Overwrite an item's quantity; `None` when the item does not exist.
    fn update_quantity(&self, id: ItemId, quantity: u64) -> Result<Option<RawItem>, StorageError>;

    fn insert_label(&self, id: ItemId, label_type: &str, value: &str) -> Result<(), StorageError>;
}

pub trait SupplierReader: Send + Sync {
    fn fetch_supplier(&self, id: SupplierId) -> Result<Option<RawSupplier>, StorageError>;

    /// Every supplier, oldest first.
    fn list_suppliers(&self) -> Result<Vec<RawSupplier>, StorageError>;
}

pub trait SupplierWriter: Send + Sync {
    /// Persist a new supplier and return the stored row.
    fn insert_supplier(&self, supplier: RawSupplier) -> Result<RawSupplier, StorageError>;
}
