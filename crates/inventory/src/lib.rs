//! Inventory domain: typed items, metadata layers, suppliers, and the location
//! tree with its stock aggregation.
//!
//! Deterministic domain logic only; storage is reached through the traits in
//! [`storage`].

pub mod aggregator;
pub mod details;
pub mod item;
pub mod location;
pub mod storage;
pub mod supplier;

pub use aggregator::{
    DEFAULT_MAX_DEPTH, LocationSummary, StockAggregator, round_percent, utilization_percent,
};
pub use details::{ItemDetails, Label, Layer, qr_code, with_labels, with_qr_identity};
pub use item::{
    DEFAULT_THRESHOLD, Item, ItemLocation, ItemType, ItemVariant, RawItem, resolve,
};
pub use location::{LocationKind, LocationNode, LocationRow};
pub use storage::{ItemReader, ItemWriter, LocationReader, SupplierReader, SupplierWriter};
pub use supplier::{ContactInfo, RawSupplier, Supplier, SupplierVariant, resolve_supplier};
