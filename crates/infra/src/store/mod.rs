//! Storage collaborator wiring.
//!
//! The engine crates only see the narrow reader/writer traits; this module
//! bundles them for the service layer and ships an in-memory implementation
//! for tests and local runs.

pub mod in_memory;

pub use in_memory::InMemoryWarehouseStore;

use stockyard_alerts::AlertStore;
use stockyard_inventory::{
    ItemReader, ItemWriter, LocationReader, SupplierReader, SupplierWriter,
};

/// Everything the warehouse service needs from persistence.
pub trait WarehouseStore:
    LocationReader + ItemReader + ItemWriter + SupplierReader + SupplierWriter + AlertStore
{
}

impl<T> WarehouseStore for T where
    T: LocationReader
        + ItemReader
        + ItemWriter
        + SupplierReader
        + SupplierWriter
        + AlertStore
        + ?Sized
{
}
