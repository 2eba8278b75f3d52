//! Infrastructure layer: configuration, storage wiring, and the warehouse
//! service the API layer calls into.

pub mod config;
pub mod reports;
pub mod service;
pub mod store;


pub use config::EngineConfig;
pub use reports::{InventorySummary, LowStockEntry, SupplierPerformance, WarehouseUtilization};
pub use service::{AlertView, StockMutation, WarehouseService};
pub use store::{InMemoryWarehouseStore, WarehouseStore};
