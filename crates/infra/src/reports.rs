//! Read-only reports over items, suppliers and alerts.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use stockyard_alerts::AlertSink;
use stockyard_core::{DomainError, DomainResult, Entity, ItemId, SupplierId};
use stockyard_inventory::{Item, Supplier, SupplierVariant, round_percent, utilization_percent};

use crate::service::{AlertView, WarehouseService};
use crate::store::WarehouseStore;

/// One row of the low-stock report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LowStockEntry {
    pub item_id: ItemId,
    pub sku: String,
    pub name: String,
    pub quantity: u64,
    pub threshold: u64,
    pub location: String,
    /// `threshold - quantity`.
    pub deficit: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseUtilization {
    pub total_capacity: u64,
    pub current_stock: u64,
    pub utilization_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary {
    pub total_items: usize,
    pub low_stock_items: usize,
    pub total_suppliers: usize,
    /// Unread alerts, newest first.
    pub recent_alerts: Vec<AlertView>,
    pub warehouse_utilization: WarehouseUtilization,
}

/// Items sourced per supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierPerformance {
    pub supplier_id: SupplierId,
    pub name: String,
    #[serde(rename = "type")]
    pub variant: SupplierVariant,
    pub item_count: usize,
}

fn checked_total(values: impl IntoIterator<Item = u64>, subject: &str) -> DomainResult<u64> {
    values
        .into_iter()
        .try_fold(0u64, u64::checked_add)
        .ok_or_else(|| DomainError::invariant(format!("{subject} overflows")))
}

impl<S, K> WarehouseService<S, K>
where
    S: WarehouseStore + ?Sized,
    K: AlertSink,
{
    /// Items at or below their threshold, largest deficit first.
    pub fn low_stock_report(&self) -> DomainResult<Vec<LowStockEntry>> {
        let mut entries: Vec<LowStockEntry> = self
            .store
            .list_items()?
            .into_iter()
            .map(Item::from_raw)
            .filter(|item| item.quantity() <= item.threshold())
            .map(|item| LowStockEntry {
                item_id: *item.id(),
                sku: item.sku().to_string(),
                name: item.name().to_string(),
                quantity: item.quantity(),
                threshold: item.threshold(),
                location: item.location().path(),
                deficit: item.threshold() - item.quantity(),
            })
            .collect();

        // Stable, so equal deficits keep storage order.
        entries.sort_by(|a, b| b.deficit.cmp(&a.deficit));
        Ok(entries)
    }

    /// Dashboard totals.
    ///
    /// Utilization is all item stock over the summed capacity of every
    /// warehouse; no warehouse capacity at all is a configuration error.
    pub fn inventory_summary(&self) -> DomainResult<InventorySummary> {
        let items: Vec<Item> = self
            .store
            .list_items()?
            .into_iter()
            .map(Item::from_raw)
            .collect();
        let total_suppliers = self.store.list_suppliers()?.len();

        let unread = self
            .store
            .list_alerts(usize::MAX)?
            .into_iter()
            .filter(|alert| !alert.is_read())
            .take(self.config.recent_alert_limit)
            .collect();
        let recent_alerts = self.alert_views(unread)?;

        let total_capacity = checked_total(
            self.store.fetch_warehouses()?.iter().map(|w| w.capacity),
            "total warehouse capacity",
        )?;
        let current_stock = checked_total(items.iter().map(Item::quantity), "total item stock")?;
        let percent = utilization_percent(current_stock, total_capacity, "warehouses")?;

        Ok(InventorySummary {
            total_items: items.len(),
            low_stock_items: items
                .iter()
                .filter(|item| item.quantity() <= item.threshold())
                .count(),
            total_suppliers,
            recent_alerts,
            warehouse_utilization: WarehouseUtilization {
                total_capacity,
                current_stock,
                utilization_percent: round_percent(percent),
            },
        })
    }

    /// Suppliers with the number of items sourced from each, most items
    /// first; ties keep storage order.
    pub fn supplier_performance_report(&self) -> DomainResult<Vec<SupplierPerformance>> {
        let mut counts: HashMap<SupplierId, usize> = HashMap::new();
        for item in self.store.list_items()? {
            if let Some(supplier) = item.supplier_id {
                *counts.entry(supplier).or_default() += 1;
            }
        }

        let mut entries: Vec<SupplierPerformance> = self
            .store
            .list_suppliers()?
            .into_iter()
            .map(Supplier::from_raw)
            .map(|supplier| SupplierPerformance {
                supplier_id: *supplier.id(),
                name: supplier.name().to_string(),
                variant: supplier.variant(),
                item_count: counts.get(supplier.id()).copied().unwrap_or(0),
            })
            .collect();

        entries.sort_by(|a, b| b.item_count.cmp(&a.item_count));
        Ok(entries)
    }
}
