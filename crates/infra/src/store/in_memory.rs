use std::collections::HashMap;
use std::sync::RwLock;

use stockyard_alerts::{AlertRecord, AlertSink, AlertStore};
use stockyard_core::{AlertId, Entity, ItemId, LocationId, StorageError, SupplierId};
use stockyard_inventory::{
    ItemReader, ItemWriter, Label, LocationKind, LocationReader, LocationRow, RawItem,
    RawSupplier, SupplierReader, SupplierWriter,
};

#[derive(Debug, Clone)]
struct LocationEntry {
    parent: Option<LocationId>,
    row: LocationRow,
}

/// In-memory warehouse store.
///
/// Intended for tests/dev. Rows keep insertion order, which is the order
/// children and items are returned in.
#[derive(Debug, Default)]
pub struct InMemoryWarehouseStore {
    locations: RwLock<Vec<LocationEntry>>,
    items: RwLock<Vec<RawItem>>,
    labels: RwLock<HashMap<ItemId, Vec<Label>>>,
    alerts: RwLock<Vec<AlertRecord>>,
    suppliers: RwLock<Vec<RawSupplier>>,
}

fn poisoned() -> StorageError {
    StorageError::unavailable("lock poisoned")
}

impl InMemoryWarehouseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a location under `parent` (or as a root). Bins cannot hold children.
    pub fn add_location(
        &self,
        parent: Option<LocationId>,
        row: LocationRow,
    ) -> Result<LocationId, StorageError> {
        let mut locations = self.locations.write().map_err(|_| poisoned())?;

        if locations.iter().any(|e| e.row.id == row.id) {
            return Err(StorageError::rejected(format!(
                "location {} already exists",
                row.id
            )));
        }

        if let Some(parent_id) = parent {
            match locations.iter().find(|e| e.row.id == parent_id) {
                None => {
                    return Err(StorageError::rejected(format!(
                        "parent location {parent_id} does not exist"
                    )));
                }
                Some(entry) if entry.row.kind.is_leaf() => {
                    return Err(StorageError::rejected(format!(
                        "bin '{}' cannot hold child locations",
                        entry.row.name
                    )));
                }
                Some(_) => {}
            }
        }

        let id = row.id;
        locations.push(LocationEntry { parent, row });
        Ok(id)
    }

    pub fn alert_count(&self) -> usize {
        self.alerts.read().map(|a| a.len()).unwrap_or(0)
    }
}

impl LocationReader for InMemoryWarehouseStore {
    fn fetch_location(&self, id: LocationId) -> Result<Option<LocationRow>, StorageError> {
        let locations = self.locations.read().map_err(|_| poisoned())?;
        Ok(locations
            .iter()
            .find(|e| e.row.id == id)
            .map(|e| e.row.clone()))
    }

    fn fetch_children(&self, id: LocationId) -> Result<Vec<LocationRow>, StorageError> {
        let locations = self.locations.read().map_err(|_| poisoned())?;
        Ok(locations
            .iter()
            .filter(|e| e.parent == Some(id))
            .map(|e| e.row.clone())
            .collect())
    }

    fn fetch_bin_stock(&self, bin_name: &str) -> Result<u64, StorageError> {
        let items = self.items.read().map_err(|_| poisoned())?;
        items
            .iter()
            .filter(|item| item.bin.as_deref() == Some(bin_name))
            .map(|item| item.quantity.unwrap_or(0))
            .try_fold(0u64, u64::checked_add)
            .ok_or_else(|| StorageError::rejected(format!("stock of bin '{bin_name}' overflows")))
    }

    fn fetch_warehouses(&self) -> Result<Vec<LocationRow>, StorageError> {
        let locations = self.locations.read().map_err(|_| poisoned())?;
        Ok(locations
            .iter()
            .filter(|e| e.row.kind == LocationKind::Warehouse)
            .map(|e| e.row.clone())
            .collect())
    }
}

impl ItemReader for InMemoryWarehouseStore {
    fn fetch_item(&self, id: ItemId) -> Result<Option<RawItem>, StorageError> {
        let items = self.items.read().map_err(|_| poisoned())?;
        Ok(items.iter().find(|i| i.id == id).cloned())
    }

    fn list_items(&self) -> Result<Vec<RawItem>, StorageError> {
        let items = self.items.read().map_err(|_| poisoned())?;
        Ok(items.clone())
    }

    fn fetch_item_labels(&self, id: ItemId) -> Result<Vec<Label>, StorageError> {
        let labels = self.labels.read().map_err(|_| poisoned())?;
        Ok(labels.get(&id).cloned().unwrap_or_default())
    }
}

impl ItemWriter for InMemoryWarehouseStore {
    fn insert_item(&self, item: RawItem) -> Result<RawItem, StorageError> {
        let mut items = self.items.write().map_err(|_| poisoned())?;

        if items.iter().any(|i| i.id == item.id) {
            return Err(StorageError::rejected(format!("item {} already exists", item.id)));
        }
        if items.iter().any(|i| i.sku == item.sku) {
            return Err(StorageError::rejected(format!(
                "sku '{}' already exists",
                item.sku
            )));
        }

        items.push(item.clone());
        Ok(item)
    }

    fn update_quantity(&self, id: ItemId, quantity: u64) -> Result<Option<RawItem>, StorageError> {
        let mut items = self.items.write().map_err(|_| poisoned())?;
        Ok(items.iter_mut().find(|i| i.id == id).map(|item| {
            item.quantity = Some(quantity);
            item.clone()
        }))
    }

    fn insert_label(&self, id: ItemId, label_type: &str, value: &str) -> Result<(), StorageError> {
        let known = {
            let items = self.items.read().map_err(|_| poisoned())?;
            items.iter().any(|i| i.id == id)
        };
        if !known {
            return Err(StorageError::rejected(format!("item {id} does not exist")));
        }

        let mut labels = self.labels.write().map_err(|_| poisoned())?;
        labels
            .entry(id)
            .or_default()
            .push(Label::new(label_type, value));
        Ok(())
    }
}

impl SupplierReader for InMemoryWarehouseStore {
    fn fetch_supplier(&self, id: SupplierId) -> Result<Option<RawSupplier>, StorageError> {
        let suppliers = self.suppliers.read().map_err(|_| poisoned())?;
        Ok(suppliers.iter().find(|s| s.id == id).cloned())
    }

    fn list_suppliers(&self) -> Result<Vec<RawSupplier>, StorageError> {
        let suppliers = self.suppliers.read().map_err(|_| poisoned())?;
        Ok(suppliers.clone())
    }
}

impl SupplierWriter for InMemoryWarehouseStore {
    fn insert_supplier(&self, supplier: RawSupplier) -> Result<RawSupplier, StorageError> {
        let mut suppliers = self.suppliers.write().map_err(|_| poisoned())?;
        if suppliers.iter().any(|s| s.id == supplier.id) {
            return Err(StorageError::rejected(format!(
                "supplier {} already exists",
                supplier.id
            )));
        }
        suppliers.push(supplier.clone());
        Ok(supplier)
    }
}

impl AlertSink for InMemoryWarehouseStore {
    fn insert_alert(&self, record: &AlertRecord) -> Result<(), StorageError> {
        let mut alerts = self.alerts.write().map_err(|_| poisoned())?;
        alerts.push(record.clone());
        Ok(())
    }
}

impl AlertStore for InMemoryWarehouseStore {
    fn list_alerts(&self, limit: usize) -> Result<Vec<AlertRecord>, StorageError> {
        let alerts = self.alerts.read().map_err(|_| poisoned())?;

        // Newest first; ties keep the later insert ahead.
        let mut newest: Vec<AlertRecord> = alerts.iter().rev().cloned().collect();
        newest.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        newest.truncate(limit);
        Ok(newest)
    }

    fn mark_alert_read(&self, id: AlertId) -> Result<Option<AlertRecord>, StorageError> {
        let mut alerts = self.alerts.write().map_err(|_| poisoned())?;
        Ok(alerts.iter_mut().find(|a| *a.id() == id).map(|alert| {
            alert.mark_read();
            alert.clone()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{Duration, Utc};
    use stockyard_alerts::AlertType;

    fn test_item(sku: &str, bin: &str, quantity: u64) -> RawItem {
        RawItem {
            id: ItemId::new(),
            sku: sku.to_string(),
            name: format!("{sku} item"),
            bin: Some(bin.to_string()),
            quantity: Some(quantity),
            ..Default::default()
        }
    }

    #[test]
    fn children_come_back_in_insertion_order() {
        let store = InMemoryWarehouseStore::new();
        let wh = store
            .add_location(None, LocationRow::new("WH", LocationKind::Warehouse, 100))
            .unwrap();
        let z2 = store
            .add_location(Some(wh), LocationRow::new("Z2", LocationKind::Zone, 0))
            .unwrap();
        let z1 = store
            .add_location(Some(wh), LocationRow::new("Z1", LocationKind::Zone, 0))
            .unwrap();

        let ids: Vec<_> = store
            .fetch_children(wh)
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![z2, z1]);
        assert!(store.fetch_children(z1).unwrap().is_empty());
        assert_eq!(store.fetch_warehouses().unwrap().len(), 1);
    }

    #[test]
    fn rejects_orphans_and_children_under_bins() {
        let store = InMemoryWarehouseStore::new();
        let orphan = store.add_location(
            Some(LocationId::new()),
            LocationRow::new("Z", LocationKind::Zone, 0),
        );
        assert!(matches!(orphan, Err(StorageError::Rejected(_))));

        let bin = store
            .add_location(None, LocationRow::new("B1", LocationKind::Bin, 10))
            .unwrap();
        let under_bin = store.add_location(Some(bin), LocationRow::new("X", LocationKind::Bin, 1));
        assert!(matches!(under_bin, Err(StorageError::Rejected(_))));
    }

    #[test]
    fn bin_stock_sums_items_by_bin_name() {
        let store = InMemoryWarehouseStore::new();
        store.insert_item(test_item("A", "B1", 10)).unwrap();
        store.insert_item(test_item("B", "B1", 5)).unwrap();
        store.insert_item(test_item("C", "B2", 7)).unwrap();
        store
            .insert_item(RawItem {
                quantity: None,
                ..test_item("D", "B1", 0)
            })
            .unwrap();

        assert_eq!(store.fetch_bin_stock("B1").unwrap(), 15);
        assert_eq!(store.fetch_bin_stock("B2").unwrap(), 7);
        assert_eq!(store.fetch_bin_stock("empty").unwrap(), 0);
    }

    #[test]
    fn overflowing_bin_stock_is_rejected() {
        let store = InMemoryWarehouseStore::new();
        store.insert_item(test_item("A", "B1", u64::MAX)).unwrap();
        store.insert_item(test_item("B", "B1", 1)).unwrap();

        assert!(matches!(
            store.fetch_bin_stock("B1"),
            Err(StorageError::Rejected(_))
        ));
    }

    #[test]
    fn suppliers_keep_insertion_order_and_reject_duplicates() {
        let store = InMemoryWarehouseStore::new();
        let first = store
            .insert_supplier(RawSupplier {
                id: SupplierId::new(),
                name: "Acme".into(),
                ..Default::default()
            })
            .unwrap();
        store
            .insert_supplier(RawSupplier {
                id: SupplierId::new(),
                name: "Bolt & Co".into(),
                ..Default::default()
            })
            .unwrap();

        let err = store.insert_supplier(first.clone()).unwrap_err();
        assert!(matches!(err, StorageError::Rejected(_)));

        let names: Vec<String> = store
            .list_suppliers()
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Acme", "Bolt & Co"]);
        assert_eq!(store.fetch_supplier(first.id).unwrap(), Some(first));
    }

    #[test]
    fn duplicate_sku_is_rejected() {
        let store = InMemoryWarehouseStore::new();
        store.insert_item(test_item("A", "B1", 1)).unwrap();
        let err = store.insert_item(test_item("A", "B2", 2)).unwrap_err();
        assert!(matches!(err, StorageError::Rejected(_)));
        assert_eq!(store.list_items().unwrap().len(), 1);
    }

    #[test]
    fn update_quantity_of_missing_item_is_none() {
        let store = InMemoryWarehouseStore::new();
        assert_eq!(store.update_quantity(ItemId::new(), 3).unwrap(), None);

        let item = store.insert_item(test_item("A", "B1", 1)).unwrap();
        let updated = store.update_quantity(item.id, 9).unwrap().unwrap();
        assert_eq!(updated.quantity, Some(9));
        assert_eq!(store.fetch_item(item.id).unwrap().unwrap().quantity, Some(9));
    }

    #[test]
    fn labels_require_an_existing_item() {
        let store = InMemoryWarehouseStore::new();
        assert!(store.insert_label(ItemId::new(), "fragile", "yes").is_err());

        let item = store.insert_item(test_item("A", "B1", 1)).unwrap();
        store.insert_label(item.id, "fragile", "yes").unwrap();
        store.insert_label(item.id, "hazard", "none").unwrap();

        let labels = store.fetch_item_labels(item.id).unwrap();
        assert_eq!(labels, vec![Label::new("fragile", "yes"), Label::new("hazard", "none")]);
    }

    #[test]
    fn alerts_list_newest_first_with_limit() {
        let store = InMemoryWarehouseStore::new();
        let item = ItemId::new();
        let now = Utc::now();
        let old = AlertRecord::new(item, AlertType::LowStock, "old", now - Duration::minutes(5));
        let new = AlertRecord::new(item, AlertType::OutOfStock, "new", now);
        store.insert_alert(&new).unwrap();
        store.insert_alert(&old).unwrap();

        let listed = store.list_alerts(10).unwrap();
        assert_eq!(listed[0].message(), "new");
        assert_eq!(listed[1].message(), "old");
        assert_eq!(store.list_alerts(1).unwrap().len(), 1);
    }

    #[test]
    fn mark_read_persists_the_flag() {
        let store = InMemoryWarehouseStore::new();
        let alert = AlertRecord::new(ItemId::new(), AlertType::LowStock, "m", Utc::now());
        store.insert_alert(&alert).unwrap();

        let marked = store.mark_alert_read(*alert.id()).unwrap().unwrap();
        assert!(marked.is_read());
        assert!(store.list_alerts(1).unwrap()[0].is_read());
        assert_eq!(store.mark_alert_read(AlertId::new()).unwrap(), None);
    }
}
