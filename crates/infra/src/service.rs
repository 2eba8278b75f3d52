//! Warehouse service: the entry points the HTTP layer calls.
//!
//! ```text
//! read side                           write side
//! ---------                           ----------
//! get_location_summary                create_item / update_stock
//!   ↓ StockAggregator                   ↓ ItemWriter (confirmed)
//! LocationSummary                     on_stock_mutated
//!                                       ↓ NotificationDispatcher
//! get_item_details                    DispatchReport
//! list_item_details
//!   ↓ Item + label/QR layers          create_supplier
//! ItemDetails                           ↓ SupplierWriter
//!                                     ContactInfo
//! ```
//!
//! Every call stands alone: location trees are rebuilt per request and the
//! dispatcher is shared read-only, so the service can be cloned into any
//! number of request handlers.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use stockyard_alerts::{
    AlertRecord, AlertSink, DashboardNotifier, DispatchReport, LowStockEvaluator, NotificationDispatcher,
    OutOfStockEvaluator,
};
use stockyard_core::{AlertId, DomainError, DomainResult, Entity, ItemId, LocationId, SupplierId};
use stockyard_events::{InMemoryFeed, StockChanged};
use stockyard_inventory::{
    ContactInfo, Item, ItemDetails, LocationSummary, RawItem, RawSupplier, StockAggregator,
    Supplier, with_labels, with_qr_identity,
};

use crate::config::EngineConfig;
use crate::store::WarehouseStore;

/// Alert listing row: the stored record joined with its item's identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertView {
    #[serde(flatten)]
    pub alert: AlertRecord,
    /// `None` when the item has since disappeared from storage.
    pub item_name: Option<String>,
    pub sku: Option<String>,
}

/// Outcome of a stock write: the item as persisted plus what the alert
/// pipeline did with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockMutation {
    pub item: Item,
    pub report: DispatchReport,
}

pub struct WarehouseService<S: ?Sized, K = Arc<S>> {
    pub(crate) store: Arc<S>,
    dispatcher: Arc<NotificationDispatcher<K>>,
    pub(crate) config: EngineConfig,
}

impl<S: ?Sized, K> Clone for WarehouseService<S, K> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            dispatcher: Arc::clone(&self.dispatcher),
            config: self.config.clone(),
        }
    }
}

impl<S: ?Sized, K> core::fmt::Debug for WarehouseService<S, K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WarehouseService")
            .field("dispatcher", &self.dispatcher)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<S> WarehouseService<S, Arc<S>>
where
    S: WarehouseStore + 'static,
{
    /// Standard alert rules persisting into `store`; the dashboard notifier
    /// publishes onto `feed` when one is given.
    pub fn with_standard_alerts(
        store: Arc<S>,
        feed: Option<Arc<InMemoryFeed<StockChanged>>>,
        config: EngineConfig,
    ) -> Self {
        let sink = Arc::clone(&store);
        let dispatcher = match feed {
            Some(feed) => NotificationDispatcher::new(sink)
                .with_evaluator(LowStockEvaluator)
                .with_evaluator(OutOfStockEvaluator)
                .with_evaluator(DashboardNotifier::with_feed(feed)),
            None => NotificationDispatcher::with_standard_evaluators(sink),
        };
        Self::new(store, Arc::new(dispatcher), config)
    }
}

impl<S, K> WarehouseService<S, K>
where
    S: WarehouseStore + ?Sized,
    K: AlertSink,
{
    pub fn new(store: Arc<S>, dispatcher: Arc<NotificationDispatcher<K>>, config: EngineConfig) -> Self {
        Self {
            store,
            dispatcher,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> &NotificationDispatcher<K> {
        &self.dispatcher
    }

    /// Total stock, capacity and utilization of the subtree rooted at `location_id`.
    pub fn get_location_summary(&self, location_id: LocationId) -> DomainResult<LocationSummary> {
        StockAggregator::new(&*self.store)
            .with_max_depth(self.config.max_depth)
            .summary(location_id)
    }

    /// Typed projection of an item with its labels and QR identity layered on.
    pub fn get_item_details(&self, item_id: ItemId) -> DomainResult<ItemDetails> {
        let item = self.load_item(item_id)?;
        self.decorate(&item)
    }

    /// Every item as its decorated projection, newest first.
    pub fn list_item_details(&self) -> DomainResult<Vec<ItemDetails>> {
        self.store
            .list_items()?
            .into_iter()
            .rev()
            .map(|raw| self.decorate(&Item::from_raw(raw)))
            .collect()
    }

    /// Persist a new item, then run the alert pipeline on its initial stock.
    pub fn create_item(&self, raw: RawItem) -> DomainResult<StockMutation> {
        if raw.sku.trim().is_empty() {
            return Err(DomainError::validation("sku must not be empty"));
        }
        if raw.name.trim().is_empty() {
            return Err(DomainError::validation("name must not be empty"));
        }

        let stored = self.store.insert_item(raw)?;
        let item = Item::from_raw(stored);
        info!(item = %item.id(), sku = item.sku(), quantity = item.quantity(), "item created");

        let report = self.on_stock_mutated(&item);
        Ok(StockMutation { item, report })
    }

    /// Overwrite an item's quantity, then run the alert pipeline.
    ///
    /// Alerts are evaluated only after the write is confirmed.
    pub fn update_stock(&self, item_id: ItemId, quantity: u64) -> DomainResult<StockMutation> {
        let stored = self
            .store
            .update_quantity(item_id, quantity)?
            .ok_or_else(|| DomainError::not_found(format!("item {item_id}")))?;
        let item = Item::from_raw(stored);
        info!(item = %item_id, quantity, "stock updated");

        let report = self.on_stock_mutated(&item);
        Ok(StockMutation { item, report })
    }

    /// Run every registered alert rule against the item's current stock.
    pub fn on_stock_mutated(&self, item: &Item) -> DispatchReport {
        self.dispatcher.dispatch(&item.stock_changed(Utc::now()))
    }

    pub fn add_label(&self, item_id: ItemId, label_type: &str, value: &str) -> DomainResult<()> {
        if label_type.trim().is_empty() {
            return Err(DomainError::validation("label type must not be empty"));
        }
        // NotFound, not a storage rejection, for unknown items.
        self.load_item(item_id)?;
        self.store.insert_label(item_id, label_type, value)?;
        debug!(item = %item_id, label_type, "label added");
        Ok(())
    }

    /// Most recent alerts, newest first.
    pub fn list_alerts(&self) -> DomainResult<Vec<AlertView>> {
        let alerts = self.store.list_alerts(self.config.alert_list_limit)?;
        self.alert_views(alerts)
    }

    /// Join alert records with the name and SKU of their items.
    pub(crate) fn alert_views(&self, alerts: Vec<AlertRecord>) -> DomainResult<Vec<AlertView>> {
        let items: HashMap<ItemId, RawItem> = self
            .store
            .list_items()?
            .into_iter()
            .map(|item| (item.id, item))
            .collect();

        Ok(alerts
            .into_iter()
            .map(|alert| {
                let item = items.get(&alert.item_id());
                AlertView {
                    item_name: item.map(|i| i.name.clone()),
                    sku: item.map(|i| i.sku.clone()),
                    alert,
                }
            })
            .collect())
    }

    pub fn mark_alert_read(&self, alert_id: AlertId) -> DomainResult<AlertRecord> {
        self.store
            .mark_alert_read(alert_id)?
            .ok_or_else(|| DomainError::not_found(format!("alert {alert_id}")))
    }

    pub fn get_supplier_contact(&self, supplier_id: SupplierId) -> DomainResult<ContactInfo> {
        let raw = self
            .store
            .fetch_supplier(supplier_id)?
            .ok_or_else(|| DomainError::not_found(format!("supplier {supplier_id}")))?;
        Ok(Supplier::from_raw(raw).contact_info())
    }

    /// Contact projections of every supplier, newest first.
    pub fn list_suppliers(&self) -> DomainResult<Vec<ContactInfo>> {
        Ok(self
            .store
            .list_suppliers()?
            .into_iter()
            .rev()
            .map(|raw| Supplier::from_raw(raw).contact_info())
            .collect())
    }

    pub fn create_supplier(&self, raw: RawSupplier) -> DomainResult<ContactInfo> {
        if raw.name.trim().is_empty() {
            return Err(DomainError::validation("supplier name must not be empty"));
        }

        let supplier = Supplier::from_raw(self.store.insert_supplier(raw)?);
        info!(
            supplier = %supplier.id(),
            name = supplier.name(),
            variant = ?supplier.variant(),
            "supplier created"
        );
        Ok(supplier.contact_info())
    }

    fn decorate(&self, item: &Item) -> DomainResult<ItemDetails> {
        let labels = self.store.fetch_item_labels(*item.id())?;
        Ok(with_qr_identity(with_labels(item.details(), &labels), item))
    }

    fn load_item(&self, item_id: ItemId) -> DomainResult<Item> {
        self.store
            .fetch_item(item_id)?
            .map(Item::from_raw)
            .ok_or_else(|| DomainError::not_found(format!("item {item_id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;
    use stockyard_alerts::AlertType;
    use stockyard_inventory::{LocationKind, LocationRow, SupplierReader, SupplierWriter};

    use crate::store::InMemoryWarehouseStore;

    fn test_service() -> (WarehouseService<InMemoryWarehouseStore>, Arc<InMemoryWarehouseStore>) {
        let store = Arc::new(InMemoryWarehouseStore::new());
        let service =
            WarehouseService::with_standard_alerts(Arc::clone(&store), None, EngineConfig::default());
        (service, store)
    }

    fn test_raw(sku: &str, quantity: u64) -> RawItem {
        RawItem {
            id: ItemId::new(),
            sku: sku.to_string(),
            name: format!("{sku} widget"),
            quantity: Some(quantity),
            ..Default::default()
        }
    }

    #[test]
    fn create_item_with_low_initial_stock_raises_alert() {
        let (service, store) = test_service();

        let created = service.create_item(test_raw("W-1", 4)).unwrap();
        assert_eq!(created.item.threshold(), 10);
        assert_eq!(created.report.alert_count(), 1);
        assert_eq!(created.report.alerts[0].alert_type(), AlertType::LowStock);
        assert_eq!(store.alert_count(), 1);
    }

    #[test]
    fn create_item_requires_sku_and_name() {
        let (service, _) = test_service();

        let err = service.create_item(test_raw("  ", 1)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let mut nameless = test_raw("W-2", 1);
        nameless.name.clear();
        assert!(matches!(
            service.create_item(nameless).unwrap_err(),
            DomainError::Validation(_)
        ));
    }

    #[test]
    fn duplicate_sku_surfaces_as_dependency_error() {
        let (service, _) = test_service();
        service.create_item(test_raw("W-1", 50)).unwrap();

        let err = service.create_item(test_raw("W-1", 50)).unwrap_err();
        assert!(matches!(err, DomainError::Dependency(_)));
    }

    #[test]
    fn update_stock_of_unknown_item_is_not_found() {
        let (service, store) = test_service();

        let err = service.update_stock(ItemId::new(), 0).unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
        assert_eq!(store.alert_count(), 0);
    }

    #[test]
    fn update_stock_to_zero_raises_out_of_stock_only() {
        let (service, _) = test_service();
        let created = service.create_item(test_raw("W-1", 50)).unwrap();
        assert_eq!(created.report.alert_count(), 0);

        let updated = service.update_stock(*created.item.id(), 0).unwrap();
        assert_eq!(updated.item.quantity(), 0);
        assert_eq!(updated.report.alert_count(), 1);
        assert_eq!(updated.report.alerts[0].alert_type(), AlertType::OutOfStock);
        assert!(updated.report.is_complete());
    }

    #[test]
    fn item_details_missing_item_is_not_found() {
        let (service, _) = test_service();
        assert!(matches!(
            service.get_item_details(ItemId::new()).unwrap_err(),
            DomainError::NotFound(_)
        ));
    }

    #[test]
    fn add_label_validates_and_checks_item() {
        let (service, _) = test_service();
        assert!(matches!(
            service.add_label(ItemId::new(), "fragile", "yes").unwrap_err(),
            DomainError::NotFound(_)
        ));

        let created = service.create_item(test_raw("W-1", 50)).unwrap();
        assert!(matches!(
            service.add_label(*created.item.id(), "", "yes").unwrap_err(),
            DomainError::Validation(_)
        ));
        service.add_label(*created.item.id(), "fragile", "yes").unwrap();
    }

    #[test]
    fn mark_unknown_alert_is_not_found() {
        let (service, _) = test_service();
        assert!(matches!(
            service.mark_alert_read(AlertId::new()).unwrap_err(),
            DomainError::NotFound(_)
        ));
    }

    #[test]
    fn location_summary_honors_configured_depth_limit() {
        let store = Arc::new(InMemoryWarehouseStore::new());
        let wh = store
            .add_location(None, LocationRow::new("WH", LocationKind::Warehouse, 10))
            .unwrap();
        let zone = store
            .add_location(Some(wh), LocationRow::new("Z", LocationKind::Zone, 0))
            .unwrap();
        store
            .add_location(Some(zone), LocationRow::new("B", LocationKind::Bin, 10))
            .unwrap();

        let shallow = WarehouseService::with_standard_alerts(
            Arc::clone(&store),
            None,
            EngineConfig::default().with_max_depth(1),
        );
        assert!(matches!(
            shallow.get_location_summary(wh).unwrap_err(),
            DomainError::Configuration(_)
        ));

        let service =
            WarehouseService::with_standard_alerts(store, None, EngineConfig::default());
        assert_eq!(service.get_location_summary(wh).unwrap().total_stock, 0);
    }

    #[test]
    fn supplier_contact_resolves_variant() {
        let (service, store) = test_service();
        let id = store
            .insert_supplier(RawSupplier {
                id: SupplierId::new(),
                name: "Far Away Ltd".into(),
                supplier_type: "International".into(),
                ..Default::default()
            })
            .unwrap()
            .id;

        let contact = service.get_supplier_contact(id).unwrap();
        assert_eq!(contact.delivery_time.as_deref(), Some("7-14 days"));
        assert_eq!(contact.customs_clearance, Some(true));

        assert!(matches!(
            service.get_supplier_contact(SupplierId::new()).unwrap_err(),
            DomainError::NotFound(_)
        ));
    }

    #[test]
    fn item_listing_is_decorated_and_newest_first() {
        let (service, _) = test_service();
        let first = service.create_item(test_raw("W-1", 50)).unwrap();
        let second = service.create_item(test_raw("W-2", 50)).unwrap();
        service.add_label(*first.item.id(), "fragile", "yes").unwrap();

        let listed = service.list_item_details().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].get("sku"), Some(&json!("W-2")));
        assert_eq!(
            listed[0].get("qrCode"),
            Some(&json!(format!("QR-W-2-{}", second.item.id())))
        );
        assert_eq!(listed[0].get("labels"), Some(&json!([])));
        assert_eq!(
            listed[1].get("labels"),
            Some(&json!([{ "type": "fragile", "value": "yes" }]))
        );
    }

    #[test]
    fn created_suppliers_list_as_contacts_newest_first() {
        let (service, _) = test_service();
        let local = service
            .create_supplier(RawSupplier {
                id: SupplierId::new(),
                name: "Corner Depot".into(),
                supplier_type: "local".into(),
                contact_email: Some("depot@example.com".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(local.delivery_time.as_deref(), Some("1-2 days"));
        assert_eq!(local.email.as_deref(), Some("depot@example.com"));

        service
            .create_supplier(RawSupplier {
                id: SupplierId::new(),
                name: "Plain Parts".into(),
                ..Default::default()
            })
            .unwrap();

        let listed = service.list_suppliers().unwrap();
        let names: Vec<&str> = listed.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Plain Parts", "Corner Depot"]);
        assert_eq!(listed[0].supplier_type, None);
        assert_eq!(listed[1].supplier_type.as_deref(), Some("Local"));
    }

    #[test]
    fn supplier_without_name_is_rejected() {
        let (service, store) = test_service();
        let err = service
            .create_supplier(RawSupplier {
                id: SupplierId::new(),
                name: " ".into(),
                ..Default::default()
            })
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
        assert!(store.list_suppliers().unwrap().is_empty());
    }
}
