//! Seeds an in-memory warehouse, runs a few stock writes, and prints the
//! resulting summaries as JSON.

use std::sync::Arc;

use anyhow::Context;

use stockyard_core::{Entity, ItemId, LocationId, SupplierId};
use stockyard_events::{Feed, InMemoryFeed, StockChanged};
use stockyard_infra::{EngineConfig, InMemoryWarehouseStore, WarehouseService};
use stockyard_inventory::{LocationKind, LocationRow, RawItem, RawSupplier};

fn main() -> anyhow::Result<()> {
    let config = EngineConfig::from_env();
    stockyard_observability::init_with(&config.log);

    let store = Arc::new(InMemoryWarehouseStore::new());
    let feed: Arc<InMemoryFeed<StockChanged>> = Arc::new(InMemoryFeed::new());
    let dashboard = feed.subscribe();

    let root = seed_locations(&store).context("failed to seed locations")?;
    let service = WarehouseService::with_standard_alerts(Arc::clone(&store), Some(feed), config);

    let supplier = RawSupplier {
        id: SupplierId::new(),
        name: "Harbor Fasteners".into(),
        supplier_type: "international".into(),
        contact_email: Some("orders@harbor.example".into()),
        ..Default::default()
    };
    let harbor = supplier.id;
    service
        .create_supplier(supplier)
        .context("failed to create supplier")?;

    let bolts = service
        .create_item(RawItem {
            supplier_id: Some(harbor),
            ..demo_item("BOLT-M8", "Hex bolt M8", "base", 120)
        })
        .context("failed to create bolts")?;
    service
        .create_item(demo_item("SAND-25", "Sand", "bulk", 6))
        .context("failed to create sand")?;
    let emptied = service
        .update_stock(*bolts.item.id(), 0)
        .context("failed to update bolts")?;
    let raised = emptied
        .report
        .into_result()
        .context("alert pipeline did not complete")?;
    tracing::info!(alerts = raised.len(), "bolts emptied");

    let summary = service
        .get_location_summary(root)
        .context("failed to summarize warehouse")?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    println!("{}", serde_json::to_string_pretty(&service.list_alerts()?)?);
    println!("{}", serde_json::to_string_pretty(&service.list_item_details()?)?);
    println!("{}", serde_json::to_string_pretty(&service.list_suppliers()?)?);
    println!("{}", serde_json::to_string_pretty(&service.inventory_summary()?)?);
    println!(
        "{}",
        serde_json::to_string_pretty(&service.supplier_performance_report()?)?
    );

    for change in dashboard.drain() {
        tracing::info!(sku = %change.sku, quantity = change.quantity, level = ?change.level(), "dashboard update");
    }

    Ok(())
}

fn seed_locations(store: &InMemoryWarehouseStore) -> anyhow::Result<LocationId> {
    let root = store.add_location(None, LocationRow::new("Main", LocationKind::Warehouse, 500))?;
    let zone = store.add_location(Some(root), LocationRow::new("A", LocationKind::Zone, 300))?;
    let rack = store.add_location(Some(zone), LocationRow::new("A1", LocationKind::Rack, 300))?;
    store.add_location(Some(rack), LocationRow::new("A1-1", LocationKind::Bin, 150))?;
    Ok(root)
}

fn demo_item(sku: &str, name: &str, item_type: &str, quantity: u64) -> RawItem {
    RawItem {
        id: ItemId::new(),
        sku: sku.to_string(),
        name: name.to_string(),
        item_type: item_type.to_string(),
        quantity: Some(quantity),
        zone: Some("A".into()),
        rack: Some("A1".into()),
        bin: Some("A1-1".into()),
        ..Default::default()
    }
}
