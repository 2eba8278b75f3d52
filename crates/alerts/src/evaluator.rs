//! Alert rules.
//!
//! Each evaluator looks at one stock-change snapshot on its own; none reads
//! another's output or any stored history.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info};

use stockyard_core::StorageError;
use stockyard_events::{Event, Feed, InMemoryFeed, StockChanged, StockLevel};

use crate::alert::{AlertRecord, AlertType};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvaluatorError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("stock feed publish failed: {0}")]
    Feed(String),
}

pub trait AlertEvaluator: Send + Sync {
    /// Stable name used in logs and failure reports.
    fn name(&self) -> &'static str;

    /// Decide whether `event` warrants an alert record.
    fn evaluate(&self, event: &StockChanged) -> Option<AlertRecord>;

    /// Evaluator-specific telemetry, run on every dispatch.
    fn observe(&self, _event: &StockChanged) -> Result<(), EvaluatorError> {
        Ok(())
    }
}

/// Fires when `0 < quantity <= threshold`.
#[derive(Debug, Default, Copy, Clone)]
pub struct LowStockEvaluator;

impl AlertEvaluator for LowStockEvaluator {
    fn name(&self) -> &'static str {
        "low_stock"
    }

    fn evaluate(&self, event: &StockChanged) -> Option<AlertRecord> {
        if event.level() != StockLevel::LowStock {
            return None;
        }
        info!(item = %event.item_id, quantity = event.quantity, "low stock: {}", event.name);
        Some(AlertRecord::new(
            event.item_id,
            AlertType::LowStock,
            format!(
                "Low stock alert: {} (SKU: {}) has only {} units left. Threshold: {}",
                event.name, event.sku, event.quantity, event.threshold
            ),
            Utc::now(),
        ))
    }
}

/// Fires when `quantity == 0`.
#[derive(Debug, Default, Copy, Clone)]
pub struct OutOfStockEvaluator;

impl AlertEvaluator for OutOfStockEvaluator {
    fn name(&self) -> &'static str {
        "out_of_stock"
    }

    fn evaluate(&self, event: &StockChanged) -> Option<AlertRecord> {
        if event.level() != StockLevel::OutOfStock {
            return None;
        }
        info!(item = %event.item_id, "out of stock: {}", event.name);
        Some(AlertRecord::new(
            event.item_id,
            AlertType::OutOfStock,
            format!("CRITICAL: {} (SKU: {}) is OUT OF STOCK!", event.name, event.sku),
            Utc::now(),
        ))
    }
}

/// Dashboard notifier: sees every event, never raises a record.
///
/// Logs each change and, when a feed is attached, republishes the snapshot
/// for live dashboard subscribers.
#[derive(Debug)]
pub struct DashboardNotifier<B = Arc<InMemoryFeed<StockChanged>>> {
    feed: Option<B>,
}

impl DashboardNotifier {
    /// Log-only notifier.
    pub fn new() -> Self {
        Self { feed: None }
    }
}

impl Default for DashboardNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl<B> DashboardNotifier<B>
where
    B: Feed<StockChanged>,
{
    pub fn with_feed(feed: B) -> Self {
        Self { feed: Some(feed) }
    }
}

impl<B> AlertEvaluator for DashboardNotifier<B>
where
    B: Feed<StockChanged> + 'static,
{
    fn name(&self) -> &'static str {
        "dashboard_notifier"
    }

    fn evaluate(&self, _event: &StockChanged) -> Option<AlertRecord> {
        None
    }

    fn observe(&self, event: &StockChanged) -> Result<(), EvaluatorError> {
        info!(
            event_type = event.event_type(),
            version = event.version(),
            item = %event.item_id,
            quantity = event.quantity,
            level = ?event.level(),
            "dashboard update: {} quantity changed to {}",
            event.name,
            event.quantity
        );
        if let Some(feed) = &self.feed {
            let delivered = feed
                .publish(event.clone())
                .map_err(|e| EvaluatorError::Feed(e.to_string()))?;
            debug!(item = %event.item_id, delivered, "stock change published to feed");
        }
        Ok(())
    }
}
