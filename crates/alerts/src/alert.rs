use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockyard_core::{AlertId, Entity, ItemId};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    LowStock,
    OutOfStock,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::LowStock => "low_stock",
            AlertType::OutOfStock => "out_of_stock",
        }
    }
}

impl core::fmt::Display for AlertType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted alert raised by an evaluator.
///
/// Only evaluators create records; the read flag is the only mutable field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertRecord {
    id: AlertId,
    item_id: ItemId,
    alert_type: AlertType,
    message: String,
    created_at: DateTime<Utc>,
    is_read: bool,
}

impl AlertRecord {
    pub fn new(
        item_id: ItemId,
        alert_type: AlertType,
        message: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: AlertId::new(),
            item_id,
            alert_type,
            message: message.into(),
            created_at,
            is_read: false,
        }
    }

    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    pub fn alert_type(&self) -> AlertType {
        self.alert_type
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_read(&self) -> bool {
        self.is_read
    }

    /// Flip the read flag. Returns `false` if the alert was already read.
    pub fn mark_read(&mut self) -> bool {
        if self.is_read {
            return false;
        }
        self.is_read = true;
        true
    }
}

impl Entity for AlertRecord {
    type Id = AlertId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
