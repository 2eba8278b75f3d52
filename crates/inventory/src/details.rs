//! Item detail projections and the metadata layers composed over them.
//!
//! A layer never touches the item itself. It takes a projection and returns a
//! new one with its own keys merged in, so stacking layers is plain function
//! composition and the last layer applied wins on a key collision.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue, json};

use stockyard_core::{Entity, ItemId};

use crate::item::Item;

/// Structured, JSON-shaped view of an item.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemDetails(Map<String, JsonValue>);

impl ItemDetails {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<JsonValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &JsonValue)> {
        self.0.iter()
    }

    pub fn into_json(self) -> JsonValue {
        JsonValue::Object(self.0)
    }

    /// Apply one metadata layer.
    pub fn decorate(self, layer: &Layer) -> Self {
        layer.apply(self)
    }

    /// Apply layers in order (first element innermost).
    pub fn decorate_all<'a>(self, layers: impl IntoIterator<Item = &'a Layer>) -> Self {
        layers.into_iter().fold(self, |details, layer| layer.apply(details))
    }
}

/// A label attached to an item (e.g. `fragile`, `hazmat`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    #[serde(rename = "type")]
    pub label_type: String,
    pub value: String,
}

impl Label {
    pub fn new(label_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label_type: label_type.into(),
            value: value.into(),
        }
    }

    fn to_json(&self) -> JsonValue {
        json!({ "type": self.label_type, "value": self.value })
    }
}

/// Deterministic QR payload for an item; no randomness, no persisted state.
pub fn qr_code(sku: &str, id: &ItemId) -> String {
    format!("QR-{sku}-{id}")
}

/// Presentation-only metadata layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Layer {
    Labels(Vec<Label>),
    QrIdentity(String),
}

impl Layer {
    pub fn labels(labels: Vec<Label>) -> Self {
        Layer::Labels(labels)
    }

    pub fn qr_identity(item: &Item) -> Self {
        Layer::QrIdentity(qr_code(item.sku(), item.id()))
    }

    /// Keys this layer contributes to a projection.
    pub fn keys(&self) -> [&'static str; 2] {
        match self {
            Layer::Labels(_) => ["labels", "isLabeled"],
            Layer::QrIdentity(_) => ["qrCode", "qrEnabled"],
        }
    }

    pub fn apply(&self, mut details: ItemDetails) -> ItemDetails {
        match self {
            Layer::Labels(labels) => {
                let labels = labels.iter().map(Label::to_json).collect::<Vec<_>>();
                details.insert("labels", JsonValue::Array(labels));
                details.insert("isLabeled", true);
            }
            Layer::QrIdentity(code) => {
                details.insert("qrCode", code.clone());
                details.insert("qrEnabled", true);
            }
        }
        details
    }
}

pub fn with_labels(details: ItemDetails, labels: &[Label]) -> ItemDetails {
    Layer::labels(labels.to_vec()).apply(details)
}

pub fn with_qr_identity(details: ItemDetails, item: &Item) -> ItemDetails {
    Layer::qr_identity(item).apply(details)
}
