//! Supplier variants and their contact projection.

use serde::{Deserialize, Serialize};

use stockyard_core::{Entity, SupplierId};

/// Supplier row as supplied by the storage collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawSupplier {
    pub id: SupplierId,
    pub name: String,
    #[serde(rename = "type", default)]
    pub supplier_type: String,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupplierVariant {
    Standard,
    Local,
    International,
}

impl SupplierVariant {
    /// Case-insensitive; anything unrecognized is a standard supplier.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "local" => SupplierVariant::Local,
            "international" => SupplierVariant::International,
            _ => SupplierVariant::Standard,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Supplier {
    id: SupplierId,
    name: String,
    contact_email: Option<String>,
    contact_phone: Option<String>,
    variant: SupplierVariant,
}

/// Contact projection handed to the API layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_cost: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customs_clearance: Option<bool>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub supplier_type: Option<String>,
}

pub fn resolve_supplier(type_tag: &str, raw: RawSupplier) -> Supplier {
    Supplier {
        id: raw.id,
        name: raw.name,
        contact_email: raw.contact_email,
        contact_phone: raw.contact_phone,
        variant: SupplierVariant::from_tag(type_tag),
    }
}

impl Supplier {
    pub fn from_raw(raw: RawSupplier) -> Self {
        let tag = raw.supplier_type.clone();
        resolve_supplier(&tag, raw)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variant(&self) -> SupplierVariant {
        self.variant
    }

    pub fn contact_info(&self) -> ContactInfo {
        let mut info = ContactInfo {
            name: self.name.clone(),
            email: self.contact_email.clone(),
            phone: self.contact_phone.clone(),
            delivery_time: None,
            shipping_cost: None,
            customs_clearance: None,
            supplier_type: None,
        };

        match self.variant {
            SupplierVariant::Standard => {}
            SupplierVariant::Local => {
                info.delivery_time = Some("1-2 days".to_string());
                info.shipping_cost = Some("low".to_string());
                info.supplier_type = Some("Local".to_string());
            }
            SupplierVariant::International => {
                info.delivery_time = Some("7-14 days".to_string());
                info.shipping_cost = Some("high".to_string());
                info.customs_clearance = Some(true);
                info.supplier_type = Some("International".to_string());
            }
        }

        info
    }
}

impl Entity for Supplier {
    type Id = SupplierId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
