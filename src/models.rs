use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub engine_volume: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    pub email: String,
    /// Plaintext or a PHC hash string, depending on the configured scheme.
    pub password: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub car: Car,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Service,
    Part,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Service => "service",
            ItemType::Part => "part",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownItemType;

impl FromStr for ItemType {
    type Err = UnknownItemType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "service" => Ok(ItemType::Service),
            "part" => Ok(ItemType::Part),
            _ => Err(UnknownItemType),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceTier {
    pub up_to: f64,
    pub price: i64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PricingRules {
    /// Ascending by `up_to`.
    #[serde(default)]
    pub engine_volume: Vec<PriceTier>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: i64,
    pub name: String,
    pub price: i64,
    #[serde(default)]
    pub description: String,
    /// Names of the parts a service uses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parts: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing_rules: Option<PricingRules>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
pub struct Catalog {
    #[serde(default)]
    pub services: Vec<CatalogItem>,
    #[serde(default)]
    pub parts: Vec<CatalogItem>,
}

impl Catalog {
    /// Content served before the catalog document has ever been written.
    pub fn seed() -> Self {
        Self {
            services: vec![CatalogItem {
                id: 1,
                name: "Oil and filter change".to_string(),
                price: 2000,
                description: "Engine oil and oil filter replacement".to_string(),
                parts: Some(vec![
                    "Engine oil 5W-30".to_string(),
                    "Oil filter".to_string(),
                ]),
                image: None,
                pricing_rules: None,
            }],
            parts: vec![CatalogItem {
                id: 1,
                name: "Engine oil 5W-30".to_string(),
                price: 1500,
                description: "Synthetic engine oil, 4 L".to_string(),
                parts: None,
                image: None,
                pricing_rules: None,
            }],
        }
    }

    pub fn section(&self, item_type: ItemType) -> &[CatalogItem] {
        match item_type {
            ItemType::Service => &self.services,
            ItemType::Part => &self.parts,
        }
    }

    pub fn section_mut(&mut self, item_type: ItemType) -> &mut Vec<CatalogItem> {
        match item_type {
            ItemType::Service => &mut self.services,
            ItemType::Part => &mut self.parts,
        }
    }

    pub fn max_id(&self) -> Option<i64> {
        self.services.iter().chain(&self.parts).map(|item| item.id).max()
    }
}

fn default_qty() -> u32 {
    1
}

/// One line of a user's cart, keyed by (`item_type`, `name`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CartLine {
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub name: String,
    pub price: i64,
    #[serde(default = "default_qty")]
    pub qty: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Client fields this server does not interpret, kept as sent.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingRecord {
    pub id: i64,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub client_phone: String,
    #[serde(default)]
    pub client_email: String,
    #[serde(default)]
    pub car_model: String,
    /// Service name copied at booking time.
    #[serde(default)]
    pub service: String,
    /// `YYYY-MM-DD`
    #[serde(default)]
    pub date: String,
    /// `HH:MM`
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub comments: String,
    #[serde(default)]
    pub total: i64,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
