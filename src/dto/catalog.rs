use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{CatalogItem, PricingRules};

/// Price as sent by the admin form: a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum PriceInput {
    Number(f64),
    Text(String),
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddItemRequest {
    #[serde(rename = "type", default)]
    pub item_type: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<PriceInput>,
    #[serde(default)]
    pub description: Option<String>,
    /// Newline-separated part names, services only.
    #[serde(default)]
    pub parts: Option<String>,
    /// Image URL, parts only.
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, rename = "pricingRules")]
    pub pricing_rules: Option<PricingRules>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ItemEnvelope {
    pub item: CatalogItem,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeletedItems {
    pub removed: usize,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PricedItem {
    #[serde(flatten)]
    pub item: CatalogItem,
    pub final_price: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PricedCatalog {
    pub services: Vec<PricedItem>,
    pub parts: Vec<PricedItem>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingQuote {
    pub service: String,
    pub service_price: i64,
    pub parts_cost: i64,
    pub total: i64,
    /// Part names the service lists that are not in the catalog.
    pub missing_parts: Vec<String>,
}
