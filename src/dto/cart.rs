use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{CartLine, ItemType};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub name: String,
    pub price: i64,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartEnvelope {
    pub cart: Vec<CartLine>,
}

#[derive(Debug, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub services_cost: i64,
    pub parts_cost: i64,
    pub total: i64,
    pub count: u64,
}
