use serde_json::Map;

use crate::{
    audit::log_audit,
    dto::cart::{AddToCartRequest, CartEnvelope, CartSummary},
    error::{AppError, AppResult, StorageContext},
    models::{CartLine, ItemType},
    response::{ApiResponse, Empty},
    state::AppState,
    store::Collection,
};

/// Cart ids come straight from the URL; only positive integers name a cart.
pub fn parse_user_id(raw: &str) -> AppResult<i64> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or(AppError::InvalidUserId)
}

pub async fn get_cart(state: &AppState, user_id: &str) -> AppResult<Vec<CartLine>> {
    let user_id = parse_user_id(user_id)?;
    state
        .store
        .load_or(&Collection::Cart(user_id), Vec::new)
        .await
        .storage_context("Failed to load cart")
}

/// Replace the whole cart with `lines`, as sent.
pub async fn save_cart(
    state: &AppState,
    user_id: &str,
    lines: Vec<CartLine>,
) -> AppResult<ApiResponse<Empty>> {
    let user_id = parse_user_id(user_id)?;
    state
        .store
        .save(&Collection::Cart(user_id), &lines)
        .await
        .storage_context("Failed to save cart")?;

    log_audit(
        Some(user_id),
        "cart_save",
        Some("cart"),
        Some(serde_json::json!({ "lines": lines.len() })),
    );
    Ok(ApiResponse::message("Cart saved"))
}

/// Add one unit of `item`, merging with an existing line of the same type
/// and name.
pub async fn add_to_cart(
    state: &AppState,
    user_id: &str,
    item: AddToCartRequest,
) -> AppResult<ApiResponse<CartEnvelope>> {
    let user_id = parse_user_id(user_id)?;
    let cart = state
        .store
        .update(&Collection::Cart(user_id), Vec::new, |cart: &mut Vec<CartLine>| {
            merge_line(cart, item.clone());
            Ok::<_, AppError>(cart.clone())
        })
        .await
        .storage_context("Failed to save cart")?;

    log_audit(
        Some(user_id),
        "cart_add",
        Some("cart"),
        Some(serde_json::json!({ "type": item.item_type.as_str(), "name": item.name })),
    );
    Ok(ApiResponse::success("Added to cart", CartEnvelope { cart }))
}

pub async fn cart_summary(state: &AppState, user_id: &str) -> AppResult<CartSummary> {
    let cart = get_cart(state, user_id).await?;
    Ok(summarize(&cart))
}

pub fn merge_line(cart: &mut Vec<CartLine>, item: AddToCartRequest) {
    if let Some(line) = cart
        .iter_mut()
        .find(|line| line.item_type == item.item_type && line.name == item.name)
    {
        line.qty = line.qty.saturating_add(1);
        return;
    }

    cart.push(CartLine {
        item_type: item.item_type,
        name: item.name,
        price: item.price,
        qty: 1,
        image: item.image,
        extra: Map::new(),
    });
}

pub fn summarize(cart: &[CartLine]) -> CartSummary {
    cart.iter().fold(CartSummary::default(), |mut summary, line| {
        // Lines are stored as the client sent them; totals saturate.
        let line_total = line.price.saturating_mul(i64::from(line.qty));
        match line.item_type {
            ItemType::Service => {
                summary.services_cost = summary.services_cost.saturating_add(line_total)
            }
            ItemType::Part => summary.parts_cost = summary.parts_cost.saturating_add(line_total),
        }
        summary.total = summary.total.saturating_add(line_total);
        summary.count = summary.count.saturating_add(u64::from(line.qty));
        summary
    })
}
