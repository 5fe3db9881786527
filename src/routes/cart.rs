use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};

use crate::{
    dto::cart::{AddToCartRequest, CartEnvelope, CartSummary},
    error::AppResult,
    models::CartLine,
    response::{ApiResponse, Empty},
    services::cart_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cart/{user_id}", get(get_cart).post(save_cart))
        .route("/cart/{user_id}/items", post(add_to_cart))
        .route("/cart/{user_id}/summary", get(cart_summary))
}

#[utoipa::path(
    get,
    path = "/api/cart/{user_id}",
    params(
        ("user_id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Cart lines of the user", body = Vec<CartLine>),
        (status = 400, description = "Invalid user id"),
        (status = 500, description = "Storage failure")
    ),
    tag = "Cart"
)]
pub async fn get_cart(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<Vec<CartLine>>> {
    Ok(Json(cart_service::get_cart(&state, &user_id).await?))
}

#[utoipa::path(
    post,
    path = "/api/cart/{user_id}",
    params(
        ("user_id" = String, Path, description = "User ID")
    ),
    request_body = Vec<CartLine>,
    responses(
        (status = 200, description = "Cart replaced", body = ApiResponse<Empty>),
        (status = 400, description = "Invalid user id"),
        (status = 500, description = "Storage failure")
    ),
    tag = "Cart"
)]
pub async fn save_cart(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(lines): Json<Vec<CartLine>>,
) -> AppResult<Json<ApiResponse<Empty>>> {
    let resp = cart_service::save_cart(&state, &user_id, lines).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/cart/{user_id}/items",
    params(
        ("user_id" = String, Path, description = "User ID")
    ),
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Item added or quantity increased", body = ApiResponse<CartEnvelope>),
        (status = 400, description = "Invalid user id"),
        (status = 500, description = "Storage failure")
    ),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(item): Json<AddToCartRequest>,
) -> AppResult<Json<ApiResponse<CartEnvelope>>> {
    let resp = cart_service::add_to_cart(&state, &user_id, item).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/cart/{user_id}/summary",
    params(
        ("user_id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Totals for the order page", body = CartSummary),
        (status = 400, description = "Invalid user id"),
        (status = 500, description = "Storage failure")
    ),
    tag = "Cart"
)]
pub async fn cart_summary(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<CartSummary>> {
    Ok(Json(cart_service::cart_summary(&state, &user_id).await?))
}
