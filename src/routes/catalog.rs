use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get},
};

use crate::{
    dto::catalog::{AddItemRequest, DeletedItems, ItemEnvelope, PricedCatalog},
    error::AppResult,
    models::Catalog,
    response::ApiResponse,
    routes::params::EngineVolumeQuery,
    services::catalog_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/items", get(list_items).post(add_item))
        .route("/items/priced", get(priced_items))
        .route("/items/{item_type}/{name}", delete(delete_item))
        .route("/items/{item_type}/id/{id}", delete(delete_item_by_id))
}

#[utoipa::path(
    get,
    path = "/api/items",
    responses(
        (status = 200, description = "Whole catalog", body = Catalog),
        (status = 500, description = "Storage failure")
    ),
    tag = "Catalog"
)]
pub async fn list_items(State(state): State<AppState>) -> AppResult<Json<Catalog>> {
    Ok(Json(catalog_service::get_catalog(&state).await?))
}

#[utoipa::path(
    get,
    path = "/api/items/priced",
    params(
        ("engineVolume" = Option<f64>, Query, description = "Engine volume in litres; base prices when absent")
    ),
    responses(
        (status = 200, description = "Catalog with prices resolved for an engine volume", body = PricedCatalog),
        (status = 500, description = "Storage failure")
    ),
    tag = "Catalog"
)]
pub async fn priced_items(
    State(state): State<AppState>,
    Query(query): Query<EngineVolumeQuery>,
) -> AppResult<Json<PricedCatalog>> {
    Ok(Json(
        catalog_service::priced_catalog(&state, query.engine_volume).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/items",
    request_body = AddItemRequest,
    responses(
        (status = 200, description = "Item added", body = ApiResponse<ItemEnvelope>),
        (status = 400, description = "Missing field, invalid type or invalid price"),
        (status = 500, description = "Storage failure")
    ),
    tag = "Catalog"
)]
pub async fn add_item(
    State(state): State<AppState>,
    Json(payload): Json<AddItemRequest>,
) -> AppResult<Json<ApiResponse<ItemEnvelope>>> {
    let resp = catalog_service::add_item(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/items/{item_type}/{name}",
    params(
        ("item_type" = String, Path, description = "`service` or `part`"),
        ("name" = String, Path, description = "Exact item name; every match is removed")
    ),
    responses(
        (status = 200, description = "Items deleted", body = ApiResponse<DeletedItems>),
        (status = 400, description = "Invalid type"),
        (status = 500, description = "Storage failure")
    ),
    tag = "Catalog"
)]
pub async fn delete_item(
    State(state): State<AppState>,
    Path((item_type, name)): Path<(String, String)>,
) -> AppResult<Json<ApiResponse<DeletedItems>>> {
    let resp = catalog_service::delete_item(&state, &item_type, &name).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/items/{item_type}/id/{id}",
    params(
        ("item_type" = String, Path, description = "`service` or `part`"),
        ("id" = i64, Path, description = "Item id")
    ),
    responses(
        (status = 200, description = "Item deleted", body = ApiResponse<DeletedItems>),
        (status = 400, description = "Invalid type"),
        (status = 404, description = "No item with that id"),
        (status = 500, description = "Storage failure")
    ),
    tag = "Catalog"
)]
pub async fn delete_item_by_id(
    State(state): State<AppState>,
    Path((item_type, id)): Path<(String, i64)>,
) -> AppResult<Json<ApiResponse<DeletedItems>>> {
    let resp = catalog_service::delete_item_by_id(&state, &item_type, id).await?;
    Ok(Json(resp))
}
