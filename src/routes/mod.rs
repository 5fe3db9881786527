use axum::{
    Json, Router,
    http::{StatusCode, Uri},
    routing::get,
};

use crate::{response::ApiResponse, state::AppState};

pub mod auth;
pub mod bookings;
pub mod cart;
pub mod catalog;
pub mod doc;
pub mod health;
pub mod params;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .merge(catalog::router())
        .merge(auth::router())
        .merge(cart::router())
        .merge(bookings::router())
}

/// Health check, `/api` and the docs UI, without a fallback.
pub fn create_app_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", create_api_router())
        .merge(doc::scalar_docs())
}

#[derive(serde::Serialize)]
pub struct NotFoundData {
    pub path: String,
    pub error: String,
}

pub async fn not_found(uri: Uri) -> (StatusCode, Json<ApiResponse<NotFoundData>>) {
    let body = ApiResponse::success(
        "Not Found",
        NotFoundData {
            path: uri.path().to_string(),
            error: "Not Found".to_string(),
        },
    );
    (StatusCode::NOT_FOUND, Json(body))
}
