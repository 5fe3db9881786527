use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, post},
};
use chrono::Utc;

use crate::{
    dto::{
        bookings::{BookingCreated, BookingRequest, BookingStats},
        catalog::BookingQuote,
    },
    error::AppResult,
    models::BookingRecord,
    response::{ApiResponse, Empty},
    routes::params::{QuoteQuery, UpcomingQuery},
    services::{
        booking_service::{self, DEFAULT_UPCOMING_LIMIT},
        catalog_service,
    },
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/booking", post(create_booking))
        .route("/booking/quote", get(quote_booking))
        .route("/records", get(list_records).delete(clear_records))
        .route("/records/stats", get(record_stats))
        .route("/records/upcoming", get(upcoming_records))
        .route("/records/{id}", delete(delete_record))
}

#[utoipa::path(
    post,
    path = "/api/booking",
    request_body = BookingRequest,
    responses(
        (status = 200, description = "Booking stored", body = ApiResponse<BookingCreated>),
        (status = 500, description = "Storage failure")
    ),
    tag = "Bookings"
)]
pub async fn create_booking(
    State(state): State<AppState>,
    Json(payload): Json<BookingRequest>,
) -> AppResult<Json<ApiResponse<BookingCreated>>> {
    let resp = booking_service::create_booking(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/booking/quote",
    params(
        ("service" = String, Query, description = "Service name"),
        ("engineVolume" = Option<f64>, Query, description = "Engine volume in litres")
    ),
    responses(
        (status = 200, description = "Price a booking would be stored with", body = BookingQuote),
        (status = 404, description = "Unknown service"),
        (status = 500, description = "Storage failure")
    ),
    tag = "Bookings"
)]
pub async fn quote_booking(
    State(state): State<AppState>,
    Query(query): Query<QuoteQuery>,
) -> AppResult<Json<BookingQuote>> {
    let quote =
        catalog_service::quote_booking(&state, &query.service, query.engine_volume).await?;
    Ok(Json(quote))
}

#[utoipa::path(
    get,
    path = "/api/records",
    responses(
        (status = 200, description = "All bookings", body = Vec<BookingRecord>),
        (status = 500, description = "Storage failure")
    ),
    tag = "Bookings"
)]
pub async fn list_records(State(state): State<AppState>) -> AppResult<Json<Vec<BookingRecord>>> {
    Ok(Json(booking_service::list_bookings(&state).await?))
}

#[utoipa::path(
    get,
    path = "/api/records/stats",
    responses(
        (status = 200, description = "Admin panel counters", body = BookingStats),
        (status = 500, description = "Storage failure")
    ),
    tag = "Bookings"
)]
pub async fn record_stats(State(state): State<AppState>) -> AppResult<Json<BookingStats>> {
    let today = Utc::now().date_naive();
    Ok(Json(booking_service::booking_stats(&state, today).await?))
}

#[utoipa::path(
    get,
    path = "/api/records/upcoming",
    params(
        ("limit" = Option<usize>, Query, description = "Maximum records, default 5")
    ),
    responses(
        (status = 200, description = "Nearest bookings from today on", body = Vec<BookingRecord>),
        (status = 500, description = "Storage failure")
    ),
    tag = "Bookings"
)]
pub async fn upcoming_records(
    State(state): State<AppState>,
    Query(query): Query<UpcomingQuery>,
) -> AppResult<Json<Vec<BookingRecord>>> {
    let today = Utc::now().date_naive();
    let limit = query.normalize(DEFAULT_UPCOMING_LIMIT);
    Ok(Json(
        booking_service::upcoming_bookings(&state, today, limit).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/records/{id}",
    params(
        ("id" = String, Path, description = "Booking id")
    ),
    responses(
        (status = 200, description = "Booking deleted", body = ApiResponse<Empty>),
        (status = 500, description = "Storage failure")
    ),
    tag = "Bookings"
)]
pub async fn delete_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Empty>>> {
    let resp = booking_service::delete_booking(&state, &id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/records",
    responses(
        (status = 200, description = "All bookings deleted", body = ApiResponse<Empty>),
        (status = 500, description = "Storage failure")
    ),
    tag = "Bookings"
)]
pub async fn clear_records(State(state): State<AppState>) -> AppResult<Json<ApiResponse<Empty>>> {
    let resp = booking_service::clear_bookings(&state).await?;
    Ok(Json(resp))
}
