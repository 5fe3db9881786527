use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};

use crate::{
    dto::auth::{LoginRequest, RegisterRequest, UserEnvelope},
    error::AppResult,
    models::User,
    response::ApiResponse,
    services::auth_service::{list_users, login_user, register_user},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/users", get(users))
}

#[utoipa::path(
    post,
    path = "/api/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Register user", body = ApiResponse<UserEnvelope>),
        (status = 400, description = "Email already registered or fields missing"),
        (status = 500, description = "Storage failure")
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<Json<ApiResponse<UserEnvelope>>> {
    let resp = register_user(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login user", body = ApiResponse<UserEnvelope>),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Storage failure")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<UserEnvelope>>> {
    let resp = login_user(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "All registered users", body = Vec<User>),
        (status = 500, description = "Storage failure")
    ),
    tag = "Auth"
)]
pub async fn users(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    Ok(Json(list_users(&state).await?))
}
