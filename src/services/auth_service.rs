use crate::{
    audit::log_audit,
    dto::auth::{LoginRequest, RegisterRequest, UserEnvelope},
    error::{AppError, AppResult, StorageContext},
    models::{Car, Role, User},
    response::ApiResponse,
    state::AppState,
    store::Collection,
};

pub async fn register_user(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<UserEnvelope>> {
    let RegisterRequest {
        name,
        email,
        password,
        car_model,
        engine_volume,
    } = payload;

    let stored_password = state.passwords.hash(&password)?;

    let user = state
        .store
        .update(&Collection::Users, Vec::new, |users: &mut Vec<User>| {
            // Exact, case-sensitive comparison, as stored data expects.
            if users.iter().any(|u| u.email == email) {
                return Err(AppError::DuplicateEmail);
            }

            state.ids.observe(users.iter().map(|u| u.id).max());
            let user = User {
                id: state.ids.next_id(),
                name,
                email,
                password: stored_password,
                role: Role::User,
                car: Car {
                    model: car_model,
                    engine_volume,
                },
            };
            users.push(user.clone());
            Ok(user)
        })
        .await
        .storage_context("Registration failed")?;

    log_audit(
        Some(user.id),
        "user_register",
        Some("users"),
        Some(serde_json::json!({ "user_id": user.id, "scheme": state.passwords.name() })),
    );

    Ok(ApiResponse::success(
        "Registration successful",
        UserEnvelope { user },
    ))
}

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<UserEnvelope>> {
    let LoginRequest { email, password } = payload;
    let users = list_users(state).await.storage_context("Login failed")?;

    let user = users
        .into_iter()
        .find(|u| u.email == email && state.passwords.verify(&password, &u.password))
        .ok_or(AppError::InvalidCredentials)?;

    log_audit(
        Some(user.id),
        "user_login",
        Some("users"),
        Some(serde_json::json!({ "user_id": user.id })),
    );

    Ok(ApiResponse::success("Login successful", UserEnvelope { user }))
}

pub async fn list_users(state: &AppState) -> AppResult<Vec<User>> {
    state
        .store
        .load_or(&Collection::Users, Vec::new)
        .await
        .storage_context("Failed to load users")
}
