use axum::extract::State;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app::AppState;
use crate::authz::{can_modify, SharedProps};
use crate::errors::{AppError, AppResult};
use crate::jwt::AuthUser;
use crate::models::user::{AuthResponse, DbUser, LoginRequest, MeResponse, User, USER_COLUMNS};
use crate::routes::users::fetch_user;
use crate::utils::verify_password;

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    message: String,
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let db_user = sqlx::query_as::<_, DbUser>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE email = ? AND deleted_at IS NULL"
    ))
    .bind(&payload.email)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::unauthorized("invalid credentials"))?;

    let password_ok = verify_password(&payload.password, &db_user.password_hash)?;
    if !password_ok {
        return Err(AppError::unauthorized("invalid credentials"));
    }

    // The login request itself is anonymous, so project for the user just resolved.
    let principal = state.principals.find(db_user.id).await?;
    let token = state.jwt.encode(db_user.id)?;
    let user: User = db_user.try_into()?;

    tracing::info!(user_id = user.id, "user logged in");

    Ok(Json(AuthResponse {
        token,
        user,
        can_modify: can_modify(principal.as_ref()),
    }))
}

#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Current user with shared authorization flags", body = MeResponse),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearerAuth" = []))
)]
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
    shared: SharedProps,
) -> AppResult<Json<MeResponse>> {
    let user: User = fetch_user(&state.pool, auth.user_id).await?.try_into()?;

    Ok(Json(MeResponse {
        user,
        role_name: auth.principal.role_name().map(str::to_string),
        can_modify: shared.can_modify,
    }))
}

#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "Auth",
    responses((status = 200, description = "Logout acknowledged", body = MessageResponse)),
    security(("bearerAuth" = []))
)]
pub async fn logout(_auth: AuthUser) -> AppResult<Json<MessageResponse>> {
    Ok(Json(MessageResponse {
        message: "Logged out".to_string(),
    }))
}
