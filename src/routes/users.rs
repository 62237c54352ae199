use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use sqlx::SqlitePool;

use crate::app::AppState;
use crate::authz::SharedProps;
use crate::errors::{AppError, AppResult};
use crate::jwt::AuthUser;
use crate::models::user::{DbUser, User, UserCreateRequest, UserUpdateRequest, USER_COLUMNS};
use crate::models::{Listing, UserListing};
use crate::utils::{hash_password, utc_now};

#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    responses(
        (status = 200, description = "List users", body = UserListing),
        (status = 403, description = "Denied by the role gate")
    ),
    security(("bearerAuth" = []))
)]
pub async fn index(
    State(state): State<AppState>,
    _auth: AuthUser,
    shared: SharedProps,
) -> AppResult<Json<Listing<User>>> {
    let users = sqlx::query_as::<_, DbUser>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE deleted_at IS NULL ORDER BY name"
    ))
    .fetch_all(&state.pool)
    .await?;

    let users: Vec<User> = users
        .into_iter()
        .map(User::try_from)
        .collect::<Result<_, _>>()?;

    Ok(Json(Listing {
        data: users,
        can_modify: shared.can_modify,
    }))
}

#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body = UserCreateRequest,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 409, description = "Email already in use"),
        (status = 403, description = "Denied by the role gate")
    ),
    security(("bearerAuth" = []))
)]
pub async fn store(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<UserCreateRequest>,
) -> AppResult<(StatusCode, Json<User>)> {
    if payload.name.trim().is_empty() {
        return Err(AppError::bad_request("user name must not be empty"));
    }
    ensure_email_available(&state.pool, &payload.email).await?;
    if let Some(role_id) = payload.role_id {
        ensure_role_exists(&state.pool, role_id).await?;
    }

    let password_hash = hash_password(&payload.password)?;
    let now = utc_now();

    let id = sqlx::query(
        "INSERT INTO users (name, email, password_hash, role, role_id, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&payload.name)
    .bind(&payload.email)
    .bind(password_hash)
    .bind(&payload.role)
    .bind(payload.role_id)
    .bind(now)
    .bind(now)
    .execute(&state.pool)
    .await?
    .last_insert_rowid();

    tracing::info!(user_id = auth.user_id, created_user_id = id, "user created");

    let user: User = fetch_user(&state.pool, id).await?.try_into()?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User detail", body = User),
        (status = 403, description = "Denied by the role gate")
    ),
    security(("bearerAuth" = []))
)]
pub async fn show(State(state): State<AppState>, _auth: AuthUser, Path(id): Path<i64>) -> AppResult<Json<User>> {
    let user: User = fetch_user(&state.pool, id).await?.try_into()?;
    Ok(Json(user))
}

#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User id")),
    request_body = UserUpdateRequest,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 403, description = "Denied by the role gate")
    ),
    security(("bearerAuth" = []))
)]
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UserUpdateRequest>,
) -> AppResult<Json<User>> {
    let mut user = fetch_user(&state.pool, id).await?;

    if let Some(name) = payload.name {
        if name.trim().is_empty() {
            return Err(AppError::bad_request("user name must not be empty"));
        }
        user.name = name;
    }
    match payload.role_id {
        Some(Some(role_id)) => {
            ensure_role_exists(&state.pool, role_id).await?;
            user.role_id = Some(role_id);
        }
        Some(None) => user.role_id = None,
        None => {}
    }
    if let Some(role) = payload.role {
        user.role = role;
    }
    user.updated_at = utc_now();

    sqlx::query("UPDATE users SET name = ?, role = ?, role_id = ?, updated_at = ? WHERE id = ? AND deleted_at IS NULL")
        .bind(&user.name)
        .bind(&user.role)
        .bind(user.role_id)
        .bind(user.updated_at)
        .bind(user.id)
        .execute(&state.pool)
        .await?;

    tracing::info!(user_id = auth.user_id, updated_user_id = id, role_id = ?user.role_id, "user updated");

    Ok(Json(user.try_into()?))
}

#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 204, description = "User soft deleted"),
        (status = 403, description = "Denied by the role gate")
    ),
    security(("bearerAuth" = []))
)]
pub async fn destroy(State(state): State<AppState>, auth: AuthUser, Path(id): Path<i64>) -> AppResult<StatusCode> {
    if id == auth.user_id {
        return Err(AppError::bad_request("cannot delete the current user"));
    }

    let now = utc_now();
    let affected = sqlx::query("UPDATE users SET deleted_at = ?, updated_at = ? WHERE id = ? AND deleted_at IS NULL")
        .bind(now)
        .bind(now)
        .bind(id)
        .execute(&state.pool)
        .await?;

    if affected.rows_affected() == 0 {
        return Err(AppError::not_found("user not found"));
    }

    tracing::info!(user_id = auth.user_id, deleted_user_id = id, "user soft deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn fetch_user(pool: &SqlitePool, user_id: i64) -> AppResult<DbUser> {
    sqlx::query_as::<_, DbUser>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = ? AND deleted_at IS NULL"
    ))
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::not_found("user not found"))
}

async fn ensure_email_available(pool: &SqlitePool, email: &str) -> AppResult<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(1) FROM users WHERE email = ?")
        .bind(email)
        .fetch_one(pool)
        .await?;

    if count > 0 {
        return Err(AppError::conflict("email already in use"));
    }

    Ok(())
}

async fn ensure_role_exists(pool: &SqlitePool, role_id: i64) -> AppResult<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(1) FROM roles WHERE id = ?")
        .bind(role_id)
        .fetch_one(pool)
        .await?;

    if count == 0 {
        return Err(AppError::bad_request("unknown role"));
    }
    Ok(())
}
