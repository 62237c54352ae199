//! Role administration.
//!
//! Role machine names drive the role gate, so renaming a role can move its
//! users between role classes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use sqlx::SqlitePool;

use crate::app::AppState;
use crate::authz::SharedProps;
use crate::errors::{AppError, AppResult};
use crate::jwt::AuthUser;
use crate::models::role::{Role, RoleCreateRequest, RoleUpdateRequest};
use crate::models::{Listing, RoleListing};
use crate::utils::utc_now;

const ROLE_COLUMNS: &str = "id, name, display_name, created_at, updated_at";

#[utoipa::path(
    get,
    path = "/roles",
    tag = "Roles",
    responses(
        (status = 200, description = "List of roles", body = RoleListing),
        (status = 403, description = "Denied by the role gate")
    ),
    security(("bearerAuth" = []))
)]
pub async fn index(
    State(state): State<AppState>,
    _auth: AuthUser,
    shared: SharedProps,
) -> AppResult<Json<Listing<Role>>> {
    let roles = sqlx::query_as::<_, Role>(&format!("SELECT {ROLE_COLUMNS} FROM roles ORDER BY name"))
        .fetch_all(&state.pool)
        .await?;

    Ok(Json(Listing {
        data: roles,
        can_modify: shared.can_modify,
    }))
}

#[utoipa::path(
    post,
    path = "/roles",
    tag = "Roles",
    request_body = RoleCreateRequest,
    responses(
        (status = 201, description = "Role created", body = Role),
        (status = 409, description = "Role name already exists"),
        (status = 403, description = "Denied by the role gate")
    ),
    security(("bearerAuth" = []))
)]
pub async fn store(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<RoleCreateRequest>,
) -> AppResult<(StatusCode, Json<Role>)> {
    let name = req.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::bad_request("role name must not be empty"));
    }
    ensure_name_available(&state.pool, &name, None).await?;

    let now = utc_now();
    let id = sqlx::query("INSERT INTO roles (name, display_name, created_at, updated_at) VALUES (?, ?, ?, ?)")
        .bind(&name)
        .bind(&req.display_name)
        .bind(now)
        .bind(now)
        .execute(&state.pool)
        .await?
        .last_insert_rowid();

    tracing::info!(user_id = auth.user_id, role_id = id, role = %name, "role created");

    let role = fetch_role(&state.pool, id).await?;
    Ok((StatusCode::CREATED, Json(role)))
}

#[utoipa::path(
    get,
    path = "/roles/{id}",
    tag = "Roles",
    params(("id" = i64, Path, description = "Role id")),
    responses(
        (status = 200, description = "Role detail", body = Role),
        (status = 403, description = "Denied by the role gate")
    ),
    security(("bearerAuth" = []))
)]
pub async fn show(State(state): State<AppState>, _auth: AuthUser, Path(id): Path<i64>) -> AppResult<Json<Role>> {
    Ok(Json(fetch_role(&state.pool, id).await?))
}

#[utoipa::path(
    put,
    path = "/roles/{id}",
    tag = "Roles",
    params(("id" = i64, Path, description = "Role id")),
    request_body = RoleUpdateRequest,
    responses(
        (status = 200, description = "Role updated", body = Role),
        (status = 403, description = "Denied by the role gate")
    ),
    security(("bearerAuth" = []))
)]
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<RoleUpdateRequest>,
) -> AppResult<Json<Role>> {
    let mut role = fetch_role(&state.pool, id).await?;

    if let Some(name) = req.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::bad_request("role name must not be empty"));
        }
        ensure_name_available(&state.pool, &name, Some(id)).await?;
        role.name = name;
    }
    if req.display_name.is_some() {
        role.display_name = req.display_name;
    }
    role.updated_at = utc_now();

    sqlx::query("UPDATE roles SET name = ?, display_name = ?, updated_at = ? WHERE id = ?")
        .bind(&role.name)
        .bind(&role.display_name)
        .bind(role.updated_at)
        .bind(role.id)
        .execute(&state.pool)
        .await?;

    tracing::info!(user_id = auth.user_id, role_id = id, role = %role.name, "role updated");
    Ok(Json(role))
}

#[utoipa::path(
    delete,
    path = "/roles/{id}",
    tag = "Roles",
    params(("id" = i64, Path, description = "Role id")),
    responses(
        (status = 204, description = "Role deleted"),
        (status = 403, description = "Denied by the role gate")
    ),
    security(("bearerAuth" = []))
)]
pub async fn destroy(State(state): State<AppState>, auth: AuthUser, Path(id): Path<i64>) -> AppResult<StatusCode> {
    let affected = sqlx::query("DELETE FROM roles WHERE id = ?")
        .bind(id)
        .execute(&state.pool)
        .await?;

    if affected.rows_affected() == 0 {
        return Err(AppError::not_found("role not found"));
    }

    tracing::info!(user_id = auth.user_id, role_id = id, "role deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn fetch_role(pool: &SqlitePool, id: i64) -> AppResult<Role> {
    sqlx::query_as::<_, Role>(&format!("SELECT {ROLE_COLUMNS} FROM roles WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::not_found("role not found"))
}

async fn ensure_name_available(pool: &SqlitePool, name: &str, except: Option<i64>) -> AppResult<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(1) FROM roles WHERE name = ? AND id != ?")
        .bind(name)
        .bind(except.unwrap_or(-1))
        .fetch_one(pool)
        .await?;

    if count > 0 {
        return Err(AppError::conflict("role name already exists"));
    }
    Ok(())
}
