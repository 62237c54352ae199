use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use sqlx::SqlitePool;

use crate::app::AppState;
use crate::authz::SharedProps;
use crate::errors::{AppError, AppResult};
use crate::jwt::AuthUser;
use crate::models::region::{Region, RegionCreateRequest, RegionUpdateRequest};
use crate::models::{Listing, RegionListing};
use crate::utils::utc_now;

const REGION_COLUMNS: &str = "id, name, code, created_at, updated_at";

#[utoipa::path(
    get,
    path = "/regions",
    tag = "Regions",
    responses(
        (status = 200, description = "List regions", body = RegionListing),
        (status = 403, description = "Denied by the role gate")
    ),
    security(("bearerAuth" = []))
)]
pub async fn index(
    State(state): State<AppState>,
    _auth: AuthUser,
    shared: SharedProps,
) -> AppResult<Json<Listing<Region>>> {
    let regions = sqlx::query_as::<_, Region>(&format!("SELECT {REGION_COLUMNS} FROM regions ORDER BY name"))
        .fetch_all(&state.pool)
        .await?;

    Ok(Json(Listing {
        data: regions,
        can_modify: shared.can_modify,
    }))
}

#[utoipa::path(
    post,
    path = "/regions",
    tag = "Regions",
    request_body = RegionCreateRequest,
    responses(
        (status = 201, description = "Region created", body = Region),
        (status = 403, description = "Denied by the role gate")
    ),
    security(("bearerAuth" = []))
)]
pub async fn store(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<RegionCreateRequest>,
) -> AppResult<(StatusCode, Json<Region>)> {
    if payload.name.trim().is_empty() {
        return Err(AppError::bad_request("region name must not be empty"));
    }

    let now = utc_now();
    let id = sqlx::query("INSERT INTO regions (name, code, created_at, updated_at) VALUES (?, ?, ?, ?)")
        .bind(&payload.name)
        .bind(&payload.code)
        .bind(now)
        .bind(now)
        .execute(&state.pool)
        .await?
        .last_insert_rowid();

    tracing::info!(user_id = auth.user_id, region_id = id, "region created");

    let region = fetch_region(&state.pool, id).await?;
    Ok((StatusCode::CREATED, Json(region)))
}

#[utoipa::path(
    get,
    path = "/regions/{id}",
    tag = "Regions",
    params(("id" = i64, Path, description = "Region id")),
    responses(
        (status = 200, description = "Region detail", body = Region),
        (status = 403, description = "Denied by the role gate")
    ),
    security(("bearerAuth" = []))
)]
pub async fn show(State(state): State<AppState>, _auth: AuthUser, Path(id): Path<i64>) -> AppResult<Json<Region>> {
    Ok(Json(fetch_region(&state.pool, id).await?))
}

#[utoipa::path(
    put,
    path = "/regions/{id}",
    tag = "Regions",
    params(("id" = i64, Path, description = "Region id")),
    request_body = RegionUpdateRequest,
    responses(
        (status = 200, description = "Region updated", body = Region),
        (status = 403, description = "Denied by the role gate")
    ),
    security(("bearerAuth" = []))
)]
pub async fn update(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<RegionUpdateRequest>,
) -> AppResult<Json<Region>> {
    let mut region = fetch_region(&state.pool, id).await?;

    if let Some(name) = payload.name {
        if name.trim().is_empty() {
            return Err(AppError::bad_request("region name must not be empty"));
        }
        region.name = name;
    }
    if payload.code.is_some() {
        region.code = payload.code;
    }
    region.updated_at = utc_now();

    sqlx::query("UPDATE regions SET name = ?, code = ?, updated_at = ? WHERE id = ?")
        .bind(&region.name)
        .bind(&region.code)
        .bind(region.updated_at)
        .bind(region.id)
        .execute(&state.pool)
        .await?;

    Ok(Json(region))
}

#[utoipa::path(
    delete,
    path = "/regions/{id}",
    tag = "Regions",
    params(("id" = i64, Path, description = "Region id")),
    responses(
        (status = 204, description = "Region deleted"),
        (status = 403, description = "Denied by the role gate")
    ),
    security(("bearerAuth" = []))
)]
pub async fn destroy(State(state): State<AppState>, auth: AuthUser, Path(id): Path<i64>) -> AppResult<StatusCode> {
    let affected = sqlx::query("DELETE FROM regions WHERE id = ?")
        .bind(id)
        .execute(&state.pool)
        .await?;

    if affected.rows_affected() == 0 {
        return Err(AppError::not_found("region not found"));
    }

    tracing::info!(user_id = auth.user_id, region_id = id, "region deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn fetch_region(pool: &SqlitePool, id: i64) -> AppResult<Region> {
    sqlx::query_as::<_, Region>(&format!("SELECT {REGION_COLUMNS} FROM regions WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::not_found("region not found"))
}
