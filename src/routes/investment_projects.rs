use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use sqlx::SqlitePool;

use crate::app::AppState;
use crate::authz::SharedProps;
use crate::errors::{AppError, AppResult};
use crate::jwt::AuthUser;
use crate::models::investment_project::{
    InvestmentProject, InvestmentProjectCreateRequest, InvestmentProjectUpdateRequest,
};
use crate::models::{InvestmentProjectListing, Listing};
use crate::utils::utc_now;

const DEFAULT_STATUS: &str = "planned";
const PROJECT_COLUMNS: &str =
    "id, region_id, name, investor, total_cost, status, description, created_at, updated_at";

#[utoipa::path(
    get,
    path = "/investment-projects",
    tag = "Investment projects",
    responses(
        (status = 200, description = "List investment projects", body = InvestmentProjectListing),
        (status = 403, description = "Denied by the role gate")
    ),
    security(("bearerAuth" = []))
)]
pub async fn index(
    State(state): State<AppState>,
    _auth: AuthUser,
    shared: SharedProps,
) -> AppResult<Json<Listing<InvestmentProject>>> {
    let projects = sqlx::query_as::<_, InvestmentProject>(&format!(
        "SELECT {PROJECT_COLUMNS} FROM investment_projects ORDER BY created_at DESC, id DESC"
    ))
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(Listing {
        data: projects,
        can_modify: shared.can_modify,
    }))
}

#[utoipa::path(
    post,
    path = "/investment-projects",
    tag = "Investment projects",
    request_body = InvestmentProjectCreateRequest,
    responses(
        (status = 201, description = "Investment project created", body = InvestmentProject),
        (status = 403, description = "Denied by the role gate")
    ),
    security(("bearerAuth" = []))
)]
pub async fn store(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<InvestmentProjectCreateRequest>,
) -> AppResult<(StatusCode, Json<InvestmentProject>)> {
    if payload.name.trim().is_empty() {
        return Err(AppError::bad_request("project name must not be empty"));
    }
    if let Some(region_id) = payload.region_id {
        ensure_region_exists(&state.pool, region_id).await?;
    }

    let now = utc_now();
    let status = payload.status.unwrap_or_else(|| DEFAULT_STATUS.to_string());

    let id = sqlx::query(
        "INSERT INTO investment_projects (region_id, name, investor, total_cost, status, description, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(payload.region_id)
    .bind(&payload.name)
    .bind(&payload.investor)
    .bind(payload.total_cost)
    .bind(&status)
    .bind(&payload.description)
    .bind(now)
    .bind(now)
    .execute(&state.pool)
    .await?
    .last_insert_rowid();

    tracing::info!(user_id = auth.user_id, project_id = id, "investment project created");

    let project = fetch_project(&state.pool, id).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

#[utoipa::path(
    get,
    path = "/investment-projects/{id}",
    tag = "Investment projects",
    params(("id" = i64, Path, description = "Investment project id")),
    responses(
        (status = 200, description = "Investment project detail", body = InvestmentProject),
        (status = 403, description = "Denied by the role gate")
    ),
    security(("bearerAuth" = []))
)]
pub async fn show(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<InvestmentProject>> {
    Ok(Json(fetch_project(&state.pool, id).await?))
}

#[utoipa::path(
    put,
    path = "/investment-projects/{id}",
    tag = "Investment projects",
    params(("id" = i64, Path, description = "Investment project id")),
    request_body = InvestmentProjectUpdateRequest,
    responses(
        (status = 200, description = "Investment project updated", body = InvestmentProject),
        (status = 403, description = "Denied by the role gate")
    ),
    security(("bearerAuth" = []))
)]
pub async fn update(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<InvestmentProjectUpdateRequest>,
) -> AppResult<Json<InvestmentProject>> {
    let mut project = fetch_project(&state.pool, id).await?;

    if let Some(region_id) = payload.region_id {
        ensure_region_exists(&state.pool, region_id).await?;
        project.region_id = Some(region_id);
    }
    if let Some(name) = payload.name {
        if name.trim().is_empty() {
            return Err(AppError::bad_request("project name must not be empty"));
        }
        project.name = name;
    }
    if payload.investor.is_some() {
        project.investor = payload.investor;
    }
    if payload.total_cost.is_some() {
        project.total_cost = payload.total_cost;
    }
    if let Some(status) = payload.status {
        project.status = status;
    }
    if payload.description.is_some() {
        project.description = payload.description;
    }
    project.updated_at = utc_now();

    sqlx::query(
        "UPDATE investment_projects SET region_id = ?, name = ?, investor = ?, total_cost = ?, status = ?, description = ?, updated_at = ? WHERE id = ?",
    )
    .bind(project.region_id)
    .bind(&project.name)
    .bind(&project.investor)
    .bind(project.total_cost)
    .bind(&project.status)
    .bind(&project.description)
    .bind(project.updated_at)
    .bind(project.id)
    .execute(&state.pool)
    .await?;

    Ok(Json(project))
}

#[utoipa::path(
    delete,
    path = "/investment-projects/{id}",
    tag = "Investment projects",
    params(("id" = i64, Path, description = "Investment project id")),
    responses(
        (status = 204, description = "Investment project deleted"),
        (status = 403, description = "Denied by the role gate")
    ),
    security(("bearerAuth" = []))
)]
pub async fn destroy(State(state): State<AppState>, auth: AuthUser, Path(id): Path<i64>) -> AppResult<StatusCode> {
    let affected = sqlx::query("DELETE FROM investment_projects WHERE id = ?")
        .bind(id)
        .execute(&state.pool)
        .await?;

    if affected.rows_affected() == 0 {
        return Err(AppError::not_found("investment project not found"));
    }

    tracing::info!(user_id = auth.user_id, project_id = id, "investment project deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn fetch_project(pool: &SqlitePool, id: i64) -> AppResult<InvestmentProject> {
    sqlx::query_as::<_, InvestmentProject>(&format!(
        "SELECT {PROJECT_COLUMNS} FROM investment_projects WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::not_found("investment project not found"))
}

async fn ensure_region_exists(pool: &SqlitePool, region_id: i64) -> AppResult<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(1) FROM regions WHERE id = ?")
        .bind(region_id)
        .fetch_one(pool)
        .await?;

    if count == 0 {
        return Err(AppError::bad_request("unknown region"));
    }
    Ok(())
}
