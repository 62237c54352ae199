#![allow(dead_code)]

use anyhow::{Context, Result};
use axum::body::{self, Body};
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot`

use regional_invest::authz::RoutePolicy;
use regional_invest::jwt::JwtConfig;
use regional_invest::utils::hash_password;

pub const PASSWORD: &str = "password123";

pub struct TestApp {
    pub app: Router,
    pub pool: SqlitePool,
    // keeps the sqlite file alive for the test
    _dir: TempDir,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn message(&self) -> Option<&str> {
        self.body.get("message").and_then(Value::as_str)
    }
}

pub async fn spawn_app() -> Result<TestApp> {
    spawn_app_with_policy(RoutePolicy::default()).await
}

pub async fn spawn_app_with_policy(policy: RoutePolicy) -> Result<TestApp> {
    let dir = tempfile::tempdir().context("failed to create tempdir")?;
    let db_path = dir.path().join("test.db");
    let opts = SqliteConnectOptions::new()
        .filename(db_path.as_path())
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(opts).await?;

    // run migrations from crate migrations folder
    let migrator = sqlx::migrate::Migrator::new(std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations"))
        .await?;
    migrator.run(&pool).await?;

    std::env::set_var("JWT_SECRET", "test-secret");
    let app = regional_invest::create_app_with_policy(pool.clone(), policy).await?;

    Ok(TestApp { app, pool, _dir: dir })
}

pub async fn role_id(pool: &SqlitePool, name: &str) -> Result<i64> {
    sqlx::query_scalar("SELECT id FROM roles WHERE name = ?")
        .bind(name)
        .fetch_optional(pool)
        .await?
        .with_context(|| format!("role {name} not seeded"))
}

/// Insert a user with an optional normalized role and optional legacy role text.
pub async fn seed_user(pool: &SqlitePool, email: &str, role: Option<&str>, legacy_role: Option<&str>) -> Result<i64> {
    let role_id = match role {
        Some(name) => Some(role_id(pool, name).await?),
        None => None,
    };
    let now = chrono::Utc::now();

    let id = sqlx::query(
        "INSERT INTO users (name, email, password_hash, role, role_id, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(email.split('@').next().unwrap_or(email))
    .bind(email)
    .bind(hash_password(PASSWORD)?)
    .bind(legacy_role)
    .bind(role_id)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?
    .last_insert_rowid();

    Ok(id)
}

pub async fn seed_region(pool: &SqlitePool, name: &str) -> Result<i64> {
    let now = chrono::Utc::now();
    let id = sqlx::query("INSERT INTO regions (name, code, created_at, updated_at) VALUES (?, NULL, ?, ?)")
        .bind(name)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?
        .last_insert_rowid();
    Ok(id)
}

pub fn token_for(user_id: i64) -> Result<String> {
    Ok(JwtConfig::from_env()?.encode(user_id)?)
}

pub async fn token_for_role(pool: &SqlitePool, email: &str, role: &str) -> Result<String> {
    let id = seed_user(pool, email, Some(role), None).await?;
    token_for(id)
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Result<TestResponse> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let req = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))?,
        None => builder.body(Body::empty())?,
    };

    let resp = app.clone().oneshot(req).await?;
    let status = resp.status();
    let headers = resp.headers().clone();
    let body_bytes = body::to_bytes(resp.into_body(), 10_485_760).await?;
    let body = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes)
            .with_context(|| format!("non-JSON body: {}", String::from_utf8_lossy(&body_bytes)))?
    };

    Ok(TestResponse { status, headers, body })
}
