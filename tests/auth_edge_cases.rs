mod common;

use anyhow::{Context, Result};
use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{seed_user, send, spawn_app, token_for, PASSWORD};

#[tokio::test]
async fn auth_edge_cases() -> Result<()> {
    let t = spawn_app().await?;
    seed_user(&t.pool, "akim@example.kz", Some("akim"), None).await?;

    // 1. Login with wrong password
    let resp = send(
        &t.app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": "akim@example.kz", "password": "wrongpassword" })),
    )
    .await?;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED, "Should fail with unauthorized for wrong password");

    // 2. Login with non-existent email
    let resp = send(
        &t.app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": "nobody@example.kz", "password": PASSWORD })),
    )
    .await?;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED, "Should fail with unauthorized for non-existent user");

    // 3. Successful login reports the read-only flag up front
    let resp = send(
        &t.app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": "akim@example.kz", "password": PASSWORD })),
    )
    .await?;
    assert_eq!(resp.status, StatusCode::OK, "login failed: {}", resp.body);
    assert_eq!(resp.body["can_modify"], false);
    let token = resp.body["token"].as_str().context("missing token")?.to_string();

    // 4. Logout is not gated even though it is a POST from a read-only role
    let resp = send(&t.app, Method::POST, "/auth/logout", Some(&token), None).await?;
    assert_eq!(resp.status, StatusCode::OK);

    // 5. /auth/me without token
    let resp = send(&t.app, Method::GET, "/auth/me", None, None).await?;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED, "Should fail with unauthorized for missing token");
    assert_eq!(resp.headers.get("x-can-modify").and_then(|v| v.to_str().ok()), Some("true"));

    Ok(())
}

#[tokio::test]
async fn me_reports_role_and_flag() -> Result<()> {
    let t = spawn_app().await?;
    let id = seed_user(&t.pool, "isp@example.kz", Some("ispolnitel"), None).await?;
    let token = token_for(id)?;

    let resp = send(&t.app, Method::GET, "/auth/me", Some(&token), None).await?;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["user"]["email"], "isp@example.kz");
    assert_eq!(resp.body["role_name"], "ispolnitel");
    assert_eq!(resp.body["can_modify"], true);

    Ok(())
}

#[tokio::test]
async fn deleted_user_token_is_anonymous() -> Result<()> {
    let t = spawn_app().await?;
    let id = seed_user(&t.pool, "gone@example.kz", Some("admin"), None).await?;
    let token = token_for(id)?;

    sqlx::query("UPDATE users SET deleted_at = ? WHERE id = ?")
        .bind(chrono::Utc::now())
        .bind(id)
        .execute(&t.pool)
        .await?;

    let resp = send(&t.app, Method::GET, "/auth/me", Some(&token), None).await?;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);

    let resp = send(
        &t.app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": "gone@example.kz", "password": PASSWORD })),
    )
    .await?;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);

    Ok(())
}
