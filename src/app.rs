use std::sync::Arc;

use axum::http::Method;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use axum::Router;
use sqlx::SqlitePool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::authz::{
    check_role_access, share_authorization, NamedRouter, PrincipalStore, RouteNames, RoutePolicy,
    SqlitePrincipalStore,
};
use crate::errors::AppError;
use crate::jwt::{authenticate, JwtConfig};
use crate::routes::{auth, health, investment_projects, regions, roles, users};

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub jwt: Arc<JwtConfig>,
    pub policy: Arc<RoutePolicy>,
    pub route_names: Arc<RouteNames>,
    pub principals: Arc<dyn PrincipalStore>,
}

impl AppState {
    pub fn new(pool: SqlitePool, jwt: JwtConfig, policy: RoutePolicy, route_names: RouteNames) -> Self {
        let principals = Arc::new(SqlitePrincipalStore::new(pool.clone()));
        Self {
            pool,
            jwt: Arc::new(jwt),
            policy: Arc::new(policy),
            route_names: Arc::new(route_names),
            principals,
        }
    }
}

/// Routes behind the role gate, each with its logical name.
fn gated_routes() -> NamedRouter<AppState> {
    NamedRouter::new()
        .get("/regions", "regions.index", regions::index)
        .post("/regions", "regions.store", regions::store)
        .get("/regions/:id", "regions.show", regions::show)
        .update("/regions/:id", "regions.update", regions::update)
        .delete("/regions/:id", "regions.destroy", regions::destroy)
        .get("/investment-projects", "investment-projects.index", investment_projects::index)
        .post("/investment-projects", "investment-projects.store", investment_projects::store)
        .get("/investment-projects/:id", "investment-projects.show", investment_projects::show)
        .update("/investment-projects/:id", "investment-projects.update", investment_projects::update)
        .delete("/investment-projects/:id", "investment-projects.destroy", investment_projects::destroy)
        .get("/users", "users.index", users::index)
        .post("/users", "users.store", users::store)
        .get("/users/:id", "users.show", users::show)
        .update("/users/:id", "users.update", users::update)
        .delete("/users/:id", "users.destroy", users::destroy)
        .get("/roles", "roles.index", roles::index)
        .post("/roles", "roles.store", roles::store)
        .get("/roles/:id", "roles.show", roles::show)
        .update("/roles/:id", "roles.update", roles::update)
        .delete("/roles/:id", "roles.destroy", roles::destroy)
}

pub async fn create_app(pool: SqlitePool) -> Result<Router, AppError> {
    create_app_with_policy(pool, RoutePolicy::default()).await
}

pub async fn create_app_with_policy(pool: SqlitePool, policy: RoutePolicy) -> Result<Router, AppError> {
    let jwt_config = JwtConfig::from_env()?;
    let (gated, route_names) = gated_routes().into_parts();
    let state = AppState::new(pool, jwt_config, policy, route_names);

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_origin(Any)
        .allow_headers(Any);

    let auth_routes = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        .route("/auth/logout", post(auth::logout));

    // route_layer: the gate needs the matched path, and must not turn 404s into 403s
    let gated = gated.route_layer(from_fn_with_state(state.clone(), check_role_access));

    tracing::debug!(routes = state.route_names.len(), "registered gated routes");

    let router = Router::new()
        .route("/api/health", get(health::health))
        .merge(auth_routes)
        .merge(gated)
        .layer(from_fn(share_authorization))
        .layer(from_fn_with_state(state.clone(), authenticate))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(router)
}
