use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::openapi::{Components, Server};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::{authz, models, routes};

#[derive(OpenApi)]
#[openapi(
	paths(
		routes::health::health,
		routes::auth::login,
		routes::auth::me,
		routes::auth::logout,
		routes::regions::index,
		routes::regions::store,
		routes::regions::show,
		routes::regions::update,
		routes::regions::destroy,
		routes::investment_projects::index,
		routes::investment_projects::store,
		routes::investment_projects::show,
		routes::investment_projects::update,
		routes::investment_projects::destroy,
		routes::users::index,
		routes::users::store,
		routes::users::show,
		routes::users::update,
		routes::users::destroy,
		routes::roles::index,
		routes::roles::store,
		routes::roles::show,
		routes::roles::update,
		routes::roles::destroy
	),
	components(
		schemas(
			authz::SharedProps,
			models::RegionListing,
			models::InvestmentProjectListing,
			models::UserListing,
			models::RoleListing,
			models::user::User,
			models::user::AuthResponse,
			models::user::MeResponse,
			models::user::LoginRequest,
			models::user::UserCreateRequest,
			models::user::UserUpdateRequest,
			models::role::Role,
			models::role::RoleCreateRequest,
			models::role::RoleUpdateRequest,
			models::region::Region,
			models::region::RegionCreateRequest,
			models::region::RegionUpdateRequest,
			models::investment_project::InvestmentProject,
			models::investment_project::InvestmentProjectCreateRequest,
			models::investment_project::InvestmentProjectUpdateRequest,
			routes::health::HealthResponse,
			routes::auth::MessageResponse
		)
	),
	modifiers(&BearerAuth),
	tags(
		(name = "Auth", description = "Authentication endpoints"),
		(name = "Regions", description = "Regions (admin only; read-only roles may open a single region)"),
		(name = "Investment projects", description = "Regional investment projects"),
		(name = "Users", description = "User administration"),
		(name = "Roles", description = "Role administration"),
		(name = "Health", description = "Service health")
	)
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
	fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
		let components = openapi.components.get_or_insert_with(Components::new);
		components.add_security_scheme(
			"bearerAuth",
			SecurityScheme::Http(
				HttpBuilder::new()
					.scheme(HttpAuthScheme::Bearer)
					.bearer_format("JWT")
					.build(),
			),
		);
	}
}

pub fn build_openapi(port: u16) -> utoipa::openapi::OpenApi {
	let mut doc = ApiDoc::openapi();
	doc.servers = Some(vec![Server::new(format!("http://localhost:{port}"))]);
	doc
}

/// Swagger UI at `/docs`, document at `/api-docs/openapi.json`.
pub fn swagger_routes(doc: utoipa::openapi::OpenApi) -> Router {
	SwaggerUi::new("/docs")
		.url("/api-docs/openapi.json", doc)
		.into()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn document_lists_gated_routes_and_bearer_scheme() {
		let doc = serde_json::to_value(build_openapi(8000)).unwrap();

		assert!(doc["paths"].get("/regions/{id}").is_some());
		assert!(doc["paths"].get("/investment-projects").is_some());
		assert_eq!(doc["components"]["securitySchemes"]["bearerAuth"]["scheme"], "bearer");
		assert_eq!(doc["servers"][0]["url"], "http://localhost:8000");
	}
}
