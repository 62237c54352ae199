use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Region {
    pub id: i64,
    pub name: String,
    pub code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegionCreateRequest {
    #[schema(example = "Туркестанская область")]
    pub name: String,
    #[schema(example = "KZ-YUZ")]
    pub code: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegionUpdateRequest {
    pub name: Option<String>,
    pub code: Option<String>,
}
