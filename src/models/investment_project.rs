use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct InvestmentProject {
    pub id: i64,
    pub region_id: Option<i64>,
    pub name: String,
    pub investor: Option<String>,
    /// Total cost in millions of tenge.
    pub total_cost: Option<f64>,
    pub status: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct InvestmentProjectCreateRequest {
    pub region_id: Option<i64>,
    #[schema(example = "Cement plant, phase 2")]
    pub name: String,
    #[schema(example = "Standard Cement LLP")]
    pub investor: Option<String>,
    #[schema(example = 12500.0)]
    pub total_cost: Option<f64>,
    #[schema(example = "planned")]
    pub status: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct InvestmentProjectUpdateRequest {
    pub region_id: Option<i64>,
    pub name: Option<String>,
    pub investor: Option<String>,
    pub total_cost: Option<f64>,
    pub status: Option<String>,
    pub description: Option<String>,
}
