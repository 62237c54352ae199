use async_trait::async_trait;
use sqlx::{FromRow, SqlitePool};

use super::classifier::RoleClasses;
use crate::errors::AppResult;

/// Normalized role reference attached to a principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRef {
    pub id: i64,
    /// Machine name, e.g. `akim`, `ispolnitel`, `admin`.
    pub name: String,
    pub display_name: Option<String>,
}

impl RoleRef {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            display_name: None,
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }
}

/// Principal represents the authenticated user for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i64,
    pub name: String,
    /// Free-text role column on the user row.
    pub legacy_role: Option<String>,
    pub role: Option<RoleRef>,
}

impl Principal {
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            name: String::new(),
            legacy_role: None,
            role: None,
        }
    }

    pub fn with_role(mut self, role: RoleRef) -> Self {
        self.role = Some(role);
        self
    }

    pub fn with_legacy_role(mut self, role: impl Into<String>) -> Self {
        self.legacy_role = Some(role.into());
        self
    }

    /// Machine name of the normalized role, if one is assigned.
    pub fn role_name(&self) -> Option<&str> {
        self.role.as_ref().map(|role| role.name.as_str())
    }

    /// Every non-empty role label: legacy text, role machine name, role display name.
    pub fn role_candidates(&self) -> impl Iterator<Item = &str> {
        let role = self.role.as_ref();
        [
            self.legacy_role.as_deref(),
            role.map(|r| r.name.as_str()),
            role.and_then(|r| r.display_name.as_deref()),
        ]
        .into_iter()
        .flatten()
        .filter(|label| !label.trim().is_empty())
    }

    pub fn classes(&self) -> RoleClasses {
        RoleClasses::of(self)
    }
}

/// Source of principals for authenticated requests.
#[async_trait]
pub trait PrincipalStore: Send + Sync {
    /// Load the principal for a user id; `None` when the user is unknown or deleted.
    async fn find(&self, user_id: i64) -> AppResult<Option<Principal>>;
}

#[derive(Debug, FromRow)]
struct PrincipalRow {
    id: i64,
    name: String,
    role: Option<String>,
    role_id: Option<i64>,
    role_name: Option<String>,
    role_display_name: Option<String>,
}

impl From<PrincipalRow> for Principal {
    fn from(row: PrincipalRow) -> Self {
        let role = match (row.role_id, row.role_name) {
            (Some(id), Some(name)) => Some(RoleRef {
                id,
                name,
                display_name: row.role_display_name,
            }),
            _ => None,
        };

        Principal {
            user_id: row.id,
            name: row.name,
            legacy_role: row.role,
            role,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SqlitePrincipalStore {
    pool: SqlitePool,
}

impl SqlitePrincipalStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PrincipalStore for SqlitePrincipalStore {
    async fn find(&self, user_id: i64) -> AppResult<Option<Principal>> {
        let row = sqlx::query_as::<_, PrincipalRow>(
            "SELECT u.id, u.name, u.role, r.id AS role_id, r.name AS role_name, r.display_name AS role_display_name \
             FROM users u LEFT JOIN roles r ON r.id = u.role_id \
             WHERE u.id = ? AND u.deleted_at IS NULL",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Principal::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidates_skip_empty_fields() {
        let principal = Principal::new(1)
            .with_legacy_role("  ")
            .with_role(RoleRef::new(2, "akim").with_display_name("Аким"));

        let candidates: Vec<&str> = principal.role_candidates().collect();
        assert_eq!(candidates, vec!["akim", "Аким"]);
    }

    #[test]
    fn no_role_means_no_candidates() {
        let principal = Principal::new(1);
        assert_eq!(principal.role_candidates().count(), 0);
        assert_eq!(principal.role_name(), None);
    }
}
