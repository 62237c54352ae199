use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

pub mod investment_project;
pub mod region;
pub mod role;
pub mod user;

use investment_project::InvestmentProject;
use region::Region;
use role::Role;
use user::User;

/// Listing envelope: rows plus the caller's `can_modify` flag.
#[derive(Debug, Serialize, ToSchema)]
#[aliases(
    RegionListing = Listing<Region>,
    InvestmentProjectListing = Listing<InvestmentProject>,
    UserListing = Listing<User>,
    RoleListing = Listing<Role>
)]
pub struct Listing<T> {
    pub data: Vec<T>,
    pub can_modify: bool,
}

/// Keeps an explicit `null` apart from an absent field: absent stays `None`
/// (via `#[serde(default)]`), `null` becomes `Some(None)`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
