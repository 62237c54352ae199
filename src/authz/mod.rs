//! Authorization module - role gate and presentation flag
//!
//! This module implements request gating by role class:
//! - Role classification (read-only oversight, limited execution, unrestricted)
//! - A static route policy table keyed by logical route names
//! - A route-layer middleware that rejects with 403 before handlers run
//! - The `can_modify` projection shared with the presentation layer

mod classifier;
mod gate;
mod policy;
mod principal;
mod projector;
mod route_names;

pub use classifier::{is_limited, is_read_only, normalize, RoleClasses, CYRILLIC_MARKER, LIMITED_ROLES, READ_ONLY_MARKERS};
pub use gate::{check_role_access, evaluate, AccessDecision, RESOURCE_DENIED_MESSAGE, WRITE_DENIED_MESSAGE};
pub use policy::{is_safe_method, RoutePolicy};
pub use principal::{Principal, PrincipalStore, RoleRef, SqlitePrincipalStore};
pub use projector::{can_modify, share_authorization, SharedProps, CAN_MODIFY_HEADER};
pub use route_names::{NamedRouter, RouteNames};

/// Well-known role machine names
pub mod roles {
    pub const AKIM: &str = "akim";
    pub const ZAMAKIM: &str = "zamakim";
    pub const ISPOLNITEL: &str = "ispolnitel";
    pub const BASKARMA: &str = "baskarma";
}
