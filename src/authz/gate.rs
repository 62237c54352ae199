use axum::extract::{MatchedPath, Request, State};
use axum::http::Method;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use super::policy::RoutePolicy;
use super::principal::Principal;
use crate::app::AppState;
use crate::errors::AppError;

pub const RESOURCE_DENIED_MESSAGE: &str = "У вас нет доступа к этому разделу.";
pub const WRITE_DENIED_MESSAGE: &str = "У вас нет прав на изменение данных.";

/// Outcome of gating one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    DenyResource,
    DenyWrite,
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allow)
    }

    pub fn message(&self) -> Option<&'static str> {
        match self {
            AccessDecision::Allow => None,
            AccessDecision::DenyResource => Some(RESOURCE_DENIED_MESSAGE),
            AccessDecision::DenyWrite => Some(WRITE_DENIED_MESSAGE),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccessDecision::Allow => "allow",
            AccessDecision::DenyResource => "deny_resource",
            AccessDecision::DenyWrite => "deny_write",
        }
    }
}

/// Decide whether a request may proceed.
///
/// Evaluation order:
/// 1. anonymous -> allow (authentication is enforced elsewhere)
/// 2. read-only class: blocked resource -> deny_resource, write action -> deny_write
/// 3. limited class: admin-only resource -> deny_resource
/// 4. allow
pub fn evaluate(
    policy: &RoutePolicy,
    principal: Option<&Principal>,
    route: Option<&str>,
    method: &Method,
) -> AccessDecision {
    let Some(principal) = principal else {
        return AccessDecision::Allow;
    };
    let classes = principal.classes();

    if classes.read_only {
        if policy.blocks_read_only(route) {
            return AccessDecision::DenyResource;
        }
        if policy.is_write_action(route, method) {
            return AccessDecision::DenyWrite;
        }
    }

    if classes.limited && policy.blocks_limited(route) {
        return AccessDecision::DenyResource;
    }

    AccessDecision::Allow
}

/// Route-layer middleware enforcing [`evaluate`] before any handler runs.
///
/// Must sit inside the router (`route_layer`) so the matched path is known,
/// and after `authenticate` so the principal is in the extensions.
pub async fn check_role_access(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let decision = {
        let method = request.method();
        let route = request
            .extensions()
            .get::<MatchedPath>()
            .and_then(|path| state.route_names.resolve(method, path.as_str()));
        let principal = request.extensions().get::<Principal>();
        let decision = evaluate(&state.policy, principal, route, method);

        match principal {
            Some(principal) if !decision.is_allowed() => {
                tracing::warn!(
                    user_id = principal.user_id,
                    role = principal.role_name().unwrap_or("-"),
                    route = route.unwrap_or("-"),
                    method = %method,
                    decision = decision.as_str(),
                    "request rejected by role gate"
                );
            }
            None => {
                tracing::debug!(route = route.unwrap_or("-"), "anonymous request passed role gate");
            }
            _ => {}
        }

        decision
    };

    match decision.message() {
        Some(message) => AppError::forbidden(message).into_response(),
        None => next.run(request).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authz::principal::RoleRef;

    fn with_role(name: &str) -> Principal {
        Principal::new(1).with_role(RoleRef::new(10, name))
    }

    #[test]
    fn akim_is_blocked_from_users() {
        let policy = RoutePolicy::default();
        let decision = evaluate(&policy, Some(&with_role("akim")), Some("users.index"), &Method::GET);
        assert_eq!(decision, AccessDecision::DenyResource);
        assert_eq!(decision.message(), Some(RESOURCE_DENIED_MESSAGE));
    }

    #[test]
    fn akim_may_view_a_region() {
        let policy = RoutePolicy::default();
        let decision = evaluate(&policy, Some(&with_role("akim")), Some("regions.show"), &Method::GET);
        assert_eq!(decision, AccessDecision::Allow);
    }

    #[test]
    fn akim_cannot_write() {
        let policy = RoutePolicy::default();
        let akim = with_role("akim");
        let decision = evaluate(&policy, Some(&akim), Some("investment-projects.update"), &Method::PUT);
        assert_eq!(decision, AccessDecision::DenyWrite);
        assert_eq!(decision.message(), Some(WRITE_DENIED_MESSAGE));

        // unnamed route still hits the method check
        assert_eq!(evaluate(&policy, Some(&akim), None, &Method::POST), AccessDecision::DenyWrite);
        assert_eq!(
            evaluate(&policy, Some(&akim), Some("investment-projects.index"), &Method::GET),
            AccessDecision::Allow
        );
    }

    #[test]
    fn allow_listed_route_still_blocks_writes_for_read_only() {
        let policy = RoutePolicy::default();
        let decision = evaluate(&policy, Some(&with_role("zamakim")), Some("regions.show"), &Method::DELETE);
        assert_eq!(decision, AccessDecision::DenyWrite);
    }

    #[test]
    fn executor_blocked_from_admin_only() {
        let policy = RoutePolicy::default();
        let executor = with_role("ispolnitel");
        assert_eq!(
            evaluate(&policy, Some(&executor), Some("roles.index"), &Method::GET),
            AccessDecision::DenyResource
        );
        assert_eq!(
            evaluate(&policy, Some(&executor), Some("investment-projects.store"), &Method::POST),
            AccessDecision::Allow
        );
        assert_eq!(
            evaluate(&policy, Some(&with_role("baskarma")), Some("users.destroy"), &Method::DELETE),
            AccessDecision::DenyResource
        );
    }

    #[test]
    fn anonymous_and_admin_pass() {
        let policy = RoutePolicy::default();
        assert_eq!(evaluate(&policy, None, Some("users.index"), &Method::DELETE), AccessDecision::Allow);
        assert_eq!(
            evaluate(&policy, Some(&with_role("admin")), Some("roles.destroy"), &Method::DELETE),
            AccessDecision::Allow
        );
        assert_eq!(
            evaluate(&policy, Some(&Principal::new(2)), Some("users.index"), &Method::GET),
            AccessDecision::Allow
        );
    }

    #[test]
    fn legacy_read_only_label_is_enforced() {
        let policy = RoutePolicy::default();
        let legacy = Principal::new(3).with_legacy_role("Заместитель акима");
        assert_eq!(
            evaluate(&policy, Some(&legacy), Some("investment-projects.store"), &Method::POST),
            AccessDecision::DenyWrite
        );
    }
}
