use axum::async_trait;
use axum::extract::{FromRequestParts, Request};
use axum::http::request::Parts;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use serde::Serialize;
use utoipa::ToSchema;

use super::classifier;
use super::principal::Principal;

pub const CAN_MODIFY_HEADER: &str = "x-can-modify";

/// Whether the presentation layer should offer create/edit/delete affordances.
///
/// Advisory only; enforcement lives in the role gate.
pub fn can_modify(principal: Option<&Principal>) -> bool {
    match principal {
        Some(principal) => !principal
            .role_candidates()
            .any(|label| classifier::is_read_only(Some(label))),
        None => true,
    }
}

/// Authorization state shared with the presentation layer for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct SharedProps {
    pub can_modify: bool,
}

impl SharedProps {
    pub fn for_principal(principal: Option<&Principal>) -> Self {
        Self {
            can_modify: can_modify(principal),
        }
    }
}

/// Computes [`SharedProps`] once per request, hands it to handlers through
/// the extensions and mirrors it in the `x-can-modify` response header.
pub async fn share_authorization(mut request: Request, next: Next) -> Response {
    let props = SharedProps::for_principal(request.extensions().get::<Principal>());
    request.extensions_mut().insert(props);

    let mut response = next.run(request).await;
    response.headers_mut().insert(
        CAN_MODIFY_HEADER,
        HeaderValue::from_static(if props.can_modify { "true" } else { "false" }),
    );
    response
}

#[async_trait]
impl<S> FromRequestParts<S> for SharedProps
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(props) = parts.extensions.get::<SharedProps>() {
            return Ok(*props);
        }
        Ok(SharedProps::for_principal(parts.extensions.get::<Principal>()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authz::principal::RoleRef;

    #[test]
    fn legacy_russian_label_is_read_only() {
        let principal = Principal::new(1).with_legacy_role("Заместитель акима");
        assert!(!can_modify(Some(&principal)));
    }

    #[test]
    fn any_candidate_field_counts() {
        let by_display = Principal::new(2).with_role(RoleRef::new(5, "region_head").with_display_name("Аким области"));
        assert!(!can_modify(Some(&by_display)));

        let by_name = Principal::new(3).with_role(RoleRef::new(6, "zamakim"));
        assert!(!can_modify(Some(&by_name)));
    }

    #[test]
    fn writers_and_anonymous_can_modify() {
        assert!(can_modify(None));
        assert!(can_modify(Some(&Principal::new(4))));
        let executor = Principal::new(5).with_role(RoleRef::new(7, "ispolnitel").with_display_name("Исполнитель"));
        assert!(can_modify(Some(&executor)));
    }
}
