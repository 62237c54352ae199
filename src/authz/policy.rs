use axum::http::Method;

/// Static route policy table.
///
/// Built once at startup and shared read-only between requests. Entries in
/// the blocked lists are resource names (the first dot-delimited segment of a
/// route name) or full route names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePolicy {
    /// Resources hidden from the read-only role class.
    pub read_only_blocked: Vec<String>,
    /// Resources only the unrestricted class may reach.
    pub admin_only: Vec<String>,
    /// Full route names exempt from resource-level blocks.
    pub allow_list: Vec<String>,
    /// Route-name suffixes that denote a data-mutating action.
    pub write_suffixes: Vec<String>,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

impl Default for RoutePolicy {
    fn default() -> Self {
        Self {
            read_only_blocked: owned(&[
                "users",
                "roles",
                "regions",
                "sez-organizations",
                "industrial-zone-organizations",
            ]),
            admin_only: owned(&["users", "roles", "regions"]),
            allow_list: owned(&["regions.show"]),
            write_suffixes: owned(&[".create", ".store", ".edit", ".update", ".destroy"]),
        }
    }
}

impl RoutePolicy {
    /// Whether `route` falls under one of the resources in `blocked`.
    ///
    /// An unnamed route is never blocked, and an exact allow-list match wins
    /// over any resource entry.
    pub fn resource_is_blocked(&self, route: Option<&str>, blocked: &[String]) -> bool {
        let Some(route) = route else {
            return false;
        };

        if self.allow_list.iter().any(|allowed| allowed == route) {
            return false;
        }

        blocked.iter().any(|resource| {
            route == resource
                || route
                    .strip_prefix(resource.as_str())
                    .is_some_and(|rest| rest.starts_with('.'))
        })
    }

    pub fn blocks_read_only(&self, route: Option<&str>) -> bool {
        self.resource_is_blocked(route, &self.read_only_blocked)
    }

    pub fn blocks_limited(&self, route: Option<&str>) -> bool {
        self.resource_is_blocked(route, &self.admin_only)
    }

    /// A write is either a route named with a write suffix or any request
    /// made with an unsafe method, named or not.
    pub fn is_write_action(&self, route: Option<&str>, method: &Method) -> bool {
        let by_name = route.is_some_and(|route| {
            self.write_suffixes
                .iter()
                .any(|suffix| route.ends_with(suffix.as_str()))
        });

        by_name || !is_safe_method(method)
    }
}

pub fn is_safe_method(method: &Method) -> bool {
    *method == Method::GET || *method == Method::HEAD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_list_overrides_blocked_resource() {
        let policy = RoutePolicy::default();
        assert!(!policy.resource_is_blocked(Some("regions.show"), &policy.read_only_blocked));
        assert!(policy.resource_is_blocked(Some("regions.index"), &policy.read_only_blocked));
    }

    #[test]
    fn exact_and_prefix_matches() {
        let policy = RoutePolicy::default();
        assert!(policy.blocks_read_only(Some("users")));
        assert!(policy.blocks_read_only(Some("users.destroy")));
        assert!(!policy.blocks_read_only(Some("users-archive.index")));
        assert!(!policy.blocks_read_only(Some("investment-projects.index")));
    }

    #[test]
    fn unnamed_route_is_never_blocked() {
        let policy = RoutePolicy::default();
        assert!(!policy.resource_is_blocked(None, &policy.read_only_blocked));
        assert!(!policy.resource_is_blocked(None, &policy.admin_only));
    }

    #[test]
    fn admin_only_list() {
        let policy = RoutePolicy::default();
        assert!(policy.blocks_limited(Some("roles.index")));
        assert!(!policy.blocks_limited(Some("regions.show")));
        assert!(!policy.blocks_limited(Some("sez-organizations.index")));
    }

    #[test]
    fn write_action_by_suffix_or_method() {
        let policy = RoutePolicy::default();
        assert!(policy.is_write_action(Some("investment-projects.store"), &Method::POST));
        assert!(policy.is_write_action(Some("investment-projects.edit"), &Method::GET));
        assert!(policy.is_write_action(Some("investment-projects.show"), &Method::DELETE));
        assert!(!policy.is_write_action(Some("investment-projects.show"), &Method::GET));
        assert!(!policy.is_write_action(Some("investment-projects.index"), &Method::HEAD));
    }

    #[test]
    fn unnamed_route_falls_back_to_method() {
        let policy = RoutePolicy::default();
        assert!(!policy.is_write_action(None, &Method::GET));
        assert!(policy.is_write_action(None, &Method::PATCH));
        assert!(policy.is_write_action(None, &Method::OPTIONS));
    }
}
