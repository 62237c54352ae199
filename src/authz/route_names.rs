//! Logical route names.
//!
//! Axum routes are identified by path templates; the policy table speaks in
//! dot-delimited names such as `regions.show`. `NamedRouter` declares both at
//! once and `RouteNames` resolves a matched template back to its name.

use std::collections::HashMap;

use axum::handler::Handler;
use axum::http::Method;
use axum::routing::{on, MethodFilter};
use axum::Router;

#[derive(Debug, Clone, Default)]
pub struct RouteNames {
    names: HashMap<(Method, String), String>,
}

impl RouteNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, method: Method, path: &str, name: &str) {
        self.names.insert((method, path.to_string()), name.to_string());
    }

    /// Name registered for a method and matched path template.
    pub fn resolve(&self, method: &Method, path: &str) -> Option<&str> {
        self.names
            .get(&(method.clone(), path.to_string()))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Router builder that records a logical name for every route it adds.
pub struct NamedRouter<S> {
    router: Router<S>,
    names: RouteNames,
}

impl<S> Default for NamedRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S> NamedRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            router: Router::new(),
            names: RouteNames::new(),
        }
    }

    fn add<H, T>(mut self, methods: &[Method], filter: MethodFilter, path: &str, name: &str, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.router = self.router.route(path, on(filter, handler));
        for method in methods {
            self.names.insert(method.clone(), path, name);
        }
        self
    }

    /// GET route; axum also answers HEAD with it, so HEAD shares the name.
    pub fn get<H, T>(self, path: &str, name: &str, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.add(&[Method::GET, Method::HEAD], MethodFilter::GET, path, name, handler)
    }

    pub fn post<H, T>(self, path: &str, name: &str, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.add(&[Method::POST], MethodFilter::POST, path, name, handler)
    }

    /// PUT and PATCH on the same handler.
    pub fn update<H, T>(self, path: &str, name: &str, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.add(
            &[Method::PUT, Method::PATCH],
            MethodFilter::PUT.or(MethodFilter::PATCH),
            path,
            name,
            handler,
        )
    }

    pub fn delete<H, T>(self, path: &str, name: &str, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.add(&[Method::DELETE], MethodFilter::DELETE, path, name, handler)
    }

    pub fn into_parts(self) -> (Router<S>, RouteNames) {
        (self.router, self.names)
    }
}
