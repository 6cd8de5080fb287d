//! Shared helpers for integration tests.

use axum::http::Request;
use frontend_router::config::FrontendConfig;
use frontend_router::routing::{RouteMatch, RouteRequest, Router};

/// A frontend routed to `<id>-pool`.
pub fn frontend(id: &str, rule: &str, priority: Option<i64>) -> FrontendConfig {
    FrontendConfig {
        id: id.to_string(),
        rule: rule.to_string(),
        backend: format!("{id}-pool"),
        priority,
    }
}

/// Resolve a request described by method, URI and headers.
#[allow(dead_code)]
pub fn resolve(
    router: &Router,
    method: &str,
    uri: &str,
    headers: &[(&str, &str)],
) -> Option<RouteMatch> {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let req = builder.body(()).unwrap();
    router.match_request(&RouteRequest::from_request(&req))
}

/// Frontend id chosen for a GET of `uri`.
#[allow(dead_code)]
pub fn frontend_for(router: &Router, uri: &str) -> Option<String> {
    resolve(router, "GET", uri, &[]).map(|m| m.frontend)
}
