//! Routing view of an inbound request.

use axum::http::{HeaderMap, Method, Request};

/// The parts of a request the router looks at, borrowed from the request.
#[derive(Debug, Clone, Copy)]
pub struct RouteRequest<'a> {
    pub method: &'a Method,
    /// Host without port, if one could be determined.
    pub host: Option<&'a str>,
    pub path: &'a str,
    pub headers: &'a HeaderMap,
}

impl<'a> RouteRequest<'a> {
    /// Build from an HTTP request.
    ///
    /// The host comes from the `Host` header, falling back to the URI
    /// authority (HTTP/2). A non-UTF-8 host is treated as absent.
    pub fn from_request<B>(req: &'a Request<B>) -> Self {
        let host = req
            .headers()
            .get("host")
            .and_then(|h| h.to_str().ok())
            .or_else(|| req.uri().host())
            .map(strip_port);

        Self {
            method: req.method(),
            host,
            path: req.uri().path(),
            headers: req.headers(),
        }
    }
}

/// Lower-cased, trimmed hostname used for every domain comparison.
pub fn canonical_domain(domain: &str) -> String {
    domain.trim().to_lowercase()
}

/// Drop a `:port` suffix; IPv6 literals lose their brackets.
pub(crate) fn strip_port(host: &str) -> &str {
    let host = host.trim();
    if let Some(rest) = host.strip_prefix('[') {
        return match rest.find(']') {
            Some(end) => &rest[..end],
            None => host,
        };
    }
    match host.split_once(':') {
        Some((name, port))
            if !port.contains(':') && port.chars().all(|c| c.is_ascii_digit()) =>
        {
            name
        }
        _ => host,
    }
}
