//! Frontend rule router library.
//!
//! Compiles frontend rule expressions (`Host:a.com;PathPrefix:/api`) into
//! request matchers, orders them by priority and resolves requests to a
//! backend pool plus a rewritten path.

pub mod config;
pub mod http;
pub mod observability;
pub mod routing;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use routing::Router;
