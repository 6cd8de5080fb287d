//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup)
//!     → routing::Router (match + path rewrite)
//!     → JSON routing decision, or 404
//! ```

pub mod server;

pub use server::HttpServer;
