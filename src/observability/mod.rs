//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields
//!         (provider, frontend, rule, error on compile failures;
//!          route counts on table swaps)
//!     → logging.rs (subscriber: env filter + fmt/json layer)
//! ```

pub mod logging;
