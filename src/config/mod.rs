//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → frontends published to the router as provider "file"
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → ProviderUpdate sent to the router
//!     → router rebuilds and swaps its table
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All sections have defaults to allow minimal configs
//! - A config that fails to load never replaces the running one

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use schema::FrontendConfig;
pub use schema::ListenerConfig;
pub use schema::ObservabilityConfig;
pub use schema::ProxyConfig;
pub use schema::RouterConfig;
