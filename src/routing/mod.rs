//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (on every provider update):
//!     (frontend, rule, priority?, backend)[]
//!     → rule.rs (tokenize "Host:a.com;PathPrefix:/api")
//!     → registry.rs (function name → handler)
//!     → compiler.rs (fold clauses: matcher.rs predicates, transform.rs rewrite)
//!     → priority.rs (order routes)
//!     → router.rs (freeze as RouteTable, atomic swap)
//!
//! Incoming Request (method, host, path, headers)
//!     → router.rs (scan table in priority order)
//!     → matcher.rs (evaluate predicates)
//!     → transform.rs (rewrite forwarded path)
//!     → Return: RouteMatch or no match
//! ```
//!
//! # Design Decisions
//! - Values in one clause are ORed, clauses are ANDed
//! - Regexes compiled with the table, never on the request path
//! - Deterministic: same input always matches same route

pub mod compiler;
pub mod domains;
pub mod error;
pub mod matcher;
pub mod priority;
pub mod registry;
pub mod request;
pub mod router;
pub mod rule;
pub mod template;
pub mod transform;

pub use compiler::{compile, compile_with, CompileOptions, CompiledRoute};
pub use domains::extract_domains;
pub use error::RuleError;
pub use priority::PriorityStrategy;
pub use request::{canonical_domain, RouteRequest};
pub use router::{RouteMatch, RouteTable, Router, UpdateReport};
pub use transform::{PathTransform, TransformPolicy};
