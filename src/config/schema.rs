//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::routing::priority::PriorityStrategy;
use crate::routing::transform::TransformPolicy;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Route table policies.
    pub router: RouterConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Frontend definitions published by the file provider.
    pub frontends: Vec<FrontendConfig>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Route table policies.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct RouterConfig {
    /// Default ranking of routes without an explicit priority.
    pub priority_strategy: PriorityStrategy,

    /// Handling of two different path transforms in one rule.
    pub on_transform_conflict: TransformPolicy,
}

/// A frontend: one rule expression routed to one backend pool.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct FrontendConfig {
    /// Frontend identifier for logging and error reports.
    pub id: String,

    /// Rule expression, e.g. "Host:a.com;PathPrefix:/api".
    pub rule: String,

    /// Backend pool the frontend forwards to.
    pub backend: String,

    /// Explicit priority (higher = checked first); overrides the default.
    #[serde(default)]
    pub priority: Option<i64>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: ProxyConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.router, RouterConfig::default());
        assert!(config.frontends.is_empty());
    }

    #[test]
    fn test_full_config() {
        let config: ProxyConfig = toml::from_str(
            r#"
            [router]
            priority_strategy = "insertion"
            on_transform_conflict = "reject"

            [observability]
            json_logs = true

            [[frontends]]
            id = "api"
            rule = "Host:api.example.com;PathPrefixStrip:/v1"
            backend = "api-pool"
            priority = 10

            [[frontends]]
            id = "web"
            rule = "Host:example.com"
            backend = "web-pool"
            "#,
        )
        .unwrap();

        assert_eq!(config.router.priority_strategy, PriorityStrategy::Insertion);
        assert_eq!(config.router.on_transform_conflict, TransformPolicy::Reject);
        assert!(config.observability.json_logs);
        assert_eq!(config.observability.log_level, "info");
        assert_eq!(config.frontends.len(), 2);
        assert_eq!(config.frontends[0].priority, Some(10));
        assert_eq!(config.frontends[1].priority, None);
    }
}
