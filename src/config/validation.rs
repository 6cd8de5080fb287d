//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Frontends need an id, a rule and a backend
//! - Frontend ids are unique
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Rule syntax is not checked here; a bad rule only disables its frontend
//!   when the route table is built

use std::collections::HashSet;
use thiserror::Error;

use crate::config::schema::ProxyConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("frontend #{index} has an empty id")]
    EmptyId { index: usize },

    #[error("frontend '{id}' has an empty rule")]
    EmptyRule { id: String },

    #[error("frontend '{id}' has an empty backend")]
    EmptyBackend { id: String },

    #[error("frontend id '{id}' is defined more than once")]
    DuplicateId { id: String },

    #[error("listener bind address '{0}' is not a socket address")]
    BindAddress(String),
}

pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config
        .listener
        .bind_address
        .parse::<std::net::SocketAddr>()
        .is_err()
    {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    let mut seen = HashSet::new();
    for (index, frontend) in config.frontends.iter().enumerate() {
        if frontend.id.trim().is_empty() {
            errors.push(ValidationError::EmptyId { index });
            continue;
        }
        if !seen.insert(frontend.id.as_str()) {
            errors.push(ValidationError::DuplicateId {
                id: frontend.id.clone(),
            });
        }
        if frontend.rule.trim().is_empty() {
            errors.push(ValidationError::EmptyRule {
                id: frontend.id.clone(),
            });
        }
        if frontend.backend.trim().is_empty() {
            errors.push(ValidationError::EmptyBackend {
                id: frontend.id.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
