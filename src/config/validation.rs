//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Detect conflicting listeners
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::RouterConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("admin.bind_address conflicts with listener.bind_address ({0})")]
    ListenerConflict(String),

    #[error("admin.api_key must not be blank when set")]
    BlankApiKey,
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let listener = check_addr(&mut errors, "listener.bind_address", &config.listener.bind_address);

    if config.admin.enabled {
        let admin = check_addr(&mut errors, "admin.bind_address", &config.admin.bind_address);
        if let (Some(l), Some(a)) = (listener, admin) {
            if l == a && l.port() != 0 {
                errors.push(ValidationError::ListenerConflict(l.to_string()));
            }
        }
        if config.admin.max_body_size == 0 {
            errors.push(ValidationError::Zero("admin.max_body_size"));
        }
    }

    if let Some(key) = &config.admin.api_key {
        if key.trim().is_empty() {
            errors.push(ValidationError::BlankApiKey);
        }
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }
    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.connect_secs"));
    }

    if config.observability.metrics_enabled {
        check_addr(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_addr(
    errors: &mut Vec<ValidationError>,
    field: &'static str,
    value: &str,
) -> Option<SocketAddr> {
    match value.parse() {
        Ok(addr) => Some(addr),
        Err(_) => {
            errors.push(ValidationError::InvalidAddress {
                field,
                value: value.to_string(),
            });
            None
        }
    }
}
