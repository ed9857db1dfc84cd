//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.
//! Routes are deliberately absent: the routing table starts empty and is
//! populated only through the admin API.

use serde::{Deserialize, Serialize};

/// Root configuration for the dynamic router.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Proxy listener configuration.
    pub listener: ListenerConfig,

    /// Admin API configuration.
    pub admin: AdminConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Proxy listener configuration.
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

/// Admin API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Serve the admin API.
    pub enabled: bool,

    /// Admin API bind address. Keep it off public interfaces.
    pub bind_address: String,

    /// Optional bearer token required on every admin call.
    pub api_key: Option<String>,

    /// Maximum accepted payload size in bytes.
    pub max_body_size: usize,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bind_address: "127.0.0.1:2019".to_string(),
            api_key: None,
            max_body_size: 64 * 1024,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upstream connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: RouterConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.admin.bind_address, "127.0.0.1:2019");
        assert!(config.admin.enabled);
        assert!(config.admin.api_key.is_none());
        assert_eq!(config.timeouts.request_secs, 30);
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn test_partial_sections() {
        let config: RouterConfig = toml::from_str(
            r#"
            [admin]
            api_key = "s3cret"

            [timeouts]
            request_secs = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.admin.api_key.as_deref(), Some("s3cret"));
        assert_eq!(config.admin.bind_address, "127.0.0.1:2019");
        assert_eq!(config.timeouts.request_secs, 5);
        assert_eq!(config.timeouts.connect_secs, 5);
    }
}
