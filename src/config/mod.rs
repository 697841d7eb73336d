//! Configuration management for the dialweave client
//!
//! Handles backend connection settings and editor behaviour. Every value can be
//! supplied through `DIALWEAVE_*` environment variables for container deployment.

use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Backend REST API configuration
    pub api: ApiConfig,
    /// Editor session configuration
    pub editor: EditorConfig,
}

/// Connection settings for the dial-plan backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the REST API, without trailing slash (e.g., "https://pbx.example.com/api")
    pub base_url: String,
    /// Bearer token sent with every request
    pub token: Option<String>,
    /// Tenant identifier sent in `tenant_header`
    pub tenant_id: Option<String>,
    /// Name of the tenant-identifying header
    pub tenant_header: String,
    /// Request timeout in seconds. None keeps the HTTP client default.
    pub timeout_secs: Option<u64>,
}

/// Editor session settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Directory generated `.conf` files are written to
    pub export_dir: String,
}

impl Default for Config {
    /// Default configuration with ENV_VAR support for k8s/container deployment
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: std::env::var("DIALWEAVE_API_URL")
                    .unwrap_or_else(|_| "http://localhost:8000/api".to_string()),
                token: std::env::var("DIALWEAVE_API_TOKEN").ok(),
                tenant_id: std::env::var("DIALWEAVE_TENANT_ID").ok(),
                tenant_header: std::env::var("DIALWEAVE_TENANT_HEADER")
                    .unwrap_or_else(|_| "X-Tenant-ID".to_string()),
                timeout_secs: std::env::var("DIALWEAVE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok()),
            },
            editor: EditorConfig {
                export_dir: std::env::var("DIALWEAVE_EXPORT_DIR")
                    .unwrap_or_else(|_| ".".to_string()),
            },
        }
    }
}

impl ApiConfig {
    /// Config pointing at `base_url` with no credentials (used by tests and tooling)
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            tenant_id: None,
            tenant_header: "X-Tenant-ID".to_string(),
            timeout_secs: None,
        }
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the tenant id
    pub fn with_tenant(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }
}
