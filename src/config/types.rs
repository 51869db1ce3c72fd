//! Configuration types for portal-gate
//!
//! This module defines the configuration structure that can be loaded from
//! TOML files and/or environment variables.

use crate::access_control::{RequiredRoles, Role};
use crate::util::SecretString;
use serde::Deserialize;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Supabase connection settings (identity + profile store)
    pub supabase: SupabaseConfig,

    /// Portal routing settings
    pub portal: PortalConfig,

    /// Gate evaluation settings
    pub gate: GateConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Supabase connection configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SupabaseConfig {
    /// Project URL (e.g., `https://abcd.supabase.co`)
    pub url: String,

    /// Public anon key (prefer env var SUPABASE_ANON_KEY)
    #[serde(default)]
    pub anon_key: Option<SecretString>,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Maximum retries for failed requests
    pub max_retries: u32,

    /// Table holding portal profiles
    pub profiles_table: String,

    /// Column linking a profile to the auth user id
    pub user_id_column: String,
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:54321".to_string(),
            anon_key: None,
            timeout_secs: 30,
            max_retries: 3,
            profiles_table: "profiles".to_string(),
            user_id_column: "auth_user_id".to_string(),
        }
    }
}

impl SupabaseConfig {
    /// Base URL with any trailing slash removed
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}

/// Portal routing configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// In-app login route
    pub login_path: String,

    /// In-app onboarding route, reachable before onboarding completes
    pub setup_path: String,

    /// Base address of the client-facing portal for `standard` users
    pub client_portal_url: String,

    /// Roles required when a mount point does not name its own
    pub default_required_roles: Vec<Role>,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            login_path: "/login".to_string(),
            setup_path: "/setup-profile".to_string(),
            client_portal_url: "https://app.rule27design.com".to_string(),
            default_required_roles: RequiredRoles::portal_staff().iter().collect(),
        }
    }
}

impl PortalConfig {
    /// Default required roles as a set
    pub fn default_roles(&self) -> RequiredRoles {
        self.default_required_roles.iter().copied().collect()
    }
}

/// Gate evaluation configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Upper bound for one evaluation pass in milliseconds (0 disables)
    pub evaluation_timeout_ms: u64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            evaluation_timeout_ms: 10_000,
        }
    }
}

impl GateConfig {
    /// The pass bound, or `None` when disabled
    pub fn evaluation_timeout(&self) -> Option<Duration> {
        (self.evaluation_timeout_ms > 0).then(|| Duration::from_millis(self.evaluation_timeout_ms))
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Output format (pretty, json)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output
    #[default]
    Pretty,
    /// JSON structured output
    Json,
}
