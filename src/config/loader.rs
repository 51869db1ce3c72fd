//! Configuration loader with layered sources
//!
//! Loads configuration from multiple sources with the following precedence
//! (highest to lowest):
//! 1. `SUPABASE_URL` / `SUPABASE_ANON_KEY`
//! 2. Environment variables (PORTAL_GATE__*)
//! 3. Configuration file (TOML)
//! 4. Default values

use crate::access_control::Role;
use crate::config::types::AppConfig;
use crate::error::ConfigError;
use config::{Config, Environment, File, FileFormat};
use std::path::Path;
use tracing::warn;

/// Default configuration file paths to check (in order)
const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "portal-gate.toml",
    ".portal-gate.toml",
    "~/.config/portal-gate/config.toml",
    "/etc/portal-gate/config.toml",
];

/// Load configuration from a TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from_str(toml_str, FileFormat::Toml))
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    // Skip anon key validation for testing
    validate_config_relaxed(&app_config)?;

    Ok(app_config)
}

/// Load configuration from files and environment
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    if let Some(path) = config_path {
        // Explicit path provided - must exist
        if !Path::new(path).exists() {
            return Err(ConfigError::Load(format!(
                "Configuration file not found: {}",
                path
            )));
        }
        builder = builder.add_source(File::new(path, FileFormat::Toml));
    } else {
        // First existing default path wins
        for path in DEFAULT_CONFIG_PATHS {
            let expanded = shellexpand::tilde(path);
            if Path::new(expanded.as_ref()).exists() {
                builder = builder.add_source(File::new(&expanded, FileFormat::Toml));
                break;
            }
        }
    }

    // e.g., PORTAL_GATE__SUPABASE__URL, PORTAL_GATE__PORTAL__LOGIN_PATH,
    // PORTAL_GATE__PORTAL__DEFAULT_REQUIRED_ROLES=admin,client_manager
    builder = builder.add_source(
        Environment::with_prefix("PORTAL_GATE")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("portal.default_required_roles")
            .try_parsing(true),
    );

    // Conventional Supabase variables
    if let Ok(url) = std::env::var("SUPABASE_URL") {
        builder = builder
            .set_override("supabase.url", url)
            .map_err(|e| ConfigError::Load(e.to_string()))?;
    }
    if let Ok(key) = std::env::var("SUPABASE_ANON_KEY")
        && !key.is_empty()
    {
        builder = builder
            .set_override("supabase.anon_key", key)
            .map_err(|e| ConfigError::Load(e.to_string()))?;
    }

    let config = builder
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Validate configuration values (relaxed - for testing without anon key)
fn validate_config_relaxed(config: &AppConfig) -> Result<(), ConfigError> {
    validate_url(&config.supabase.url, "supabase.url")?;

    if config.supabase.timeout_secs == 0 {
        return Err(ConfigError::Invalid {
            message: "supabase.timeout_secs must be greater than 0".to_string(),
        });
    }

    if config.supabase.profiles_table.is_empty() {
        return Err(ConfigError::Missing {
            field: "supabase.profiles_table".to_string(),
        });
    }

    if config.supabase.user_id_column.is_empty() {
        return Err(ConfigError::Missing {
            field: "supabase.user_id_column".to_string(),
        });
    }

    validate_route(&config.portal.login_path, "portal.login_path")?;
    validate_route(&config.portal.setup_path, "portal.setup_path")?;
    validate_url(&config.portal.client_portal_url, "portal.client_portal_url")?;

    if config.portal.default_required_roles.is_empty() {
        return Err(ConfigError::Invalid {
            message: "portal.default_required_roles must name at least one role".to_string(),
        });
    }

    if config
        .portal
        .default_required_roles
        .contains(&Role::Standard)
    {
        warn!("portal.default_required_roles lists 'standard', which is always sent to the client portal");
    }

    Ok(())
}

/// Validate configuration values
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    validate_config_relaxed(config)?;

    let has_key = config
        .supabase
        .anon_key
        .as_ref()
        .is_some_and(|k| !k.expose_secret().is_empty());
    if !has_key {
        return Err(ConfigError::Missing {
            field: "supabase.anon_key (set SUPABASE_ANON_KEY environment variable)".to_string(),
        });
    }

    Ok(())
}

fn validate_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if url.is_empty() {
        return Err(ConfigError::Missing {
            field: field.to_string(),
        });
    }

    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Invalid {
            message: format!("{} must start with http:// or https://, got: {}", field, url),
        });
    }

    Ok(())
}

fn validate_route(path: &str, field: &str) -> Result<(), ConfigError> {
    if !path.starts_with('/') {
        return Err(ConfigError::Invalid {
            message: format!("{} must be an absolute route starting with '/', got: {}", field, path),
        });
    }
    Ok(())
}
