//! Error types for portal-gate
//!
//! This module defines the error hierarchy used throughout the crate.
//! We use `thiserror` for library-style errors that are part of the API.
//! None of these are fatal to an authorization check: the gate folds every
//! identity or profile failure into a denied decision at its boundary.

use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Supabase API error: {0}")]
    Supabase(#[from] SupabaseError),

    #[error("Identity error: {0}")]
    Identity(#[from] IdentityError),

    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {field}")]
    Missing { field: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Supabase HTTP API errors (auth and REST surfaces)
#[derive(Error, Debug)]
pub enum SupabaseError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Supabase API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited, retry after {retry_after} seconds")]
    RateLimited { retry_after: u64 },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Unauthorized: invalid or expired token")]
    Unauthorized,

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Invalid response from Supabase: {0}")]
    InvalidResponse(String),
}

impl SupabaseError {
    /// Create an appropriate error from an HTTP status code and response body
    pub fn from_response(status: u16, body: &str) -> Self {
        match status {
            401 => SupabaseError::Unauthorized,
            403 => SupabaseError::Forbidden {
                message: if body.is_empty() {
                    "insufficient permissions".into()
                } else {
                    body.to_string()
                },
            },
            404 => SupabaseError::NotFound {
                resource: "requested resource".into(),
            },
            429 => SupabaseError::RateLimited { retry_after: 60 },
            _ => SupabaseError::Api {
                status,
                message: if body.is_empty() {
                    format!("HTTP {}", status)
                } else {
                    body.to_string()
                },
            },
        }
    }

    /// Whether the error means the presented credentials were rejected
    pub fn is_auth_rejection(&self) -> bool {
        matches!(
            self,
            SupabaseError::Unauthorized | SupabaseError::Forbidden { .. }
        )
    }
}

/// Identity provider errors
#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("No identity provider configured")]
    NotConfigured,

    #[error("Identity service unavailable: {0}")]
    Unavailable(#[from] SupabaseError),
}

/// Profile store errors
#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Profile lookup failed: {0}")]
    Lookup(#[from] SupabaseError),

    #[error("Expected one profile for user '{user_id}', found {count}")]
    Ambiguous { user_id: String, count: usize },
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type alias for Supabase API operations
pub type SupabaseResult<T> = std::result::Result<T, SupabaseError>;
