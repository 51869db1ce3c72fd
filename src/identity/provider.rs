//! Identity provider trait
//!
//! Defines where the gate gets the current session from when the caller
//! does not hand one in.

use crate::error::IdentityError;
use crate::identity::session::Session;
// async_trait required for dyn-compatibility with Arc<dyn IdentityProvider>
use async_trait::async_trait;
use std::sync::Arc;

/// Identity provider trait
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Get the current session, if any.
    ///
    /// "Nobody is signed in" is `Ok(None)`, not an error. Errors are reserved
    /// for the provider itself being unreachable or misbehaving.
    async fn current_session(&self) -> Result<Option<Session>, IdentityError>;

    /// Get a description of the provider (for logging)
    fn provider_type(&self) -> &'static str;
}

/// Shared handle type for identity providers
pub type SharedIdentityProvider = Arc<dyn IdentityProvider>;

/// Provider for hosts where the caller always supplies the session
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIdentityProvider;

#[async_trait]
impl IdentityProvider for NoIdentityProvider {
    async fn current_session(&self) -> Result<Option<Session>, IdentityError> {
        Err(IdentityError::NotConfigured)
    }

    fn provider_type(&self) -> &'static str {
        "none"
    }
}
