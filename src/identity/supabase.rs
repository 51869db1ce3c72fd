//! Supabase Auth (GoTrue) identity provider
//!
//! Holds the visitor's access token and asks `/auth/v1/user` whether it
//! still identifies a user. Obtaining the token (login, magic link, OAuth
//! callback) happens elsewhere.

use crate::error::IdentityError;
use crate::identity::provider::IdentityProvider;
use crate::identity::session::{Session, SessionUser};
use crate::supabase::SupabaseClient;
use crate::util::SecretString;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Identity provider backed by Supabase Auth
pub struct SupabaseIdentity {
    client: Arc<SupabaseClient>,
    access_token: RwLock<Option<SecretString>>,
}

impl SupabaseIdentity {
    /// Create a provider with no signed-in visitor
    pub fn new(client: Arc<SupabaseClient>) -> Self {
        Self {
            client,
            access_token: RwLock::new(None),
        }
    }

    /// Create a provider for an already signed-in visitor
    pub fn with_access_token(client: Arc<SupabaseClient>, token: impl Into<String>) -> Self {
        let token = SecretString::new(token);
        Self {
            client,
            access_token: RwLock::new((!token.is_empty()).then_some(token)),
        }
    }

    /// Replace the stored access token (e.g. after sign-in or refresh)
    pub async fn set_access_token(&self, token: impl Into<String>) {
        *self.access_token.write().await = Some(SecretString::new(token));
    }

    /// Forget the stored access token (sign-out)
    pub async fn clear(&self) {
        *self.access_token.write().await = None;
    }
}

#[async_trait]
impl IdentityProvider for SupabaseIdentity {
    async fn current_session(&self) -> Result<Option<Session>, IdentityError> {
        let Some(token) = self.access_token.read().await.clone() else {
            debug!("No stored access token");
            return Ok(None);
        };

        match self
            .client
            .get::<SessionUser>("/auth/v1/user", Some(&token))
            .await
        {
            Ok(user) => Ok(Some(Session {
                access_token: token,
                refresh_token: None,
                expires_at: None,
                user,
            })),
            Err(e) if e.is_auth_rejection() => {
                debug!(error = %e, "Stored access token rejected");
                Ok(None)
            }
            Err(e) => Err(IdentityError::Unavailable(e)),
        }
    }

    fn provider_type(&self) -> &'static str {
        "Supabase Auth"
    }
}
