//! Authenticated session issued by the identity provider

use crate::util::SecretString;
use serde::Deserialize;

/// Proof of authentication for one visitor
///
/// The gate only reads a session; creating, refreshing and revoking it is
/// the identity provider's business.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Session {
    pub access_token: SecretString,

    #[serde(default)]
    pub refresh_token: Option<SecretString>,

    /// Unix timestamp (seconds) at which the access token expires
    #[serde(default)]
    pub expires_at: Option<i64>,

    pub user: SessionUser,
}

/// User as reported by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionUser {
    /// Stable user identifier; profiles are keyed by it
    pub id: String,

    #[serde(default)]
    pub email: Option<String>,
}

impl Session {
    pub fn new(user_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            access_token: SecretString::new(access_token),
            refresh_token: None,
            expires_at: None,
            user: SessionUser {
                id: user_id.into(),
                email: None,
            },
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user.id
    }
}
