//! Session resolution
//!
//! A session handed in by the caller is used as-is. Only when none is
//! supplied does the resolver ask the identity provider.

use crate::identity::provider::SharedIdentityProvider;
use crate::identity::session::Session;
use std::borrow::Cow;
use tracing::{debug, warn};

/// Resolves the session for one authorization pass
#[derive(Clone)]
pub struct SessionResolver {
    provider: SharedIdentityProvider,
}

impl SessionResolver {
    pub fn new(provider: SharedIdentityProvider) -> Self {
        Self { provider }
    }

    /// Return the supplied session, or the provider's current one.
    ///
    /// Provider failures are logged and read as "no session".
    pub async fn resolve<'a>(&self, supplied: Option<&'a Session>) -> Option<Cow<'a, Session>> {
        if let Some(session) = supplied {
            return Some(Cow::Borrowed(session));
        }

        match self.provider.current_session().await {
            Ok(Some(session)) => {
                debug!(
                    user_id = %session.user_id(),
                    provider = self.provider.provider_type(),
                    "Session resolved from identity provider"
                );
                Some(Cow::Owned(session))
            }
            Ok(None) => {
                debug!(provider = self.provider.provider_type(), "No current session");
                None
            }
            Err(e) => {
                warn!(
                    error = %e,
                    provider = self.provider.provider_type(),
                    "Identity service unavailable, treating as no session"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IdentityError;
    use crate::identity::provider::{IdentityProvider, NoIdentityProvider};
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProvider {
        session: Option<Session>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl IdentityProvider for CountingProvider {
        async fn current_session(&self) -> Result<Option<Session>, IdentityError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.session.clone())
        }

        fn provider_type(&self) -> &'static str {
            "counting"
        }
    }

    #[tokio::test]
    async fn test_supplied_session_skips_provider() {
        let provider = Arc::new(CountingProvider {
            session: Some(Session::new("other", "t2")),
            calls: AtomicUsize::new(0),
        });
        let resolver = SessionResolver::new(provider.clone());
        let supplied = Session::new("u-1", "t1");

        let resolved = resolver.resolve(Some(&supplied)).await.unwrap();
        assert!(matches!(resolved, Cow::Borrowed(_)));
        assert_eq!(resolved.user_id(), "u-1");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fetches_when_not_supplied() {
        let provider = Arc::new(CountingProvider {
            session: Some(Session::new("u-2", "t2")),
            calls: AtomicUsize::new(0),
        });
        let resolver = SessionResolver::new(provider.clone());

        let resolved = resolver.resolve(None).await.unwrap();
        assert_eq!(resolved.user_id(), "u-2");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_no_session_is_none() {
        let provider = Arc::new(CountingProvider {
            session: None,
            calls: AtomicUsize::new(0),
        });
        let resolver = SessionResolver::new(provider);
        assert!(resolver.resolve(None).await.is_none());
    }

    #[tokio::test]
    async fn test_provider_error_is_none() {
        let resolver = SessionResolver::new(Arc::new(NoIdentityProvider));
        assert!(resolver.resolve(None).await.is_none());
    }
}
