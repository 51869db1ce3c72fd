//! One authorization pass
//!
//! Resolve the session, load the profile, apply the policy. Every failure
//! along the way ends in `denied-unauthenticated`; nothing is propagated.

use crate::access_control::{AccessPolicy, AuthorizationDecision, Redirect, RequiredRoles};
use crate::config::{AppConfig, GateConfig, PortalConfig};
use crate::error::Result;
use crate::gate::navigator::{SharedNavigator, TracingNavigator};
use crate::identity::{Session, SessionResolver, SharedIdentityProvider, SupabaseIdentity};
use crate::profile::{Profile, SharedProfileStore, SupabaseProfileStore};
use crate::supabase::SupabaseClient;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// Inputs of one pass
#[derive(Debug, Clone, Copy)]
pub struct GateRequest<'a> {
    /// Session supplied by the caller; `None` asks the identity provider
    pub session: Option<&'a Session>,
    pub required_roles: &'a RequiredRoles,
    /// Route the visitor is trying to reach
    pub destination: &'a str,
}

/// Result of one pass
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub decision: AuthorizationDecision,
    /// The loaded profile, when the pass got that far
    pub profile: Option<Profile>,
}

impl Evaluation {
    fn unauthenticated() -> Self {
        Self {
            decision: AuthorizationDecision::DeniedUnauthenticated,
            profile: None,
        }
    }
}

/// Access gate shared by every protected mount point
pub struct AccessGate {
    resolver: SessionResolver,
    profiles: SharedProfileStore,
    policy: AccessPolicy,
    portal: PortalConfig,
    timeout: Option<Duration>,
    navigator: SharedNavigator,
}

impl AccessGate {
    pub fn new(
        identity: SharedIdentityProvider,
        profiles: SharedProfileStore,
        portal: &PortalConfig,
        gate: &GateConfig,
    ) -> Self {
        Self {
            resolver: SessionResolver::new(identity),
            profiles,
            policy: AccessPolicy::new(portal),
            portal: portal.clone(),
            timeout: gate.evaluation_timeout(),
            navigator: Arc::new(TracingNavigator),
        }
    }

    /// Create a gate from the application configuration
    pub fn from_config(
        config: &AppConfig,
        identity: SharedIdentityProvider,
        profiles: SharedProfileStore,
    ) -> Self {
        Self::new(identity, profiles, &config.portal, &config.gate)
    }

    /// Create a gate backed by Supabase Auth and the PostgREST profile table.
    ///
    /// `access_token` is the visitor's stored token, if signed in.
    pub fn supabase(config: &AppConfig, access_token: Option<&str>) -> Result<Self> {
        let client = Arc::new(SupabaseClient::new(&config.supabase)?);
        let identity = match access_token {
            Some(token) => SupabaseIdentity::with_access_token(Arc::clone(&client), token),
            None => SupabaseIdentity::new(Arc::clone(&client)),
        };
        let profiles = SupabaseProfileStore::new(client, &config.supabase);

        Ok(Self::from_config(
            config,
            Arc::new(identity),
            Arc::new(profiles),
        ))
    }

    /// Replace the navigator used for client-portal redirects
    pub fn with_navigator(mut self, navigator: SharedNavigator) -> Self {
        self.navigator = navigator;
        self
    }

    pub fn portal(&self) -> &PortalConfig {
        &self.portal
    }

    pub(crate) fn navigator(&self) -> &SharedNavigator {
        &self.navigator
    }

    /// Map a decision to the router's redirect target
    pub fn redirect_for(&self, decision: AuthorizationDecision) -> Option<Redirect> {
        decision.redirect(&self.portal)
    }

    /// Run one complete pass.
    ///
    /// Bounded by `gate.evaluation_timeout_ms`; an expired pass is
    /// `denied-unauthenticated`.
    #[instrument(skip_all, fields(destination = request.destination))]
    pub async fn evaluate(&self, request: GateRequest<'_>) -> Evaluation {
        let Some(limit) = self.timeout else {
            return self.run_pass(request).await;
        };

        match tokio::time::timeout(limit, self.run_pass(request)).await {
            Ok(evaluation) => evaluation,
            Err(_) => {
                warn!(
                    timeout_ms = limit.as_millis() as u64,
                    "Authorization pass timed out, treating as unauthenticated"
                );
                Evaluation::unauthenticated()
            }
        }
    }

    async fn run_pass(&self, request: GateRequest<'_>) -> Evaluation {
        let Some(session) = self.resolver.resolve(request.session).await else {
            debug!("No session");
            return Evaluation::unauthenticated();
        };
        let user_id = session.user_id();

        let profile = match self.profiles.profile_for(&session).await {
            Ok(Some(profile)) => profile,
            Ok(None) => {
                warn!(user_id, store = self.profiles.store_type(), "No profile for user");
                return Evaluation::unauthenticated();
            }
            Err(e) => {
                error!(
                    error = %e,
                    user_id,
                    store = self.profiles.store_type(),
                    "Error fetching profile"
                );
                return Evaluation::unauthenticated();
            }
        };

        let decision = self
            .policy
            .evaluate(&profile, request.required_roles, request.destination);
        info!(user_id, role = %profile.role, %decision, "Authorization decided");

        Evaluation {
            decision,
            profile: Some(profile),
        }
    }
}
