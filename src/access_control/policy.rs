//! Access policy
//!
//! The synchronous part of an authorization pass. Given a loaded profile,
//! the mount point's required roles and the requested destination, the checks
//! run in this order:
//! 1. Portal check: `standard` profiles belong to the client portal
//! 2. Onboarding check: incomplete onboarding only reaches the setup route
//! 3. Role check: the profile's role must be one of the required roles

use crate::access_control::decision::AuthorizationDecision;
use crate::access_control::types::{RequiredRoles, Role};
use crate::config::PortalConfig;
use crate::profile::Profile;
use tracing::{debug, trace};

/// Access policy for the admin portal
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    setup_path: String,
}

impl AccessPolicy {
    pub fn new(portal: &PortalConfig) -> Self {
        Self {
            setup_path: normalize_path(&portal.setup_path).to_string(),
        }
    }

    /// Decide access for a loaded profile
    pub fn evaluate(
        &self,
        profile: &Profile,
        required: &RequiredRoles,
        destination: &str,
    ) -> AuthorizationDecision {
        debug!(
            user_id = %profile.auth_user_id,
            role = %profile.role,
            onboarding_completed = profile.onboarding_completed,
            required = %required,
            destination,
            "Evaluating access policy"
        );

        if profile.role == Role::Standard {
            trace!("Profile belongs to the client portal");
            return AuthorizationDecision::DeniedWrongPortal;
        }

        if !profile.onboarding_completed && !self.is_setup_destination(destination) {
            trace!("Onboarding incomplete outside the setup route");
            return AuthorizationDecision::DeniedOnboardingIncomplete;
        }

        if required.contains(profile.role) {
            AuthorizationDecision::Granted
        } else {
            trace!("Role not in required set");
            AuthorizationDecision::DeniedRole
        }
    }

    /// Whether `destination` is the setup route or a route beneath it
    pub fn is_setup_destination(&self, destination: &str) -> bool {
        let path = normalize_path(destination);
        match path.strip_prefix(self.setup_path.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}

/// Drop query, fragment and trailing slashes (keeping a bare `/`)
fn normalize_path(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let trimmed = path[..end].trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}
