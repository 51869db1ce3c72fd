//! Authorization decisions and the redirects they map to.

use crate::config::PortalConfig;
use serde::Serialize;
use std::fmt;

/// Outcome of one authorization pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthorizationDecision {
    /// A pass is in flight
    Pending,
    Granted,
    /// No session, or the profile could not be loaded
    DeniedUnauthenticated,
    /// The profile belongs to the client portal
    DeniedWrongPortal,
    DeniedOnboardingIncomplete,
    DeniedRole,
}

impl AuthorizationDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthorizationDecision::Pending => "pending",
            AuthorizationDecision::Granted => "granted",
            AuthorizationDecision::DeniedUnauthenticated => "denied-unauthenticated",
            AuthorizationDecision::DeniedWrongPortal => "denied-wrong-portal",
            AuthorizationDecision::DeniedOnboardingIncomplete => "denied-onboarding-incomplete",
            AuthorizationDecision::DeniedRole => "denied-role",
        }
    }

    pub fn is_granted(&self) -> bool {
        matches!(self, AuthorizationDecision::Granted)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, AuthorizationDecision::Pending)
    }

    pub fn is_denied(&self) -> bool {
        !self.is_granted() && !self.is_pending()
    }

    /// Where the router should send the visitor, if anywhere.
    ///
    /// A role mismatch goes to the login page just like a missing session;
    /// there is no dedicated forbidden route.
    pub fn redirect(&self, portal: &PortalConfig) -> Option<Redirect> {
        match self {
            AuthorizationDecision::Pending | AuthorizationDecision::Granted => None,
            AuthorizationDecision::DeniedUnauthenticated | AuthorizationDecision::DeniedRole => {
                Some(Redirect::Route(portal.login_path.clone()))
            }
            AuthorizationDecision::DeniedOnboardingIncomplete => {
                Some(Redirect::Route(portal.setup_path.clone()))
            }
            AuthorizationDecision::DeniedWrongPortal => {
                Some(Redirect::External(portal.client_portal_url.clone()))
            }
        }
    }
}

impl fmt::Display for AuthorizationDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Navigation instruction for the surrounding router
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "target", rename_all = "snake_case")]
pub enum Redirect {
    /// In-app route change that replaces the current history entry
    Route(String),
    /// Full-origin navigation to another application
    External(String),
}

impl Redirect {
    pub fn target(&self) -> &str {
        match self {
            Redirect::Route(path) | Redirect::External(path) => path,
        }
    }

    pub fn is_external(&self) -> bool {
        matches!(self, Redirect::External(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_table() {
        let portal = PortalConfig::default();

        assert_eq!(AuthorizationDecision::Pending.redirect(&portal), None);
        assert_eq!(AuthorizationDecision::Granted.redirect(&portal), None);
        assert_eq!(
            AuthorizationDecision::DeniedUnauthenticated.redirect(&portal),
            Some(Redirect::Route("/login".into()))
        );
        assert_eq!(
            AuthorizationDecision::DeniedRole.redirect(&portal),
            Some(Redirect::Route("/login".into()))
        );
        assert_eq!(
            AuthorizationDecision::DeniedOnboardingIncomplete.redirect(&portal),
            Some(Redirect::Route("/setup-profile".into()))
        );
        assert_eq!(
            AuthorizationDecision::DeniedWrongPortal.redirect(&portal),
            Some(Redirect::External("https://app.rule27design.com".into()))
        );
    }

    #[test]
    fn test_decision_predicates() {
        assert!(AuthorizationDecision::Granted.is_granted());
        assert!(AuthorizationDecision::Pending.is_pending());
        assert!(!AuthorizationDecision::Pending.is_denied());
        assert!(AuthorizationDecision::DeniedRole.is_denied());
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&AuthorizationDecision::DeniedOnboardingIncomplete).unwrap();
        assert_eq!(json, r#""denied-onboarding-incomplete""#);

        let json = serde_json::to_value(Redirect::External("https://app.example.com".into())).unwrap();
        assert_eq!(json["kind"], "external");
        assert_eq!(json["target"], "https://app.example.com");
    }
}
