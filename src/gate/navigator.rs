//! Cross-application navigation seam

use std::sync::Arc;
use tracing::info;

/// Performs full-origin navigations to other applications
///
/// Called by a gate instance when a decision sends the visitor to the client
/// portal. Browser hosts assign `window.location`; other hosts may record or
/// ignore the request.
pub trait ExternalNavigator: Send + Sync {
    fn navigate_external(&self, url: &str);
}

/// Shared handle type for navigators
pub type SharedNavigator = Arc<dyn ExternalNavigator>;

/// Navigator that only logs the navigation
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNavigator;

impl ExternalNavigator for TracingNavigator {
    fn navigate_external(&self, url: &str) {
        info!(url, "Navigating to external portal");
    }
}
