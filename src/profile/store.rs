//! Profile store trait

use crate::error::ProfileError;
use crate::identity::Session;
use crate::profile::types::Profile;
// async_trait required for dyn-compatibility with Arc<dyn ProfileStore>
use async_trait::async_trait;
use std::sync::Arc;

/// Source of portal profiles
///
/// Implementations are queried once per authorization pass; results are not
/// cached across passes.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch the profile belonging to the session's user.
    ///
    /// `Ok(None)` means no profile exists for that user. The session is
    /// passed so stores guarded by row-level security can query as the user.
    async fn profile_for(&self, session: &Session) -> Result<Option<Profile>, ProfileError>;

    /// Get a description of the store (for logging)
    fn store_type(&self) -> &'static str;
}

/// Shared handle type for profile stores
pub type SharedProfileStore = Arc<dyn ProfileStore>;
