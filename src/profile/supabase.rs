//! PostgREST-backed profile store

use crate::config::SupabaseConfig;
use crate::error::ProfileError;
use crate::identity::Session;
use crate::profile::store::ProfileStore;
use crate::profile::types::Profile;
use crate::supabase::SupabaseClient;
use crate::util::QueryBuilder;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Reads profiles from `/rest/v1/<table>` as the signed-in user
pub struct SupabaseProfileStore {
    client: Arc<SupabaseClient>,
    table: String,
    user_id_column: String,
}

impl SupabaseProfileStore {
    pub fn new(client: Arc<SupabaseClient>, config: &SupabaseConfig) -> Self {
        Self {
            client,
            table: config.profiles_table.clone(),
            user_id_column: config.user_id_column.clone(),
        }
    }

    fn endpoint(&self, user_id: &str) -> String {
        // limit=2 is enough to tell "exactly one" from "several"
        let query = QueryBuilder::new()
            .raw("select", "*")
            .eq(&self.user_id_column, user_id)
            .param("limit", 2)
            .build();
        format!("/rest/v1/{}{}", self.table, query)
    }
}

#[async_trait]
impl ProfileStore for SupabaseProfileStore {
    async fn profile_for(&self, session: &Session) -> Result<Option<Profile>, ProfileError> {
        let user_id = session.user_id();
        let mut rows: Vec<Profile> = self
            .client
            .get(&self.endpoint(user_id), Some(&session.access_token))
            .await?;

        debug!(user_id, rows = rows.len(), "Profile query returned");

        match rows.len() {
            0 => Ok(None),
            1 => Ok(rows.pop().map(|mut profile| {
                // The row matched on user_id_column, which may not be auth_user_id
                if profile.auth_user_id.is_empty() {
                    profile.auth_user_id = user_id.to_string();
                }
                profile
            })),
            count => Err(ProfileError::Ambiguous {
                user_id: user_id.to_string(),
                count,
            }),
        }
    }

    fn store_type(&self) -> &'static str {
        "Supabase PostgREST"
    }
}
