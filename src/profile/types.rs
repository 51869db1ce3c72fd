//! Portal profile record

use crate::access_control::Role;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The portal's own record of a user
///
/// Only `role` and `onboarding_completed` drive authorization; every other
/// column is carried through untouched for the view that receives the profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    /// Identity-provider user id this profile belongs to.
    ///
    /// Stores keyed on a differently named column fill this in after
    /// decoding, so a row without it still decodes.
    #[serde(default)]
    pub auth_user_id: String,

    pub role: Role,

    /// A missing or null column reads as not completed
    #[serde(default, deserialize_with = "null_as_false")]
    pub onboarding_completed: bool,

    /// Remaining columns (name, avatar, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Profile {
    pub fn new(auth_user_id: impl Into<String>, role: Role, onboarding_completed: bool) -> Self {
        Self {
            id: None,
            auth_user_id: auth_user_id.into(),
            role,
            onboarding_completed,
            extra: Map::new(),
        }
    }

    /// Look up an untyped column
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<bool>::deserialize(deserializer).map(Option::unwrap_or_default)
}
