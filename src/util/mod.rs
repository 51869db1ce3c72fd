//! Utility types shared across the crate.

mod secret;

pub use secret::SecretString;

use std::fmt::Display;

/// Builder for URL query strings.
///
/// Values are percent-encoded; keys are taken as-is. Used to assemble
/// PostgREST filters such as `?select=*&auth_user_id=eq.<id>`.
#[derive(Default)]
pub struct QueryBuilder {
    params: Vec<(String, String)>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter.
    pub fn param(mut self, key: &str, value: impl Display) -> Self {
        self.params.push((
            key.to_string(),
            urlencoding::encode(&value.to_string()).into_owned(),
        ));
        self
    }

    /// Add a parameter whose value is already in query form (e.g. `*`).
    pub fn raw(mut self, key: &str, value: &str) -> Self {
        self.params.push((key.to_string(), value.to_string()));
        self
    }

    /// Add a PostgREST equality filter: `column=eq.<value>`.
    pub fn eq(self, column: &str, value: impl Display) -> Self {
        self.param(column, format!("eq.{}", value))
    }

    /// Build the query string, `""` when empty, otherwise `?k=v&...`.
    pub fn build(self) -> String {
        if self.params.is_empty() {
            String::new()
        } else {
            format!(
                "?{}",
                self.params
                    .into_iter()
                    .map(|(k, v)| format!("{k}={v}"))
                    .collect::<Vec<_>>()
                    .join("&")
            )
        }
    }
}
