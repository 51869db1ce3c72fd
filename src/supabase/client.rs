//! Supabase HTTP client
//!
//! Thin typed client over the Supabase auth (`/auth/v1`) and REST
//! (`/rest/v1`) endpoints used by the identity and profile adapters.

use crate::config::SupabaseConfig;
use crate::error::{SupabaseError, SupabaseResult};
use crate::util::SecretString;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Supabase API client
pub struct SupabaseClient {
    http: Client,
    base_url: String,
    anon_key: Option<SecretString>,
    max_retries: u32,
}

impl SupabaseClient {
    /// Create a new client from configuration
    pub fn new(config: &SupabaseConfig) -> SupabaseResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent(format!("portal-gate/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(SupabaseError::Request)?;

        Ok(Self {
            http,
            base_url: config.base_url().to_string(),
            anon_key: config.anon_key.clone(),
            max_retries: config.max_retries,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the project key and the caller's bearer token.
    ///
    /// Without a user token the anon key doubles as the bearer, which is how
    /// Supabase expects anonymous requests.
    fn authorize(&self, mut request: RequestBuilder, bearer: Option<&SecretString>) -> RequestBuilder {
        if let Some(key) = &self.anon_key {
            request = request.header("apikey", key.expose_secret());
        }
        match bearer.or(self.anon_key.as_ref()) {
            Some(token) => request.header(
                "Authorization",
                format!("Bearer {}", token.expose_secret()),
            ),
            None => request,
        }
    }

    /// Execute a request with retries
    async fn execute(&self, request: RequestBuilder) -> SupabaseResult<Response> {
        let mut last_error: Option<SupabaseError> = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = retry_delay(attempt, last_error.as_ref());
                tokio::time::sleep(delay).await;
                debug!("Retrying request (attempt {})", attempt + 1);
            }

            let req = request.try_clone().ok_or_else(|| {
                SupabaseError::InvalidResponse("Cannot clone request".to_string())
            })?;

            let error = match req.send().await {
                Ok(response) => match Self::handle_response(response).await {
                    Ok(response) => return Ok(response),
                    Err(e) => e,
                },
                Err(e) => {
                    warn!("Request failed: {}", e);
                    SupabaseError::Request(e)
                }
            };

            let retry = is_retryable(&error);
            last_error = Some(error);
            if !retry {
                break;
            }
        }

        Err(last_error
            .unwrap_or_else(|| SupabaseError::InvalidResponse("Unknown error".to_string())))
    }

    async fn handle_response(response: Response) -> SupabaseResult<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(60);
            return Err(SupabaseError::RateLimited { retry_after });
        }

        let body = response.text().await.unwrap_or_default();
        Err(SupabaseError::from_response(status.as_u16(), &body))
    }

    /// Make a GET request and decode the JSON body
    #[instrument(skip(self, bearer), fields(endpoint = %endpoint))]
    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        bearer: Option<&SecretString>,
    ) -> SupabaseResult<T> {
        let request = self.authorize(self.http.get(self.url(endpoint)), bearer);

        let response = self.execute(request).await?;
        let data = response.json().await.map_err(|e| {
            SupabaseError::InvalidResponse(format!("Failed to parse response: {}", e))
        })?;

        Ok(data)
    }
}

/// Upper bound on a server-requested `retry-after` wait
const MAX_RETRY_AFTER: Duration = Duration::from_secs(30);

/// Wait before retry `attempt`: the server's `retry-after` when rate limited,
/// exponential backoff otherwise
fn retry_delay(attempt: u32, previous: Option<&SupabaseError>) -> Duration {
    match previous {
        Some(SupabaseError::RateLimited { retry_after }) => {
            Duration::from_secs(*retry_after).min(MAX_RETRY_AFTER)
        }
        _ => Duration::from_millis(100 * 2u64.pow(attempt.saturating_sub(1))),
    }
}

/// Check if an error is retryable
fn is_retryable(error: &SupabaseError) -> bool {
    match error {
        SupabaseError::Request(e) => e.is_timeout() || e.is_connect(),
        SupabaseError::RateLimited { .. } => true,
        SupabaseError::Api { status, .. } => *status >= 500,
        _ => false,
    }
}
