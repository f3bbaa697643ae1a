//! Client configuration from the environment.

use std::env;
use std::time::Duration;

use crate::error::{QueryError, QueryResult};

/// Connection settings for the hosted database.
#[derive(Debug, Clone)]
pub struct QueryClientConfig {
    /// Project URL, e.g. `https://abc.supabase.co`.
    pub base_url: String,
    /// Anonymous API key, sent as `apikey` and bearer token.
    pub api_key: String,
    pub request_timeout: Duration,
}

impl QueryClientConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            request_timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Read `SUPABASE_URL` and `SUPABASE_ANON_KEY` (a `.env` file is loaded
    /// first if present). The `VITE_` prefixed names are accepted too.
    pub fn from_env() -> QueryResult<Self> {
        dotenvy::dotenv().ok();

        let base_url = first_var(&["SUPABASE_URL", "VITE_SUPABASE_URL"])
            .ok_or_else(|| QueryError::Config("SUPABASE_URL is not set".to_string()))?;
        let api_key = first_var(&["SUPABASE_ANON_KEY", "VITE_SUPABASE_ANON_KEY"])
            .ok_or_else(|| QueryError::Config("SUPABASE_ANON_KEY is not set".to_string()))?;

        let mut config = Self::new(base_url, api_key);
        if let Some(secs) = first_var(&["QUERY_TIMEOUT_SECS"]).and_then(|s| s.parse::<u64>().ok()) {
            config.request_timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    /// Endpoint for a stored procedure.
    pub fn rpc_url(&self, function: &str) -> String {
        format!("{}/rest/v1/rpc/{}", self.base_url, function)
    }
}

fn first_var(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| env::var(name).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}
