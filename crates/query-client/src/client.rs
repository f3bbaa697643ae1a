//! HTTP client for the database's stored-procedure endpoint.

use async_trait::async_trait;
use reqwest::{header, Client};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use map_common::RawPoint;

use crate::config::QueryClientConfig;
use crate::error::{QueryError, QueryResult};
use crate::service::QueryService;

/// Calls stored procedures with `POST {base}/rest/v1/rpc/{function}`.
#[derive(Debug, Clone)]
pub struct RpcQueryClient {
    client: Client,
    config: QueryClientConfig,
}

impl RpcQueryClient {
    pub fn new(config: QueryClientConfig) -> QueryResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .pool_max_idle_per_host(4)
            .tcp_nodelay(true)
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &QueryClientConfig {
        &self.config
    }
}

#[async_trait]
impl QueryService for RpcQueryClient {
    #[instrument(skip(self, args))]
    async fn rpc(&self, function: &'static str, args: Value) -> QueryResult<Vec<RawPoint>> {
        let url = self.config.rpc_url(function);

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.config.api_key)
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.config.api_key),
            )
            .json(&args)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = upstream_message(&body).unwrap_or_else(|| status.to_string());
            warn!(status = status.as_u16(), message = %message, "Stored procedure failed");
            return Err(QueryError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let body: Value = response.json().await?;
        let rows = rows_from_value(body)?;
        debug!(rows = rows.len(), "Stored procedure returned");
        Ok(rows)
    }
}

/// Error text from a PostgREST-style error body.
fn upstream_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["message", "error", "hint"]
        .iter()
        .find_map(|key| value.get(key).and_then(Value::as_str))
        .map(str::to_string)
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
}

/// Interpret a response body as result rows.
///
/// `null` means no rows. A bare object is a single row.
pub fn rows_from_value(body: Value) -> QueryResult<Vec<RawPoint>> {
    match body {
        Value::Null => Ok(Vec::new()),
        Value::Object(row) => Ok(vec![row]),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Object(row) => Ok(row),
                other => Err(QueryError::Decode(format!(
                    "row {} is not an object: {}",
                    i, other
                ))),
            })
            .collect(),
        other => Err(QueryError::Decode(format!(
            "expected an array of rows, got {}",
            other
        ))),
    }
}
