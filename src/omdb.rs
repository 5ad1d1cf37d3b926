use std::{num::NonZeroU32, sync::Arc};

use async_trait::async_trait;
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use serde_json::Value;
use tracing::debug;

use crate::{
    error::{AppError, AppResult},
    models::MovieRecord,
};

/// Source of canonical movie metadata.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    async fn fetch(&self, title: &str) -> AppResult<MovieRecord>;
}

pub struct OmdbClient {
    client: wreq::Client,
    api_key: String,
    base_url: String,
    limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl OmdbClient {
    pub fn new(client: wreq::Client, api_key: String, base_url: String, rps: u32) -> Self {
        if api_key.trim().is_empty() {
            tracing::warn!("Using mock OMDb data - no OMDB_API_KEY provided");
        }

        let quota = Quota::per_second(NonZeroU32::new(rps).unwrap_or(NonZeroU32::MIN));
        let limiter = Arc::new(RateLimiter::direct(quota));
        Self { client, api_key, base_url, limiter }
    }
}

#[async_trait]
impl MetadataProvider for OmdbClient {
    async fn fetch(&self, title: &str) -> AppResult<MovieRecord> {
        // Echo the search title back when running without credentials
        if self.api_key.trim().is_empty() {
            return Ok(MovieRecord { title: title.trim().to_string(), ..Default::default() });
        }

        self.limiter.until_ready().await;

        debug!(title = %title, "fetching OMDb record");
        let url = format!("{}/", self.base_url.trim_end_matches('/'));
        let body: Value = self
            .client
            .get(url)
            .query(&[("apikey", self.api_key.as_str()), ("t", title), ("type", "movie")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        parse_response(body)
    }
}

/// OMDb answers lookups that miss with HTTP 200 and `"Response": "False"`.
fn parse_response(body: Value) -> AppResult<MovieRecord> {
    if body.get("Response").and_then(Value::as_str) == Some("False") {
        let reason = body.get("Error").and_then(Value::as_str).unwrap_or("unknown error");
        return Err(AppError::Provider(anyhow::anyhow!("{reason}")));
    }
    serde_json::from_value(body).map_err(|e| AppError::Provider(e.into()))
}
