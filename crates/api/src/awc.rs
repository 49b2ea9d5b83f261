//! Aviation Weather Center client
//!
//! Thin HTTP client for the upstream METAR endpoint. Every call carries the
//! configured User-Agent and asks for the standard 300 second cache window;
//! transient failures are retried with exponential backoff before they are
//! reported to the batch layer.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::header::CACHE_CONTROL;
use reqwest::StatusCode;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use serde_json::Value;

use metar_map_core::CACHE_MAX_AGE_SECS;

use crate::geo::BoundingBox;
use crate::observations::{parse_records, RawMetar};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("request failed: {0}")]
    Middleware(#[from] reqwest_middleware::Error),
    #[error("weather source returned status {0}")]
    Status(StatusCode),
}

/// Seam between the aggregation pipeline and the upstream; mocked in the
/// integration tests.
#[async_trait]
pub trait MetarSource: Send + Sync {
    async fn by_ids(&self, ids: &[String]) -> Result<Vec<RawMetar>, Error>;
    async fn by_bbox(&self, bbox: &BoundingBox) -> Result<Vec<RawMetar>, Error>;
}

pub struct AwcClient {
    client: ClientWithMiddleware,
    base_url: String,
}

impl AwcClient {
    pub fn new(base_url: String, user_agent: &str) -> Result<Self, Error> {
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(3);
        let client = ClientBuilder::new(
            reqwest::Client::builder().user_agent(user_agent).build()?,
        )
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build();

        Ok(Self { client, base_url })
    }

    async fn fetch(&self, query: &[(&str, String)]) -> Result<Vec<RawMetar>, Error> {
        debug!("requesting {} with {:?}", self.base_url, query);
        let response = self
            .client
            .get(&self.base_url)
            .query(query)
            .header(CACHE_CONTROL, format!("max-age={}", CACHE_MAX_AGE_SECS))
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Status(response.status()));
        }

        let payload: Value = response.json().await?;
        Ok(parse_records(payload))
    }
}

#[async_trait]
impl MetarSource for AwcClient {
    async fn by_ids(&self, ids: &[String]) -> Result<Vec<RawMetar>, Error> {
        self.fetch(&[("ids", ids.join(",")), ("format", "json".to_string())])
            .await
    }

    async fn by_bbox(&self, bbox: &BoundingBox) -> Result<Vec<RawMetar>, Error> {
        self.fetch(&[("bbox", bbox.to_query()), ("format", "json".to_string())])
            .await
    }
}
