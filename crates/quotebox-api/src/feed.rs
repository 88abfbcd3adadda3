use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::retry::{is_retryable_status, with_retry, RetryConfig, Retryable};

/// Placeholder JSON service standing in for a real quote server
pub const DEFAULT_FEED_URL: &str = "https://jsonplaceholder.typicode.com/posts";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Feed request failed: {0}")]
    RequestFailed(String),

    #[error("Feed server returned {status}: {body}")]
    ServerError { status: u16, body: String },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Feed payload could not be parsed: {0}")]
    ParseError(#[from] serde_json::Error),
}

impl Retryable for ApiError {
    fn is_retryable(&self) -> bool {
        match self {
            ApiError::NetworkError(_) | ApiError::ServerError { .. } => true,
            ApiError::RequestFailed(_) | ApiError::ParseError(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// One record from the feed. Only `title` matters to us.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedPost {
    #[serde(default)]
    pub id: Option<u64>,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
}

/// Parse a feed payload, keeping at most `limit` records
pub fn parse_posts(payload: &str, limit: usize) -> Result<Vec<FeedPost>> {
    let mut posts: Vec<FeedPost> = serde_json::from_str(payload)?;
    posts.truncate(limit);
    Ok(posts)
}

pub struct FeedClient {
    client: reqwest::Client,
    endpoint: String,
    retry_config: RetryConfig,
}

impl FeedClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        Self::with_retry_config(endpoint, RetryConfig::default())
    }

    pub fn with_retry_config(endpoint: impl Into<String>, retry_config: RetryConfig) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("QuoteBox/0.1.0"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(15))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            retry_config,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch the first `limit` posts from the feed
    pub async fn fetch_posts(&self, limit: usize) -> Result<Vec<FeedPost>> {
        let limit_param = limit.to_string();

        let posts = with_retry(&self.retry_config, || async {
            debug!("GET {} (_limit={})", self.endpoint, limit);
            let response = self
                .client
                .get(&self.endpoint)
                .query(&[("_limit", limit_param.as_str())])
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                if is_retryable_status(status) {
                    return Err(ApiError::ServerError {
                        status: status.as_u16(),
                        body,
                    });
                }
                return Err(ApiError::RequestFailed(format!("Status {}: {}", status, body)));
            }

            let payload = response.text().await?;
            parse_posts(&payload, limit)
        })
        .await?;

        info!("Fetched {} posts from {}", posts.len(), self.endpoint);
        Ok(posts)
    }
}
