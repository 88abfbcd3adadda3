// Feed provider - bridges the HTTP client with the RemoteSource trait
use async_trait::async_trait;
use quotebox_api::{FeedClient, FeedPost, RetryConfig};

use crate::{config::SyncConfig, models::Quote, sync::RemoteSource, Result};

/// Pulls a fixed-size batch of posts and turns each title into a quote
pub struct FeedSource {
    client: FeedClient,
    batch_size: usize,
    category: String,
}

impl FeedSource {
    pub fn new(client: FeedClient, batch_size: usize, category: impl Into<String>) -> Self {
        Self {
            client,
            batch_size,
            category: category.into(),
        }
    }

    pub fn from_config(config: &SyncConfig) -> Result<Self> {
        let retry = RetryConfig {
            max_retries: config.max_retries,
            ..RetryConfig::default()
        };
        let client = FeedClient::with_retry_config(config.endpoint.clone(), retry)?;
        Ok(Self::new(client, config.batch_size, config.category.clone()))
    }
}

#[async_trait]
impl RemoteSource for FeedSource {
    async fn fetch_quotes(&self) -> Result<Vec<Quote>> {
        let posts = self.client.fetch_posts(self.batch_size).await?;
        Ok(posts_to_quotes(posts, &self.category))
    }
}

/// Every post becomes a quote with its title as text
pub fn posts_to_quotes(posts: Vec<FeedPost>, category: &str) -> Vec<Quote> {
    posts
        .into_iter()
        .map(|post| Quote::new(post.title, category))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_posts_become_server_quotes() {
        let posts = quotebox_api::parse_posts(
            r#"[{"id": 1, "title": "sunt aut facere"}, {"id": 2, "title": "qui est esse"}]"#,
            5,
        )
        .unwrap();

        assert_eq!(
            posts_to_quotes(posts, "Server"),
            vec![
                Quote::new("sunt aut facere", "Server"),
                Quote::new("qui est esse", "Server"),
            ]
        );
    }

    #[test]
    fn test_from_config_uses_endpoint() {
        let config = SyncConfig {
            endpoint: "http://localhost:9/posts".to_string(),
            ..SyncConfig::default()
        };
        let source = FeedSource::from_config(&config).unwrap();
        assert_eq!(source.client.endpoint(), "http://localhost:9/posts");
        assert_eq!(source.batch_size, 5);
        assert_eq!(source.category, "Server");
    }

    #[tokio::test]
    async fn test_unreachable_feed_is_a_sync_error() {
        let config = SyncConfig {
            // Port 9 (discard) is closed on any sane test machine
            endpoint: "http://127.0.0.1:9/posts".to_string(),
            max_retries: 0,
            ..SyncConfig::default()
        };
        let source = FeedSource::from_config(&config).unwrap();
        let err = source.fetch_quotes().await.unwrap_err();
        assert!(matches!(err, crate::Error::RemoteSync(_)));
    }
}
