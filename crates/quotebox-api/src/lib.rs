// HTTP client for the remote quote feed
pub mod feed;
pub mod retry;

pub use feed::{parse_posts, ApiError, FeedClient, FeedPost, DEFAULT_FEED_URL};
pub use retry::RetryConfig;
