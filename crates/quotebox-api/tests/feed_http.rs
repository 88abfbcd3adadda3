use quotebox_api::{ApiError, FeedClient, RetryConfig};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Answers every request with the same canned response and records the
/// request lines it saw
struct StubServer {
    url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    async fn start(status: &'static str, body: String) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let seen = requests.clone();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut chunk).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                    }
                }

                let request = String::from_utf8_lossy(&buf);
                let line = request.lines().next().unwrap_or_default().to_string();
                seen.lock().unwrap().push(line);

                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        Self {
            url: format!("http://{}/posts", addr),
            requests,
        }
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

fn fast_retries(max_retries: u32) -> RetryConfig {
    RetryConfig {
        max_retries,
        initial_delay_ms: 1,
        max_delay_ms: 5,
        backoff_multiplier: 2.0,
    }
}

fn posts_payload(count: usize) -> String {
    let posts: Vec<String> = (1..=count)
        .map(|i| format!(r#"{{"userId": 1, "id": {}, "title": "post {}", "body": "..."}}"#, i, i))
        .collect();
    format!("[{}]", posts.join(","))
}

#[tokio::test]
async fn test_fetch_requests_limit_and_returns_first_posts() {
    // The stub ignores _limit, so the client has to truncate too
    let server = StubServer::start("200 OK", posts_payload(8)).await;
    let client = FeedClient::with_retry_config(&server.url, fast_retries(3)).unwrap();

    let posts = client.fetch_posts(5).await.unwrap();

    assert_eq!(posts.len(), 5);
    assert_eq!(posts[0].title, "post 1");
    assert_eq!(posts[4].title, "post 5");

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert!(
        requests[0].starts_with("GET /posts?_limit=5 "),
        "unexpected request line: {}",
        requests[0]
    );
}

#[tokio::test]
async fn test_not_found_is_attempted_once() {
    let server = StubServer::start("404 Not Found", "{}".to_string()).await;
    let client = FeedClient::with_retry_config(&server.url, fast_retries(3)).unwrap();

    let err = client.fetch_posts(5).await.unwrap_err();

    match err {
        ApiError::RequestFailed(message) => assert!(message.contains("404"), "{}", message),
        other => panic!("expected RequestFailed, got {:?}", other),
    }
    assert_eq!(server.requests().len(), 1);
}

#[tokio::test]
async fn test_unavailable_is_retried_up_to_max_retries() {
    let server = StubServer::start("503 Service Unavailable", "down for maintenance".to_string()).await;
    let client = FeedClient::with_retry_config(&server.url, fast_retries(2)).unwrap();

    let err = client.fetch_posts(5).await.unwrap_err();

    match err {
        ApiError::ServerError { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "down for maintenance");
        }
        other => panic!("expected ServerError, got {:?}", other),
    }
    // First attempt plus two retries
    assert_eq!(server.requests().len(), 3);
}

#[tokio::test]
async fn test_garbage_body_is_a_parse_error_without_retry() {
    let server = StubServer::start("200 OK", "<html>not json</html>".to_string()).await;
    let client = FeedClient::with_retry_config(&server.url, fast_retries(3)).unwrap();

    let err = client.fetch_posts(5).await.unwrap_err();

    assert!(matches!(err, ApiError::ParseError(_)));
    assert_eq!(server.requests().len(), 1);
}
