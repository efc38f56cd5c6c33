use std::collections::HashMap;
use std::time::{Duration, Instant};

use seocrawl_core::{CrawlError, FetchResult};
use tokio::sync::OnceCell;
use tracing::{debug, warn};
use url::Url;

/// A single-session HTTP client. The underlying connection pool is built
/// lazily on first use, guarded by a one-time-init lock, mirroring the
/// lazy-session pattern of the original implementation's `Fetcher`.
pub struct Fetcher {
    user_agent: String,
    timeout: Duration,
    client: OnceCell<reqwest::Client>,
}

impl Fetcher {
    pub fn new(user_agent: impl Into<String>, timeout: Duration) -> Self {
        Self {
            user_agent: user_agent.into(),
            timeout,
            client: OnceCell::new(),
        }
    }

    async fn client(&self) -> Result<&reqwest::Client, CrawlError> {
        self.client
            .get_or_try_init(|| async {
                reqwest::Client::builder()
                    .timeout(self.timeout)
                    .user_agent(self.user_agent.clone())
                    .redirect(reqwest::redirect::Policy::limited(10))
                    .build()
                    .map_err(|e| CrawlError::Network(e.to_string()))
            })
            .await
    }

    /// Fetch `url`. Never returns an `Err`: transport failures are folded
    /// into `FetchResult::error` so the crawl manager can always emit a
    /// `PageData` for the attempt.
    pub async fn fetch(&self, url: &Url) -> FetchResult {
        let start = Instant::now();

        let client = match self.client().await {
            Ok(c) => c,
            Err(e) => {
                return FetchResult {
                    url: url.clone(),
                    status: None,
                    headers: HashMap::new(),
                    body: None,
                    elapsed: start.elapsed(),
                    redirected_url: None,
                    error: Some(e.to_string()),
                };
            }
        };

        debug!(url = %url, "fetching");
        let resp = match client.get(url.clone()).send().await {
            Ok(r) => r,
            Err(e) => {
                let error = if e.is_timeout() {
                    "timeout".to_string()
                } else {
                    e.to_string()
                };
                warn!(url = %url, error = %error, "fetch failed");
                return FetchResult {
                    url: url.clone(),
                    status: None,
                    headers: HashMap::new(),
                    body: None,
                    elapsed: start.elapsed(),
                    redirected_url: None,
                    error: Some(error),
                };
            }
        };

        let status = resp.status().as_u16();
        let final_url = resp.url().clone();
        let redirected_url = (final_url.as_str() != url.as_str()).then_some(final_url);

        let mut headers = HashMap::new();
        for (k, v) in resp.headers() {
            if let Ok(val) = v.to_str() {
                headers.insert(k.as_str().to_ascii_lowercase(), val.to_string());
            }
        }

        let body = match resp.bytes().await {
            Ok(b) => b.to_vec(),
            Err(e) => {
                return FetchResult {
                    url: url.clone(),
                    status: Some(status),
                    headers,
                    body: None,
                    elapsed: start.elapsed(),
                    redirected_url,
                    error: Some(e.to_string()),
                };
            }
        };

        FetchResult {
            url: url.clone(),
            status: Some(status),
            headers,
            body: Some(body),
            elapsed: start.elapsed(),
            redirected_url,
            error: None,
        }
    }

    /// Idempotent: the connection pool is released when the client drops,
    /// so there is nothing extra to tear down here beyond documenting the
    /// call site for callers that expect an explicit close.
    pub async fn close(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    async fn serve_once(response: &'static str) -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        });
        Url::parse(&format!("http://{}/", addr)).unwrap()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn fetch_reads_status_and_body() {
        let url = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 13\r\nConnection: close\r\n\r\n<html>hi</html>",
        )
        .await;

        let fetcher = Fetcher::new("seocrawl-test", Duration::from_secs(2));
        let result = fetcher.fetch(&url).await;

        assert_eq!(result.status, Some(200));
        assert_eq!(result.content_type(), Some("text/html"));
        assert_eq!(result.body.as_deref(), Some(&b"<html>hi</html>"[..]));
        assert!(result.error.is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn fetch_reports_timeout() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            // Accept and then never write a response.
            let _ = listener.accept().await;
            tokio::time::sleep(Duration::from_secs(5)).await;
        });
        let url = Url::parse(&format!("http://{}/", addr)).unwrap();

        let fetcher = Fetcher::new("seocrawl-test", Duration::from_millis(100));
        let result = fetcher.fetch(&url).await;

        assert_eq!(result.status, None);
        assert_eq!(result.error.as_deref(), Some("timeout"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn fetch_reports_connection_failure() {
        let fetcher = Fetcher::new("seocrawl-test", Duration::from_secs(1));
        let url = Url::parse("http://127.0.0.1:1").unwrap();
        let result = fetcher.fetch(&url).await;

        assert_eq!(result.status, None);
        assert!(result.error.is_some());
    }
}
