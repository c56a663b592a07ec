use crate::error::ImportError;
use log::debug;
use reqwest::{Client, Url};
use std::time::Duration;

/// Browser-like user agent; many recipe sites reject obvious bots.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub struct RequestFetcher {
    client: Client,
    timeout: Duration,
}

impl RequestFetcher {
    pub fn new(timeout: Duration, user_agent: Option<&str>) -> Result<Self, ImportError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent.unwrap_or(DEFAULT_USER_AGENT))
            .build()?;

        Ok(Self { client, timeout })
    }

    /// Fetch a page body. Only http and https URLs are accepted, and any
    /// non-2xx status is an error.
    pub async fn fetch(&self, url: &str) -> Result<String, ImportError> {
        let parsed = Url::parse(url).map_err(|e| ImportError::InvalidUrl(format!("{url}: {e}")))?;
        match parsed.scheme() {
            "http" | "https" => {}
            other => return Err(ImportError::UnsupportedScheme(other.to_string())),
        }

        debug!("Fetching {} (timeout {:?})", parsed, self.timeout);
        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImportError::HttpStatus(status.as_u16()));
        }

        response.text().await.map_err(|e| self.map_error(e))
    }

    fn map_error(&self, err: reqwest::Error) -> ImportError {
        if err.is_timeout() {
            ImportError::Timeout(self.timeout.as_millis() as u64)
        } else {
            ImportError::FetchError(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn fetcher() -> RequestFetcher {
        RequestFetcher::new(Duration::from_secs(5), None).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_success_sends_user_agent() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/recipe")
            .match_header("user-agent", DEFAULT_USER_AGENT)
            .with_status(200)
            .with_body("<html>ok</html>")
            .create_async()
            .await;

        let body = fetcher()
            .fetch(&format!("{}/recipe", server.url()))
            .await
            .unwrap();
        assert_eq!(body, "<html>ok</html>");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_custom_user_agent() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .match_header("user-agent", "RecipeBot/2.0")
            .with_status(200)
            .with_body("hi")
            .create_async()
            .await;

        let fetcher = RequestFetcher::new(Duration::from_secs(5), Some("RecipeBot/2.0")).unwrap();
        fetcher.fetch(&format!("{}/", server.url())).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_http_error_status() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let err = fetcher()
            .fetch(&format!("{}/missing", server.url()))
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::HttpStatus(404)));
        assert_eq!(err.to_string(), "HTTP request failed with status 404");
    }

    #[tokio::test]
    async fn test_fetch_rejects_other_schemes() {
        let err = fetcher().fetch("ftp://example.com/recipe").await.unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedScheme(ref s) if s == "ftp"));

        let err = fetcher().fetch("file:///etc/passwd").await.unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedScheme(_)));
    }

    #[tokio::test]
    async fn test_fetch_timeout() {
        // accepted by the kernel backlog, never answered
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let fetcher = RequestFetcher::new(Duration::from_millis(100), None).unwrap();
        let err = fetcher.fetch(&format!("http://{addr}/slow")).await.unwrap_err();
        assert!(matches!(err, ImportError::Timeout(100)), "got {err:?}");
        assert_eq!(err.to_string(), "Request timed out after 100ms");
        drop(listener);
    }

    #[tokio::test]
    async fn test_fetch_invalid_url() {
        let err = fetcher().fetch("not a url").await.unwrap_err();
        assert!(matches!(err, ImportError::InvalidUrl(_)));
    }
}
