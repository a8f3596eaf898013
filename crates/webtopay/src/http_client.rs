use crate::codec::build_query;
use crate::constants::HTTP_TIMEOUT_SECS;
use crate::error::{Result, WebToPayError};
use std::future::Future;
use std::time::Duration;

/// Fetches a URL and returns the response body.
///
/// The catalog provider, the SMS answer sender and public-key discovery all
/// go through this trait, so tests can swap in an in-memory implementation.
pub trait Transport: Send + Sync {
    /// GET `url` with `query` appended, returning the trimmed body.
    fn get(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> impl Future<Output = Result<String>> + Send;
}

/// Append `query` to `url`, using `&` when `url` already has a query part.
pub fn with_query(url: &str, query: &[(&str, &str)]) -> String {
    if query.is_empty() {
        return url.to_string();
    }
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}{}", build_query(query.iter().copied()))
}

/// Default [`Transport`] backed by `reqwest`.
///
/// Redirects are not followed and the HTTP status is not inspected: the
/// gateway's answers are judged by their body.
#[derive(Debug, Clone)]
pub struct WebClient {
    http: reqwest::Client,
}

impl WebClient {
    pub fn new() -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| WebToPayError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http })
    }

    /// Create a client with a custom reqwest::Client.
    pub fn with_http_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

impl Transport for WebClient {
    async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<String> {
        let full_url = with_query(url, query);
        tracing::debug!(url = %full_url, "GET");

        let resp = self
            .http
            .get(&full_url)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(url, error = %e, "HTTP request failed");
                WebToPayError::Transport(format!("request to {url} failed: {e}"))
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            WebToPayError::Transport(format!("failed to read body from {url}: {e}"))
        })?;

        if !status.is_success() {
            tracing::warn!(url, status = status.as_u16(), "Non-success HTTP status");
        }
        Ok(body.trim().to_string())
    }
}
