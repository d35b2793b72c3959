//! Tavily API client: web search and full-content extraction.
//!
//! BrandGuard uses search to find the source websites AI models cite about
//! a brand, and extract to pull full page content from flagged URLs.

pub mod error;
pub mod types;

pub use error::{Result, TavilyError};
pub use types::{ExtractResponse, SearchOptions, SearchResponse, SearchResult};

use std::time::Duration;

use serde_json::json;
use tracing::info;

const MAX_EXTRACT_URLS: usize = 20;

pub struct TavilyClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl TavilyClient {
    pub fn new(api_key: &str) -> Self {
        Self::with_base_url("https://api.tavily.com", api_key)
    }

    pub fn with_base_url(base_url: &str, api_key: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Search the web for brand-related claims.
    pub async fn search(&self, query: &str, opts: &SearchOptions) -> Result<SearchResponse> {
        if query.trim().is_empty() {
            return Err(TavilyError::InvalidRequest(
                "search query cannot be empty".to_string(),
            ));
        }

        let mut payload = json!({
            "query": query,
            "topic": opts.topic,
            "search_depth": opts.search_depth,
            "max_results": opts.max_results,
            "include_answer": opts.include_answer,
        });
        if let Some(range) = &opts.time_range {
            payload["time_range"] = json!(range);
        }

        info!(query, depth = %opts.search_depth, "Tavily search");
        self.post("search", &payload).await
    }

    /// Extract full content from specific URLs (at most 20 per request).
    pub async fn extract(&self, urls: &[String], query: Option<&str>) -> Result<ExtractResponse> {
        if urls.is_empty() {
            return Err(TavilyError::InvalidRequest(
                "at least one URL is required for extraction".to_string(),
            ));
        }
        if urls.len() > MAX_EXTRACT_URLS {
            return Err(TavilyError::InvalidRequest(format!(
                "extract supports at most {MAX_EXTRACT_URLS} URLs per request"
            )));
        }

        let mut payload = json!({
            "urls": urls,
            "extract_depth": "basic",
            "format": "markdown",
        });
        if let Some(q) = query {
            payload["query"] = json!(q);
        }

        info!(count = urls.len(), "Tavily extract");
        self.post("extract", &payload).await
    }

    async fn post<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        payload: &serde_json::Value,
    ) -> Result<T> {
        let url = format!("{}/{endpoint}", self.base_url);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(payload)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(TavilyError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_query_is_rejected_before_any_request() {
        let client = TavilyClient::new("test-key");
        let err = client
            .search("   ", &SearchOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, TavilyError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn empty_url_list_is_rejected_before_any_request() {
        let client = TavilyClient::new("test-key");
        let err = client.extract(&[], None).await.unwrap_err();
        assert!(matches!(err, TavilyError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn oversized_url_list_is_rejected() {
        let client = TavilyClient::new("test-key");
        let urls: Vec<String> = (0..21).map(|i| format!("https://example.com/{i}")).collect();
        let err = client.extract(&urls, None).await.unwrap_err();
        assert!(matches!(err, TavilyError::InvalidRequest(_)));
    }
}
