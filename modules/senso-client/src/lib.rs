//! Senso API client: claim accuracy evaluation, remediation strategy
//! derivation, and brand-aligned content generation.

pub mod error;

pub use error::{Result, SensoError};

use std::time::Duration;

use serde::Deserialize;
use serde_json::json;
use tracing::info;

/// Verdict on a single claim about a brand.
#[derive(Debug, Clone, Deserialize)]
pub struct Evaluation {
    /// Fraction of the claim judged accurate, 0–1.
    #[serde(default)]
    pub accuracy: f64,
    /// Sources backing the verdict.
    #[serde(default)]
    pub citations: Vec<String>,
    /// Facts the claim omits or contradicts.
    #[serde(default)]
    pub missing: Vec<String>,
}

/// Correction strategy plus draft content for one inaccurate claim.
#[derive(Debug, Clone, Deserialize)]
pub struct Remediation {
    #[serde(default)]
    pub strategy: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Generated {
    #[serde(default)]
    pub text: String,
}

pub struct SensoClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SensoClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
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

    /// Evaluate a claim's accuracy against what is known about a brand.
    pub async fn evaluate(&self, claim: &str, brand: &str) -> Result<Evaluation> {
        let payload = json!({
            "content": claim,
            "brand": brand,
            "content_type": "text",
        });
        info!(brand, "Senso evaluate");
        self.post("/v1/evaluate", &payload).await
    }

    /// Derive a correction strategy for an inaccurate claim.
    pub async fn remediate(&self, claim: &str, brand: &str, context: &str) -> Result<Remediation> {
        let payload = json!({
            "claim": claim,
            "brand": brand,
            "context": context,
        });
        info!(brand, "Senso remediate");
        self.post("/v1/remediate", &payload).await
    }

    /// Generate brand-aligned replacement content.
    pub async fn generate(&self, prompt: &str, brand: &str) -> Result<Generated> {
        let payload = json!({
            "prompt": prompt,
            "brand": brand,
        });
        info!(brand, "Senso generate");
        self.post("/v1/generate", &payload).await
    }

    async fn post<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        payload: &serde_json::Value,
    ) -> Result<T> {
        let url = format!("{}{path}", self.base_url);
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
            return Err(SensoError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp.json().await?)
    }
}
