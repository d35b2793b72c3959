//! Modulate API client: audio transcription for voice brand monitoring.
//!
//! Transcripts come back as utterances tagged with speaker, emotion, and
//! timestamps; `Transcript::brand_mentions` filters the ones that talk
//! about a brand.

pub mod error;

pub use error::{ModulateError, Result};

use std::time::Duration;

use serde::Deserialize;
use serde_json::json;
use tracing::info;

/// One speaker turn in a transcript.
#[derive(Debug, Clone, Deserialize)]
pub struct Utterance {
    #[serde(default)]
    pub speaker: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub emotion: String,
    #[serde(default)]
    pub start_time: f64,
    #[serde(default)]
    pub end_time: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Transcript {
    #[serde(default)]
    pub utterances: Vec<Utterance>,
}

impl Transcript {
    /// Utterances mentioning the brand, matched by case-insensitive
    /// substring.
    pub fn brand_mentions(&self, brand: &str) -> Vec<&Utterance> {
        let needle = brand.to_lowercase();
        self.utterances
            .iter()
            .filter(|u| u.text.to_lowercase().contains(&needle))
            .collect()
    }
}

pub struct ModulateClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ModulateClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Transcribe audio at a URL into speaker/emotion-tagged utterances.
    pub async fn transcribe(&self, audio_url: &str) -> Result<Transcript> {
        let url = format!("{}/v1/transcribe", self.base_url);
        let payload = json!({ "audio_url": audio_url });

        info!(audio_url, "Modulate transcribe");
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ModulateError::Api {
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

    fn utterance(text: &str) -> Utterance {
        Utterance {
            speaker: "speaker_0".to_string(),
            text: text.to_string(),
            emotion: "neutral".to_string(),
            start_time: 0.0,
            end_time: 1.5,
        }
    }

    #[test]
    fn brand_mentions_match_case_insensitively() {
        let transcript = Transcript {
            utterances: vec![
                utterance("I heard ACME Corp is shutting down"),
                utterance("the weather is nice today"),
                utterance("acme corp makes good tools"),
            ],
        };

        let hits = transcript.brand_mentions("Acme Corp");
        assert_eq!(hits.len(), 2);
        assert!(hits[0].text.contains("ACME"));
    }

    #[test]
    fn no_mentions_yields_empty() {
        let transcript = Transcript {
            utterances: vec![utterance("nothing relevant here")],
        };
        assert!(transcript.brand_mentions("Acme Corp").is_empty());
    }
}
