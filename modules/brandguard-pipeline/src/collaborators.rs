//! Trait seams for the external analysis collaborators.
//!
//! The pipeline treats every collaborator as a black box that returns
//! structured data or fails; no retry/backoff policy is imposed here.
//! Real implementations adapt the client crates; deterministic mocks live
//! in `testing`.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use senso_client::SensoClient;
use tavily_client::{SearchOptions, TavilyClient};
use yutori_client::YutoriClient;

/// Neutral accuracy substituted when evaluation fails (0–1 scale).
pub const NEUTRAL_ACCURACY: f64 = 0.5;

const RESEARCH_POLL_INTERVAL: Duration = Duration::from_secs(5);
const RESEARCH_DEADLINE: Duration = Duration::from_secs(300);

// --- Report types ---

#[derive(Debug, Clone, Serialize)]
pub struct ClaimEvaluation {
    /// Fraction of the claim judged accurate, 0–1.
    pub accuracy: f64,
    pub citations: Vec<String>,
    pub missing: Vec<String>,
}

impl ClaimEvaluation {
    /// Fallback verdict when the evaluator is unreachable.
    pub fn neutral() -> Self {
        Self {
            accuracy: NEUTRAL_ACCURACY,
            citations: Vec::new(),
            missing: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub url: String,
    pub title: String,
    pub snippet: String,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchFindings {
    pub answer: Option<String>,
    pub results: Vec<SearchHit>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractedPage {
    pub url: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MisinfoSource {
    pub url: String,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub date_found: Option<String>,
}

/// Structured output of a deep research task.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ResearchReport {
    #[serde(default)]
    pub correct_information: String,
    #[serde(default)]
    pub misinformation_sources: Vec<MisinfoSource>,
    /// How the misinformation spread.
    #[serde(default)]
    pub propagation_chain: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RemediationPlan {
    pub strategy: String,
    pub content: String,
}

impl RemediationPlan {
    /// Local fallback so a correction is never left without a strategy or
    /// content, even when the planner is down.
    pub fn fallback(claim: &str, brand: &str) -> Self {
        Self {
            strategy: "factual_correction".to_string(),
            content: format!(
                "The claim \"{claim}\" about {brand} is inaccurate. \
                 Refer to {brand}'s official channels for verified information."
            ),
        }
    }
}

/// One update emitted by a monitoring scout.
#[derive(Debug, Clone, Serialize)]
pub struct ScoutObservation {
    pub content: String,
    pub citations: Vec<String>,
}

// --- Traits ---

#[async_trait]
pub trait ClaimEvaluator: Send + Sync {
    /// Judge a claim's accuracy against what is known about the brand.
    async fn evaluate(&self, claim: &str, brand: &str) -> Result<ClaimEvaluation>;
}

#[async_trait]
pub trait SourceSearcher: Send + Sync {
    /// Search the web for pages corroborating or contradicting a claim.
    async fn search(&self, query: &str) -> Result<SearchFindings>;
}

#[async_trait]
pub trait ContentExtractor: Send + Sync {
    /// Pull full content from the given URLs. Callers must not pass an
    /// empty list.
    async fn extract(&self, urls: &[String], focus: Option<&str>) -> Result<Vec<ExtractedPage>>;
}

#[async_trait]
pub trait DeepResearcher: Send + Sync {
    /// Run a long-form investigation and return its structured report.
    async fn research(&self, query: &str) -> Result<ResearchReport>;
}

#[async_trait]
pub trait RemediationPlanner: Send + Sync {
    async fn plan(&self, claim: &str, brand: &str, context: &str) -> Result<RemediationPlan>;
}

#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, brand: &str) -> Result<String>;
}

#[async_trait]
pub trait ScoutFeed: Send + Sync {
    /// New observations from one monitoring scout.
    async fn updates(&self, scout_id: &str) -> Result<Vec<ScoutObservation>>;
}

// --- Client adapters ---

#[async_trait]
impl ClaimEvaluator for SensoClient {
    async fn evaluate(&self, claim: &str, brand: &str) -> Result<ClaimEvaluation> {
        let eval = SensoClient::evaluate(self, claim, brand).await?;
        Ok(ClaimEvaluation {
            accuracy: eval.accuracy,
            citations: eval.citations,
            missing: eval.missing,
        })
    }
}

#[async_trait]
impl RemediationPlanner for SensoClient {
    async fn plan(&self, claim: &str, brand: &str, context: &str) -> Result<RemediationPlan> {
        let r = SensoClient::remediate(self, claim, brand, context).await?;
        Ok(RemediationPlan {
            strategy: r.strategy,
            content: r.content,
        })
    }
}

#[async_trait]
impl ContentGenerator for SensoClient {
    async fn generate(&self, prompt: &str, brand: &str) -> Result<String> {
        Ok(SensoClient::generate(self, prompt, brand).await?.text)
    }
}

#[async_trait]
impl SourceSearcher for TavilyClient {
    async fn search(&self, query: &str) -> Result<SearchFindings> {
        let opts = SearchOptions {
            topic: "news".to_string(),
            search_depth: "advanced".to_string(),
            ..SearchOptions::default()
        };
        let resp = TavilyClient::search(self, query, &opts).await?;
        Ok(SearchFindings {
            answer: resp.answer,
            results: resp
                .results
                .into_iter()
                .map(|r| SearchHit {
                    url: r.url,
                    title: r.title,
                    snippet: r.content,
                    score: r.score,
                })
                .collect(),
        })
    }
}

#[async_trait]
impl ContentExtractor for TavilyClient {
    async fn extract(&self, urls: &[String], focus: Option<&str>) -> Result<Vec<ExtractedPage>> {
        let resp = TavilyClient::extract(self, urls, focus).await?;
        Ok(resp
            .results
            .into_iter()
            .map(|r| ExtractedPage {
                url: r.url,
                content: r.raw_content,
            })
            .collect())
    }
}

#[async_trait]
impl DeepResearcher for YutoriClient {
    async fn research(&self, query: &str) -> Result<ResearchReport> {
        let schema = serde_json::to_value(schemars::schema_for!(ResearchReport))?;
        let task = self
            .research_and_wait(query, &schema, RESEARCH_POLL_INTERVAL, RESEARCH_DEADLINE)
            .await?;

        if let Some(structured) = task.structured_result {
            if let Ok(report) = serde_json::from_value::<ResearchReport>(structured) {
                return Ok(report);
            }
        }
        // Schema didn't match; keep the free-text findings.
        Ok(ResearchReport {
            correct_information: task.result.unwrap_or_default(),
            ..ResearchReport::default()
        })
    }
}

#[async_trait]
impl ScoutFeed for YutoriClient {
    async fn updates(&self, scout_id: &str) -> Result<Vec<ScoutObservation>> {
        let updates = self.scout_updates(scout_id, 20).await?;
        Ok(updates
            .into_iter()
            .map(|u| ScoutObservation {
                content: u.content,
                citations: u.citations,
            })
            .collect())
    }
}
