//! Deterministic in-memory collaborator and store mocks.
//!
//! No network, no database, no Docker: workflow tests run in milliseconds
//! against these.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use brandguard_common::{
    BrandGuardError, MentionRecord, NewCorrection, NewMention, StoredMention, ACCURACY_THRESHOLD,
};

use crate::collaborators::{
    ClaimEvaluation, ClaimEvaluator, ContentExtractor, ContentGenerator, DeepResearcher,
    ExtractedPage, MisinfoSource, RemediationPlan, RemediationPlanner, ResearchReport,
    ScoutFeed, ScoutObservation, SearchFindings, SearchHit, SourceSearcher,
};
use crate::store::MentionStore;

// --- Collaborator mocks ---

pub struct MockEvaluator {
    pub accuracy: f64,
    pub fail: bool,
}

impl MockEvaluator {
    pub fn scoring(accuracy: f64) -> Self {
        Self {
            accuracy,
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            accuracy: 0.0,
            fail: true,
        }
    }
}

#[async_trait]
impl ClaimEvaluator for MockEvaluator {
    async fn evaluate(&self, _claim: &str, _brand: &str) -> Result<ClaimEvaluation> {
        if self.fail {
            return Err(anyhow!("evaluator unreachable"));
        }
        Ok(ClaimEvaluation {
            accuracy: self.accuracy,
            citations: vec!["https://acme.example/about".to_string()],
            missing: vec!["founded in 2015".to_string()],
        })
    }
}

pub struct MockSearcher {
    pub urls: Vec<String>,
    pub fail: bool,
}

impl MockSearcher {
    pub fn returning(urls: &[&str]) -> Self {
        Self {
            urls: urls.iter().map(|u| u.to_string()).collect(),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            urls: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl SourceSearcher for MockSearcher {
    async fn search(&self, _query: &str) -> Result<SearchFindings> {
        if self.fail {
            return Err(anyhow!("search unreachable"));
        }
        Ok(SearchFindings {
            answer: Some("synthesized answer".to_string()),
            results: self
                .urls
                .iter()
                .map(|url| SearchHit {
                    url: url.clone(),
                    title: "result".to_string(),
                    snippet: "snippet".to_string(),
                    score: 0.9,
                })
                .collect(),
        })
    }
}

pub struct MockExtractor {
    pub fail: bool,
}

impl MockExtractor {
    pub fn ok() -> Self {
        Self { fail: false }
    }

    pub fn failing() -> Self {
        Self { fail: true }
    }
}

#[async_trait]
impl ContentExtractor for MockExtractor {
    async fn extract(&self, urls: &[String], _focus: Option<&str>) -> Result<Vec<ExtractedPage>> {
        if self.fail {
            return Err(anyhow!("extract unreachable"));
        }
        Ok(urls
            .iter()
            .map(|url| ExtractedPage {
                url: url.clone(),
                content: format!("content of {url}"),
            })
            .collect())
    }
}

pub struct MockResearcher {
    pub misinfo_urls: Vec<String>,
    pub fail: bool,
}

impl MockResearcher {
    pub fn finding(urls: &[&str]) -> Self {
        Self {
            misinfo_urls: urls.iter().map(|u| u.to_string()).collect(),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            misinfo_urls: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl DeepResearcher for MockResearcher {
    async fn research(&self, _query: &str) -> Result<ResearchReport> {
        if self.fail {
            return Err(anyhow!("research task failed"));
        }
        Ok(ResearchReport {
            correct_information: "Acme Corp was founded in 2015.".to_string(),
            misinformation_sources: self
                .misinfo_urls
                .iter()
                .map(|url| MisinfoSource {
                    url: url.clone(),
                    platform: Some("chatgpt".to_string()),
                    date_found: None,
                })
                .collect(),
            propagation_chain: "blog post picked up by aggregators".to_string(),
        })
    }
}

pub struct MockPlanner {
    pub fail: bool,
}

#[async_trait]
impl RemediationPlanner for MockPlanner {
    async fn plan(&self, _claim: &str, _brand: &str, _context: &str) -> Result<RemediationPlan> {
        if self.fail {
            return Err(anyhow!("planner unreachable"));
        }
        Ok(RemediationPlan {
            strategy: "blog_post".to_string(),
            content: "planned correction content".to_string(),
        })
    }
}

pub struct MockGenerator {
    pub fail: bool,
}

#[async_trait]
impl ContentGenerator for MockGenerator {
    async fn generate(&self, _prompt: &str, _brand: &str) -> Result<String> {
        if self.fail {
            return Err(anyhow!("generator unreachable"));
        }
        Ok("generated correction content".to_string())
    }
}

/// Scout feed with canned observations per scout id; unknown ids error.
pub struct MockScoutFeed {
    pub observations: HashMap<String, Vec<ScoutObservation>>,
}

impl MockScoutFeed {
    pub fn with(scout_id: &str, contents: &[&str]) -> Self {
        let mut observations = HashMap::new();
        observations.insert(
            scout_id.to_string(),
            contents
                .iter()
                .map(|c| ScoutObservation {
                    content: c.to_string(),
                    citations: Vec::new(),
                })
                .collect(),
        );
        Self { observations }
    }
}

#[async_trait]
impl ScoutFeed for MockScoutFeed {
    async fn updates(&self, scout_id: &str) -> Result<Vec<ScoutObservation>> {
        self.observations
            .get(scout_id)
            .cloned()
            .ok_or_else(|| anyhow!("scout '{scout_id}' unreachable"))
    }
}

// --- Store mock ---

#[derive(Debug, Clone)]
pub struct StoredCorrection {
    pub id: String,
    pub correction: NewCorrection,
}

struct MockMentionStoreInner {
    mentions: HashMap<String, MentionRecord>,
    corrections: Vec<StoredCorrection>,
    extra_links: Vec<(String, String)>,
    fail_on_store_mention: bool,
    fail_on_store_correction: bool,
    next_id: u32,
}

/// Stateful in-memory graph stand-in. Thread-safe via interior Mutex.
pub struct MockMentionStore {
    inner: Mutex<MockMentionStoreInner>,
}

impl Default for MockMentionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMentionStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MockMentionStoreInner {
                mentions: HashMap::new(),
                corrections: Vec::new(),
                extra_links: Vec::new(),
                fail_on_store_mention: false,
                fail_on_store_correction: false,
                next_id: 0,
            }),
        }
    }

    /// Make `store_mention` return an error for every call.
    pub fn failing_mention_stores(self) -> Self {
        self.inner.lock().unwrap().fail_on_store_mention = true;
        self
    }

    /// Make `store_correction` return an error for every call.
    pub fn failing_correction_stores(self) -> Self {
        self.inner.lock().unwrap().fail_on_store_correction = true;
        self
    }

    /// Pre-populate a mention for investigate/remediate lookups.
    pub fn with_mention(self, record: MentionRecord) -> Self {
        self.inner
            .lock()
            .unwrap()
            .mentions
            .insert(record.id.clone(), record);
        self
    }

    pub fn mention_count(&self) -> usize {
        self.inner.lock().unwrap().mentions.len()
    }

    pub fn mentions_for_brand(&self, brand_id: &str) -> Vec<MentionRecord> {
        self.inner
            .lock()
            .unwrap()
            .mentions
            .values()
            .filter(|m| m.brand_id == brand_id)
            .cloned()
            .collect()
    }

    pub fn corrections(&self) -> Vec<StoredCorrection> {
        self.inner.lock().unwrap().corrections.clone()
    }

    /// (mention_id, url) pairs added through `link_mention_sources`.
    pub fn extra_links(&self) -> Vec<(String, String)> {
        self.inner.lock().unwrap().extra_links.clone()
    }
}

#[async_trait]
impl MentionStore for MockMentionStore {
    async fn store_mention(&self, mention: &NewMention) -> Result<StoredMention, BrandGuardError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_on_store_mention {
            return Err(BrandGuardError::ServiceUnavailable(
                "graph store down".to_string(),
            ));
        }
        inner.next_id += 1;
        let id = mention
            .id
            .clone()
            .unwrap_or_else(|| format!("mention-{}", inner.next_id));
        let record = MentionRecord {
            id: id.clone(),
            brand_id: mention.brand_id.clone(),
            brand_name: mention.brand_name.clone(),
            platform: mention.platform.to_lowercase(),
            claim: mention.claim.clone(),
            accuracy_score: mention.accuracy_score,
            is_accurate: mention.accuracy_score >= ACCURACY_THRESHOLD,
            severity: mention.severity,
            detected_at: mention.detected_at.to_rfc3339(),
            source_urls: mention.source_urls.clone(),
        };
        inner.mentions.insert(id.clone(), record);
        Ok(StoredMention {
            mention_id: id,
            relationships_created: 2 + 2 * mention.source_urls.len() as u32,
        })
    }

    async fn get_mention(&self, id: &str) -> Result<Option<MentionRecord>, BrandGuardError> {
        Ok(self.inner.lock().unwrap().mentions.get(id).cloned())
    }

    async fn store_correction(
        &self,
        correction: &NewCorrection,
    ) -> Result<String, BrandGuardError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_on_store_correction {
            return Err(BrandGuardError::ServiceUnavailable(
                "graph store down".to_string(),
            ));
        }
        if !inner.mentions.contains_key(&correction.mention_id) {
            return Err(BrandGuardError::NotFound(format!(
                "mention '{}'",
                correction.mention_id
            )));
        }
        inner.next_id += 1;
        let id = format!("correction-{}", inner.next_id);
        inner.corrections.push(StoredCorrection {
            id: id.clone(),
            correction: correction.clone(),
        });
        Ok(id)
    }

    async fn link_mention_sources(
        &self,
        mention_id: &str,
        urls: &[String],
    ) -> Result<u32, BrandGuardError> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.mentions.contains_key(mention_id) {
            return Err(BrandGuardError::NotFound(format!("mention '{mention_id}'")));
        }
        for url in urls {
            inner
                .extra_links
                .push((mention_id.to_string(), url.clone()));
        }
        Ok(2 * urls.len() as u32)
    }
}
