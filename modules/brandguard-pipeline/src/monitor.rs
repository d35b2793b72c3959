//! Periodic scout sweep: poll every registered monitoring scout for new
//! observations and run each one through the mention workflow.
//!
//! Failures are contained per scout; one unreachable scout never stops the
//! sweep.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use tracing::{error, info};
use uuid::Uuid;

use brandguard_common::BrandGuardError;
use modulate_client::Transcript;

use crate::collaborators::{ScoutFeed, ScoutObservation};
use crate::jobs::{MentionInput, Pipeline};

/// A registered monitoring scout and the brand it watches.
#[derive(Debug, Clone)]
pub struct ScoutRecord {
    pub id: String,
    pub query: String,
    pub brand_id: String,
    pub brand_name: String,
    pub created_at: DateTime<Utc>,
}

/// Explicit registry of scouts, constructed at service start and injected.
#[derive(Default)]
pub struct ScoutRegistry {
    scouts: RwLock<HashMap<String, ScoutRecord>>,
}

impl ScoutRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, scout: ScoutRecord) {
        self.scouts
            .write()
            .unwrap()
            .insert(scout.id.clone(), scout);
    }

    pub fn list(&self) -> Vec<ScoutRecord> {
        let mut scouts: Vec<ScoutRecord> =
            self.scouts.read().unwrap().values().cloned().collect();
        scouts.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        scouts
    }

    pub fn remove(&self, id: &str) -> Result<(), BrandGuardError> {
        self.scouts
            .write()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| BrandGuardError::NotFound(format!("scout '{id}'")))
    }
}

/// Stats from one sweep over the registered scouts.
#[derive(Debug, Default)]
pub struct SweepStats {
    pub scouts_polled: u32,
    pub scouts_failed: u32,
    pub updates_found: u32,
    pub jobs_run: u32,
}

impl std::fmt::Display for SweepStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "scouts polled: {}, failed: {}, updates: {}, jobs run: {}",
            self.scouts_polled, self.scouts_failed, self.updates_found, self.jobs_run
        )
    }
}

/// Turn a voice transcript into sweep observations: one per utterance that
/// mentions the brand. The transcript text becomes the claim under
/// evaluation.
pub fn observations_from_transcript(transcript: &Transcript, brand: &str) -> Vec<ScoutObservation> {
    transcript
        .brand_mentions(brand)
        .into_iter()
        .map(|u| ScoutObservation {
            content: u.text.clone(),
            citations: Vec::new(),
        })
        .collect()
}

/// Poll each registered scout and process every new observation.
pub async fn run_sweep(
    scouts: &ScoutRegistry,
    feed: &dyn ScoutFeed,
    pipeline: &Pipeline,
) -> SweepStats {
    let mut stats = SweepStats::default();

    for scout in scouts.list() {
        stats.scouts_polled += 1;
        let updates = match feed.updates(&scout.id).await {
            Ok(updates) => updates,
            Err(e) => {
                error!(scout_id = scout.id.as_str(), error = %e, "Scout poll failed");
                stats.scouts_failed += 1;
                continue;
            }
        };

        info!(
            scout_id = scout.id.as_str(),
            count = updates.len(),
            "Scout updates fetched"
        );
        stats.updates_found += updates.len() as u32;

        for update in updates {
            if update.content.trim().is_empty() {
                continue;
            }
            let job_id = format!("sweep-{}", Uuid::new_v4());
            pipeline
                .process_mention(
                    MentionInput {
                        brand_id: scout.brand_id.clone(),
                        brand_name: Some(scout.brand_name.clone()),
                        platform: None,
                        content: update.content,
                        source_urls: update.citations,
                    },
                    &job_id,
                )
                .await;
            stats.jobs_run += 1;
        }
    }

    info!("Sweep complete: {stats}");
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scout(id: &str) -> ScoutRecord {
        ScoutRecord {
            id: id.to_string(),
            query: "what do AI platforms say about Acme Corp".to_string(),
            brand_id: "acme-corp".to_string(),
            brand_name: "Acme Corp".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn register_list_remove() {
        let registry = ScoutRegistry::new();
        registry.register(scout("s1"));
        registry.register(scout("s2"));
        assert_eq!(registry.list().len(), 2);

        registry.remove("s1").unwrap();
        assert_eq!(registry.list().len(), 1);
        assert!(matches!(
            registry.remove("s1"),
            Err(BrandGuardError::NotFound(_))
        ));
    }

    #[test]
    fn transcript_utterances_become_observations() {
        use modulate_client::Utterance;

        let transcript = Transcript {
            utterances: vec![
                Utterance {
                    speaker: "speaker_0".to_string(),
                    text: "I read that ACME Corp was delisted".to_string(),
                    emotion: "concerned".to_string(),
                    start_time: 0.0,
                    end_time: 3.2,
                },
                Utterance {
                    speaker: "speaker_1".to_string(),
                    text: "unrelated chatter".to_string(),
                    emotion: "neutral".to_string(),
                    start_time: 3.2,
                    end_time: 5.0,
                },
            ],
        };

        let observations = observations_from_transcript(&transcript, "Acme Corp");
        assert_eq!(observations.len(), 1);
        assert!(observations[0].content.contains("delisted"));
    }

    #[test]
    fn reregistering_a_scout_replaces_it() {
        let registry = ScoutRegistry::new();
        registry.register(scout("s1"));
        let mut updated = scout("s1");
        updated.query = "new query".to_string();
        registry.register(updated);

        let scouts = registry.list();
        assert_eq!(scouts.len(), 1);
        assert_eq!(scouts[0].query, "new query");
    }
}
