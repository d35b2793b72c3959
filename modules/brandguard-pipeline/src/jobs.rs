//! The three mention workflows, driven as step-tracked jobs.
//!
//! Each workflow runs its steps in declared order, publishing step-level
//! progress into the injected `JobRegistry`. The final completed/failed
//! write is unconditional: a failing job never raises to the dispatching
//! caller, which observes failure only by polling the job record.

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

use brandguard_common::{BrandGuardError, NewCorrection, NewMention, Severity, ACCURACY_THRESHOLD};

use crate::collaborators::{
    ClaimEvaluation, ClaimEvaluator, ContentExtractor, ContentGenerator, DeepResearcher,
    RemediationPlan, RemediationPlanner, SourceSearcher,
};
use crate::registry::{JobKind, JobRegistry};
use crate::step::with_fallback;
use crate::store::MentionStore;

pub const PROCESS_STEPS: &[&str] = &[
    "evaluate_accuracy",
    "search_sources",
    "classify_severity",
    "store_mention",
];
pub const INVESTIGATE_STEPS: &[&str] = &["extract_sources", "deep_research", "update_graph"];
pub const REMEDIATE_STEPS: &[&str] = &[
    "reevaluate_accuracy",
    "derive_strategy",
    "generate_content",
    "store_correction",
];

/// How many search hits get recorded as sources on a new mention.
const MAX_SEARCH_SOURCES: usize = 5;

/// A raw mention observation handed in by a webhook or manual call.
#[derive(Debug, Clone)]
pub struct MentionInput {
    pub brand_id: String,
    pub brand_name: Option<String>,
    /// Lower-cased; defaults to "unknown" when the trigger doesn't know it.
    pub platform: Option<String>,
    pub content: String,
    pub source_urls: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessOutcome {
    pub mention_id: String,
    pub accuracy_score: f64,
    pub severity: Severity,
    pub is_accurate: bool,
    pub alert_created: bool,
    pub auto_remediate_queued: bool,
    pub sources_found: u32,
    pub relationships_created: u32,
    pub evaluation_degraded: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvestigationSummary {
    pub mention_id: String,
    pub sources_found: u32,
    pub insights_generated: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct RemediationOutcome {
    pub correction_id: String,
    pub mention_id: String,
    pub strategy: String,
    pub status: String,
    pub degraded_steps: Vec<String>,
}

/// External collaborators the workflows call, bundled for injection.
pub struct Collaborators {
    pub evaluator: Arc<dyn ClaimEvaluator>,
    pub searcher: Arc<dyn SourceSearcher>,
    pub extractor: Arc<dyn ContentExtractor>,
    pub researcher: Arc<dyn DeepResearcher>,
    pub planner: Arc<dyn RemediationPlanner>,
    pub generator: Arc<dyn ContentGenerator>,
}

pub struct Pipeline {
    registry: Arc<JobRegistry>,
    store: Arc<dyn MentionStore>,
    collaborators: Collaborators,
}

impl Pipeline {
    pub fn new(
        registry: Arc<JobRegistry>,
        store: Arc<dyn MentionStore>,
        collaborators: Collaborators,
    ) -> Self {
        Self {
            registry,
            store,
            collaborators,
        }
    }

    pub fn registry(&self) -> &Arc<JobRegistry> {
        &self.registry
    }

    /// Drive a raw mention to a stored, scored graph entry.
    pub async fn process_mention(&self, input: MentionInput, job_id: &str) {
        self.registry
            .create(job_id, JobKind::ProcessMention, PROCESS_STEPS);
        self.registry.mark_running(job_id);
        match self.run_process_mention(&input, job_id).await {
            Ok(outcome) => {
                info!(job_id, mention_id = outcome.mention_id.as_str(), "Mention processed");
                self.registry.complete(job_id, to_json(&outcome));
            }
            Err(e) => {
                warn!(job_id, error = %e, "Mention processing failed");
                self.registry.fail(job_id, &e.to_string());
            }
        }
    }

    /// Dig into an already-stored mention: extract its sources, research
    /// the claim, and fold the findings back into the graph.
    pub async fn investigate(&self, mention_id: &str, job_id: &str) {
        self.registry
            .create(job_id, JobKind::Investigate, INVESTIGATE_STEPS);
        self.registry.mark_running(job_id);
        match self.run_investigate(mention_id, job_id).await {
            Ok(summary) => {
                info!(job_id, mention_id, "Investigation complete");
                self.registry.complete(job_id, to_json(&summary));
            }
            Err(e) => {
                warn!(job_id, error = %e, "Investigation failed");
                self.registry.fail(job_id, &e.to_string());
            }
        }
    }

    /// Produce and store a correction for an inaccurate mention.
    pub async fn remediate(&self, mention_id: &str, brand_id: &str, job_id: &str) {
        self.registry
            .create(job_id, JobKind::Remediate, REMEDIATE_STEPS);
        self.registry.mark_running(job_id);
        match self.run_remediate(mention_id, brand_id, job_id).await {
            Ok(outcome) => {
                info!(job_id, correction_id = outcome.correction_id.as_str(), "Remediation complete");
                self.registry.complete(job_id, to_json(&outcome));
            }
            Err(e) => {
                warn!(job_id, error = %e, "Remediation failed");
                self.registry.fail(job_id, &e.to_string());
            }
        }
    }

    async fn run_process_mention(
        &self,
        input: &MentionInput,
        job_id: &str,
    ) -> Result<ProcessOutcome> {
        let brand_name = input
            .brand_name
            .clone()
            .unwrap_or_else(|| input.brand_id.clone());
        let platform = input
            .platform
            .as_deref()
            .unwrap_or("unknown")
            .to_lowercase();

        // Evaluation degrades to a neutral verdict rather than failing the
        // whole job.
        self.registry.step_running(job_id, "evaluate_accuracy");
        let evaluation = with_fallback(
            "evaluate_accuracy",
            self.collaborators.evaluator.evaluate(&input.content, &brand_name),
            ClaimEvaluation::neutral(),
        )
        .await;
        let evaluation_degraded = evaluation.degraded();
        self.registry.step_completed(
            job_id,
            "evaluate_accuracy",
            json!({
                "accuracy": evaluation.value().accuracy,
                "citations": evaluation.value().citations.clone(),
                "missing": evaluation.value().missing.clone(),
                "degraded": evaluation_degraded,
            }),
        );
        let evaluation = evaluation.into_value();

        self.registry.step_running(job_id, "search_sources");
        let findings = self
            .collaborators
            .searcher
            .search(&format!("{brand_name} {}", input.content))
            .await?;
        let mut source_urls = input.source_urls.clone();
        for hit in findings.results.iter().take(MAX_SEARCH_SOURCES) {
            if !source_urls.contains(&hit.url) {
                source_urls.push(hit.url.clone());
            }
        }
        self.registry.step_completed(
            job_id,
            "search_sources",
            json!({
                "sources_found": source_urls.len(),
                "answer": findings.answer,
            }),
        );

        self.registry.step_running(job_id, "classify_severity");
        let severity = Severity::from_accuracy(evaluation.accuracy);
        self.registry.step_completed(
            job_id,
            "classify_severity",
            json!({ "severity": severity.to_string() }),
        );

        self.registry.step_running(job_id, "store_mention");
        let stored = self
            .store
            .store_mention(&NewMention {
                id: None,
                brand_id: input.brand_id.clone(),
                brand_name,
                platform,
                claim: input.content.clone(),
                accuracy_score: evaluation.accuracy,
                severity,
                detected_at: Utc::now(),
                source_urls: source_urls.clone(),
            })
            .await?;
        self.registry.step_completed(
            job_id,
            "store_mention",
            json!({
                "mention_id": stored.mention_id.clone(),
                "relationships_created": stored.relationships_created,
            }),
        );

        Ok(ProcessOutcome {
            mention_id: stored.mention_id,
            accuracy_score: evaluation.accuracy,
            severity,
            is_accurate: evaluation.accuracy >= ACCURACY_THRESHOLD,
            alert_created: severity.warrants_alert(),
            auto_remediate_queued: severity.warrants_auto_remediation(),
            sources_found: source_urls.len() as u32,
            relationships_created: stored.relationships_created,
            evaluation_degraded,
        })
    }

    async fn run_investigate(
        &self,
        mention_id: &str,
        job_id: &str,
    ) -> Result<InvestigationSummary> {
        let mention = self
            .store
            .get_mention(mention_id)
            .await?
            .ok_or_else(|| BrandGuardError::NotFound(format!("mention '{mention_id}'")))?;

        self.registry.step_running(job_id, "extract_sources");
        if mention.source_urls.is_empty() {
            return Err(BrandGuardError::Validation(format!(
                "mention '{mention_id}' cites no sources to extract"
            ))
            .into());
        }
        let pages = self
            .collaborators
            .extractor
            .extract(&mention.source_urls, Some(&mention.claim))
            .await?;
        self.registry.step_completed(
            job_id,
            "extract_sources",
            json!({
                "sources_extracted": pages.len(),
                "characters": pages.iter().map(|p| p.content.len()).sum::<usize>(),
            }),
        );

        self.registry.step_running(job_id, "deep_research");
        let query = format!(
            "Investigate the claim: \"{}\" about {}. \
             Find the correct information from authoritative sources. \
             Trace where this claim originated. \
             Identify which websites and AI platforms are propagating it.",
            mention.claim, mention.brand_name
        );
        let report = self.collaborators.researcher.research(&query).await?;
        self.registry.step_completed(
            job_id,
            "deep_research",
            json!({
                "misinformation_sources": report.misinformation_sources.len(),
                "propagation_chain": report.propagation_chain.clone(),
            }),
        );

        self.registry.step_running(job_id, "update_graph");
        let new_urls: Vec<String> = report
            .misinformation_sources
            .iter()
            .map(|s| s.url.clone())
            .filter(|u| !u.is_empty())
            .collect();
        let relationships_created = if new_urls.is_empty() {
            0
        } else {
            self.store
                .link_mention_sources(mention_id, &new_urls)
                .await?
        };
        self.registry.step_completed(
            job_id,
            "update_graph",
            json!({ "relationships_created": relationships_created }),
        );

        let insights_generated = [!report.correct_information.is_empty(), !report.propagation_chain.is_empty()]
            .iter()
            .filter(|present| **present)
            .count() as u32;

        Ok(InvestigationSummary {
            mention_id: mention_id.to_string(),
            sources_found: (pages.len() + new_urls.len()) as u32,
            insights_generated,
        })
    }

    async fn run_remediate(
        &self,
        mention_id: &str,
        brand_id: &str,
        job_id: &str,
    ) -> Result<RemediationOutcome> {
        let mention = self
            .store
            .get_mention(mention_id)
            .await?
            .ok_or_else(|| BrandGuardError::NotFound(format!("mention '{mention_id}'")))?;
        let brand_name = if mention.brand_name.is_empty() {
            brand_id.to_string()
        } else {
            mention.brand_name.clone()
        };
        let mut degraded_steps = Vec::new();

        self.registry.step_running(job_id, "reevaluate_accuracy");
        let evaluation = with_fallback(
            "reevaluate_accuracy",
            self.collaborators.evaluator.evaluate(&mention.claim, &brand_name),
            ClaimEvaluation::neutral(),
        )
        .await;
        if evaluation.degraded() {
            degraded_steps.push("reevaluate_accuracy".to_string());
        }
        self.registry.step_completed(
            job_id,
            "reevaluate_accuracy",
            json!({
                "accuracy": evaluation.value().accuracy,
                "degraded": evaluation.degraded(),
            }),
        );
        let evaluation = evaluation.into_value();

        self.registry.step_running(job_id, "derive_strategy");
        let context = format!(
            "Accuracy {:.2}; facts the claim contradicts: {}",
            evaluation.accuracy,
            evaluation.missing.join("; ")
        );
        let plan = with_fallback(
            "derive_strategy",
            self.collaborators
                .planner
                .plan(&mention.claim, &brand_name, &context),
            RemediationPlan::fallback(&mention.claim, &brand_name),
        )
        .await;
        if plan.degraded() {
            degraded_steps.push("derive_strategy".to_string());
        }
        self.registry.step_completed(
            job_id,
            "derive_strategy",
            json!({
                "strategy": plan.value().strategy.clone(),
                "degraded": plan.degraded(),
            }),
        );
        let plan = plan.into_value();

        self.registry.step_running(job_id, "generate_content");
        let prompt = format!(
            "Write a correction for the inaccurate claim \"{}\" about {}. Strategy: {}.",
            mention.claim, brand_name, plan.strategy
        );
        let content = with_fallback(
            "generate_content",
            self.collaborators.generator.generate(&prompt, &brand_name),
            plan.content.clone(),
        )
        .await;
        if content.degraded() {
            degraded_steps.push("generate_content".to_string());
        }
        self.registry.step_completed(
            job_id,
            "generate_content",
            json!({
                "characters": content.value().len(),
                "degraded": content.degraded(),
            }),
        );
        let content = content.into_value();

        self.registry.step_running(job_id, "store_correction");
        let correction_id = self
            .store
            .store_correction(&NewCorrection {
                mention_id: mention_id.to_string(),
                content,
                correction_type: plan.strategy.clone(),
                status: "draft".to_string(),
                created_at: Utc::now(),
            })
            .await?;
        self.registry.step_completed(
            job_id,
            "store_correction",
            json!({ "correction_id": correction_id.clone() }),
        );

        Ok(RemediationOutcome {
            correction_id,
            mention_id: mention_id.to_string(),
            strategy: plan.strategy,
            status: "draft".to_string(),
            degraded_steps,
        })
    }
}

fn to_json<T: Serialize>(value: &T) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or(serde_json::Value::Null)
}
