// Remediation workflow tests: every external step degrades to a usable
// local fallback, so a correction always has a strategy and content.

use std::sync::Arc;

use brandguard_common::{MentionRecord, Severity};
use brandguard_pipeline::jobs::{Collaborators, Pipeline};
use brandguard_pipeline::registry::{JobRegistry, JobStatus, StepStatus};
use brandguard_pipeline::testing::{
    MockEvaluator, MockExtractor, MockGenerator, MockPlanner, MockResearcher, MockSearcher,
    MockMentionStore,
};

fn mention(id: &str) -> MentionRecord {
    MentionRecord {
        id: id.to_string(),
        brand_id: "acme-corp".to_string(),
        brand_name: "Acme Corp".to_string(),
        platform: "chatgpt".to_string(),
        claim: "Acme Corp was founded in 1990 as a hardware company.".to_string(),
        accuracy_score: 20.0,
        is_accurate: false,
        severity: Severity::Critical,
        detected_at: "2026-08-01T00:00:00Z".to_string(),
        source_urls: vec!["https://old-wiki.org/acme".to_string()],
    }
}

fn pipeline(
    store: Arc<MockMentionStore>,
    evaluator: MockEvaluator,
    planner: MockPlanner,
    generator: MockGenerator,
) -> (Pipeline, Arc<JobRegistry>) {
    let registry = Arc::new(JobRegistry::new());
    let pipeline = Pipeline::new(
        Arc::clone(&registry),
        store,
        Collaborators {
            evaluator: Arc::new(evaluator),
            searcher: Arc::new(MockSearcher::returning(&[])),
            extractor: Arc::new(MockExtractor::ok()),
            researcher: Arc::new(MockResearcher::finding(&[])),
            planner: Arc::new(planner),
            generator: Arc::new(generator),
        },
    );
    (pipeline, registry)
}

#[tokio::test]
async fn remediation_stores_a_draft_correction() {
    let store = Arc::new(MockMentionStore::new().with_mention(mention("m1")));
    let (pipeline, registry) = pipeline(
        Arc::clone(&store),
        MockEvaluator::scoring(0.2),
        MockPlanner { fail: false },
        MockGenerator { fail: false },
    );

    pipeline.remediate("m1", "acme-corp", "job-1").await;

    let job = registry.get("job-1").unwrap();
    assert_eq!(job.status, JobStatus::Completed);

    let result = job.result.unwrap();
    assert_eq!(result["strategy"], "blog_post");
    assert_eq!(result["status"], "draft");
    assert_eq!(result["degraded_steps"], serde_json::json!([]));

    let corrections = store.corrections();
    assert_eq!(corrections.len(), 1);
    assert_eq!(corrections[0].correction.mention_id, "m1");
    assert_eq!(corrections[0].correction.status, "draft");
    assert_eq!(
        corrections[0].correction.content,
        "generated correction content"
    );
}

#[tokio::test]
async fn every_collaborator_failing_still_yields_a_usable_correction() {
    let store = Arc::new(MockMentionStore::new().with_mention(mention("m1")));
    let (pipeline, registry) = pipeline(
        Arc::clone(&store),
        MockEvaluator::failing(),
        MockPlanner { fail: true },
        MockGenerator { fail: true },
    );

    pipeline.remediate("m1", "acme-corp", "job-1").await;

    let job = registry.get("job-1").unwrap();
    assert_eq!(job.status, JobStatus::Completed);

    let result = job.result.unwrap();
    assert_eq!(result["strategy"], "factual_correction");
    assert_eq!(
        result["degraded_steps"],
        serde_json::json!(["reevaluate_accuracy", "derive_strategy", "generate_content"])
    );

    // Strategy and content are never left empty.
    let corrections = store.corrections();
    assert_eq!(corrections.len(), 1);
    assert!(!corrections[0].correction.content.is_empty());
    assert!(corrections[0].correction.content.contains("Acme Corp"));
    assert_eq!(corrections[0].correction.correction_type, "factual_correction");
}

#[tokio::test]
async fn generator_failure_falls_back_to_the_planned_content() {
    let store = Arc::new(MockMentionStore::new().with_mention(mention("m1")));
    let (pipeline, registry) = pipeline(
        Arc::clone(&store),
        MockEvaluator::scoring(0.2),
        MockPlanner { fail: false },
        MockGenerator { fail: true },
    );

    pipeline.remediate("m1", "acme-corp", "job-1").await;

    let job = registry.get("job-1").unwrap();
    assert_eq!(job.status, JobStatus::Completed);

    let corrections = store.corrections();
    assert_eq!(
        corrections[0].correction.content,
        "planned correction content"
    );
}

#[tokio::test]
async fn unknown_mention_fails_without_storing_anything() {
    let store = Arc::new(MockMentionStore::new());
    let (pipeline, registry) = pipeline(
        Arc::clone(&store),
        MockEvaluator::scoring(0.2),
        MockPlanner { fail: false },
        MockGenerator { fail: false },
    );

    pipeline.remediate("ghost", "acme-corp", "job-1").await;

    let job = registry.get("job-1").unwrap();
    assert_eq!(job.status, JobStatus::Failed);
    assert!(store.corrections().is_empty());
}

#[tokio::test]
async fn correction_store_failure_fails_the_job_at_the_last_step() {
    let store = Arc::new(
        MockMentionStore::new()
            .with_mention(mention("m1"))
            .failing_correction_stores(),
    );
    let (pipeline, registry) = pipeline(
        Arc::clone(&store),
        MockEvaluator::scoring(0.2),
        MockPlanner { fail: false },
        MockGenerator { fail: false },
    );

    pipeline.remediate("m1", "acme-corp", "job-1").await;

    let job = registry.get("job-1").unwrap();
    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(job.steps[0].status, StepStatus::Completed);
    assert_eq!(job.steps[1].status, StepStatus::Completed);
    assert_eq!(job.steps[2].status, StepStatus::Completed);
    assert_eq!(job.steps[3].status, StepStatus::Running);
}
