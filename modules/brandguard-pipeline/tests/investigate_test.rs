// Investigation workflow tests: source extraction, deep research, and
// folding findings back into the graph.

use std::sync::Arc;

use brandguard_common::{MentionRecord, Severity};
use brandguard_pipeline::jobs::{Collaborators, Pipeline};
use brandguard_pipeline::registry::{JobRegistry, JobStatus, StepStatus};
use brandguard_pipeline::testing::{
    MockEvaluator, MockExtractor, MockGenerator, MockPlanner, MockResearcher, MockSearcher,
    MockMentionStore,
};

fn mention(id: &str, source_urls: &[&str]) -> MentionRecord {
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
        source_urls: source_urls.iter().map(|s| s.to_string()).collect(),
    }
}

fn pipeline(
    store: Arc<MockMentionStore>,
    extractor: MockExtractor,
    researcher: MockResearcher,
) -> (Pipeline, Arc<JobRegistry>) {
    let registry = Arc::new(JobRegistry::new());
    let pipeline = Pipeline::new(
        Arc::clone(&registry),
        store,
        Collaborators {
            evaluator: Arc::new(MockEvaluator::scoring(0.5)),
            searcher: Arc::new(MockSearcher::returning(&[])),
            extractor: Arc::new(extractor),
            researcher: Arc::new(researcher),
            planner: Arc::new(MockPlanner { fail: false }),
            generator: Arc::new(MockGenerator { fail: false }),
        },
    );
    (pipeline, registry)
}

#[tokio::test]
async fn investigation_summarizes_sources_and_insights() {
    let store = Arc::new(
        MockMentionStore::new().with_mention(mention("m1", &["https://old-wiki.org/acme"])),
    );
    let (pipeline, registry) = pipeline(
        Arc::clone(&store),
        MockExtractor::ok(),
        MockResearcher::finding(&["https://misleading-review.net/acme"]),
    );

    pipeline.investigate("m1", "job-1").await;

    let job = registry.get("job-1").unwrap();
    assert_eq!(job.status, JobStatus::Completed);
    for step in &job.steps {
        assert_eq!(step.status, StepStatus::Completed, "step {}", step.name);
    }

    let result = job.result.unwrap();
    // 1 extracted page + 1 newly discovered misinformation source.
    assert_eq!(result["sources_found"], 2);
    assert_eq!(result["insights_generated"], 2);

    // The discovered source was linked into the graph.
    assert_eq!(
        store.extra_links(),
        vec![(
            "m1".to_string(),
            "https://misleading-review.net/acme".to_string()
        )]
    );
}

#[tokio::test]
async fn unknown_mention_fails_the_job_with_not_found() {
    let store = Arc::new(MockMentionStore::new());
    let (pipeline, registry) = pipeline(
        store,
        MockExtractor::ok(),
        MockResearcher::finding(&[]),
    );

    pipeline.investigate("ghost", "job-1").await;

    let job = registry.get("job-1").unwrap();
    assert_eq!(job.status, JobStatus::Failed);
    assert!(job.error.unwrap().contains("Not found"));
}

#[tokio::test]
async fn mention_without_sources_is_rejected_before_extraction() {
    let store = Arc::new(MockMentionStore::new().with_mention(mention("m1", &[])));
    let (pipeline, registry) = pipeline(
        Arc::clone(&store),
        MockExtractor::ok(),
        MockResearcher::finding(&[]),
    );

    pipeline.investigate("m1", "job-1").await;

    let job = registry.get("job-1").unwrap();
    assert_eq!(job.status, JobStatus::Failed);
    assert!(job.error.unwrap().contains("cites no sources"));
    assert!(store.extra_links().is_empty());
}

#[tokio::test]
async fn research_failure_preserves_extraction_progress() {
    let store = Arc::new(
        MockMentionStore::new().with_mention(mention("m1", &["https://old-wiki.org/acme"])),
    );
    let (pipeline, registry) = pipeline(
        Arc::clone(&store),
        MockExtractor::ok(),
        MockResearcher::failing(),
    );

    pipeline.investigate("m1", "job-1").await;

    let job = registry.get("job-1").unwrap();
    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(job.steps[0].status, StepStatus::Completed);
    assert_eq!(job.steps[1].status, StepStatus::Running);
    assert_eq!(job.steps[2].status, StepStatus::Pending);
}

#[tokio::test]
async fn research_with_no_new_sources_still_completes() {
    let store = Arc::new(
        MockMentionStore::new().with_mention(mention("m1", &["https://old-wiki.org/acme"])),
    );
    let (pipeline, registry) = pipeline(
        Arc::clone(&store),
        MockExtractor::ok(),
        MockResearcher::finding(&[]),
    );

    pipeline.investigate("m1", "job-1").await;

    let job = registry.get("job-1").unwrap();
    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.result.unwrap()["sources_found"], 1);
    assert!(store.extra_links().is_empty());
}
