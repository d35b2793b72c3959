//! In-memory registry of job records, polled by the front door.
//!
//! One explicit object constructed at service start and injected wherever
//! it is needed; no ambient module-level state. Internally a map behind an
//! RwLock, safe for concurrent jobs with distinct ids. Concurrent jobs for
//! the same id are NOT deduplicated: the later `create` resets the record,
//! and callers that need at-most-one-in-flight per key must enforce it
//! themselves.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::Serialize;

use brandguard_common::BrandGuardError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Running,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    Running,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    ProcessMention,
    Investigate,
    Remediate,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobStep {
    pub name: String,
    pub status: StepStatus,
    /// Opaque payload from the step's underlying call.
    pub result: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobRecord {
    pub id: String,
    pub kind: JobKind,
    pub status: JobStatus,
    pub steps: Vec<JobStep>,
    pub result: Option<serde_json::Value>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Default)]
pub struct JobRegistry {
    jobs: RwLock<HashMap<String, JobRecord>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a queued job with its fixed, ordered step list.
    pub fn create(&self, id: &str, kind: JobKind, step_names: &[&str]) {
        let now = Utc::now();
        let record = JobRecord {
            id: id.to_string(),
            kind,
            status: JobStatus::Queued,
            steps: step_names
                .iter()
                .map(|name| JobStep {
                    name: name.to_string(),
                    status: StepStatus::Pending,
                    result: None,
                })
                .collect(),
            result: None,
            error: None,
            created_at: now,
            updated_at: now,
        };
        self.jobs.write().unwrap().insert(id.to_string(), record);
    }

    pub fn mark_running(&self, id: &str) {
        self.update(id, |job| job.status = JobStatus::Running);
    }

    pub fn step_running(&self, id: &str, step: &str) {
        self.update(id, |job| {
            if let Some(s) = job.steps.iter_mut().find(|s| s.name == step) {
                s.status = StepStatus::Running;
            }
        });
    }

    pub fn step_completed(&self, id: &str, step: &str, result: serde_json::Value) {
        self.update(id, |job| {
            if let Some(s) = job.steps.iter_mut().find(|s| s.name == step) {
                s.status = StepStatus::Completed;
                s.result = Some(result);
            }
        });
    }

    pub fn complete(&self, id: &str, result: serde_json::Value) {
        self.update(id, |job| {
            job.status = JobStatus::Completed;
            job.result = Some(result);
        });
    }

    pub fn fail(&self, id: &str, error: &str) {
        self.update(id, |job| {
            job.status = JobStatus::Failed;
            job.error = Some(error.to_string());
        });
    }

    /// Fetch a job's current state, including partial step progress.
    pub fn get(&self, id: &str) -> Result<JobRecord, BrandGuardError> {
        self.jobs
            .read()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| BrandGuardError::NotFound(format!("job '{id}'")))
    }

    /// All jobs, newest first, optionally filtered by status.
    pub fn list(&self, status: Option<JobStatus>) -> Vec<JobRecord> {
        let mut jobs: Vec<JobRecord> = self
            .jobs
            .read()
            .unwrap()
            .values()
            .filter(|j| status.is_none_or(|s| j.status == s))
            .cloned()
            .collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        jobs
    }

    fn update(&self, id: &str, f: impl FnOnce(&mut JobRecord)) {
        if let Some(job) = self.jobs.write().unwrap().get_mut(id) {
            f(job);
            job.updated_at = Utc::now();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_runs_queued_to_completed() {
        let registry = JobRegistry::new();
        registry.create("j1", JobKind::ProcessMention, &["a", "b"]);
        assert_eq!(registry.get("j1").unwrap().status, JobStatus::Queued);

        registry.mark_running("j1");
        registry.step_running("j1", "a");
        registry.step_completed("j1", "a", serde_json::json!({"ok": true}));
        registry.complete("j1", serde_json::json!({"done": true}));

        let job = registry.get("j1").unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.steps[0].status, StepStatus::Completed);
        assert_eq!(job.steps[1].status, StepStatus::Pending);
    }

    #[test]
    fn failed_job_keeps_partial_step_progress() {
        let registry = JobRegistry::new();
        registry.create("j1", JobKind::Investigate, &["a", "b", "c"]);
        registry.mark_running("j1");
        registry.step_completed("j1", "a", serde_json::json!(1));
        registry.step_running("j1", "b");
        registry.fail("j1", "step b blew up");

        let job = registry.get("j1").unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.error.as_deref(), Some("step b blew up"));
        assert_eq!(job.steps[0].status, StepStatus::Completed);
        assert_eq!(job.steps[1].status, StepStatus::Running);
        assert_eq!(job.steps[2].status, StepStatus::Pending);
    }

    #[test]
    fn unknown_job_is_not_found() {
        let registry = JobRegistry::new();
        assert!(matches!(
            registry.get("missing"),
            Err(BrandGuardError::NotFound(_))
        ));
    }

    #[test]
    fn list_filters_by_status() {
        let registry = JobRegistry::new();
        registry.create("a", JobKind::ProcessMention, &[]);
        registry.create("b", JobKind::Remediate, &[]);
        registry.mark_running("b");
        registry.fail("b", "boom");

        assert_eq!(registry.list(None).len(), 2);
        assert_eq!(registry.list(Some(JobStatus::Failed)).len(), 1);
        assert_eq!(registry.list(Some(JobStatus::Queued)).len(), 1);
        assert!(registry.list(Some(JobStatus::Completed)).is_empty());
    }

    #[tokio::test]
    async fn concurrent_jobs_with_distinct_ids_do_not_interfere() {
        use std::sync::Arc;

        let registry = Arc::new(JobRegistry::new());
        let mut handles = Vec::new();
        for i in 0..16 {
            let registry = Arc::clone(&registry);
            handles.push(tokio::spawn(async move {
                let id = format!("job-{i}");
                registry.create(&id, JobKind::ProcessMention, &["only"]);
                registry.mark_running(&id);
                registry.step_completed(&id, "only", serde_json::json!(i));
                registry.complete(&id, serde_json::json!({ "n": i }));
            }));
        }
        for h in handles {
            h.await.unwrap();
        }

        for i in 0..16 {
            let job = registry.get(&format!("job-{i}")).unwrap();
            assert_eq!(job.status, JobStatus::Completed);
            assert_eq!(job.steps[0].result, Some(serde_json::json!(i)));
        }
    }
}
