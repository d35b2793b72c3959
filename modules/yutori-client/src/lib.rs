//! Yutori API client: persistent monitoring scouts plus one-shot browsing
//! and research agent tasks.
//!
//! Browsing and research tasks are long-running; callers create a task,
//! then poll it. `research_and_wait`/`browse_and_wait` wrap the poll loop
//! with an explicit interval and deadline.

pub mod error;
pub mod types;

pub use error::{Result, YutoriError};
pub use types::{Scout, ScoutUpdate, TaskHandle, TaskResult};

use std::time::Duration;

use serde_json::json;
use tracing::{info, warn};

use crate::types::{ScoutList, ScoutUpdates};

/// Start URLs for the AI platforms a browse task can be pointed at.
const PLATFORM_URLS: &[(&str, &str)] = &[
    ("chatgpt", "https://chatgpt.com"),
    ("claude", "https://claude.ai"),
    ("perplexity", "https://www.perplexity.ai"),
    ("gemini", "https://gemini.google.com"),
];

/// Look up the browse start URL for a platform (lower-case canonical name).
pub fn platform_start_url(platform: &str) -> Option<&'static str> {
    PLATFORM_URLS
        .iter()
        .find(|(name, _)| *name == platform)
        .map(|(_, url)| *url)
}

pub struct YutoriClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl YutoriClient {
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

    // --- Scouts ---

    /// Create a scout that monitors a topic on a fixed interval.
    pub async fn create_scout(&self, query: &str, output_interval_secs: u64) -> Result<Scout> {
        let payload = json!({
            "query": query,
            "output_interval": output_interval_secs,
            "skip_email": true,
        });
        self.post("/v1/scouting/tasks", &payload).await
    }

    pub async fn list_scouts(&self) -> Result<Vec<Scout>> {
        let list: ScoutList = self.get("/v1/scouting/tasks").await?;
        Ok(list.tasks)
    }

    pub async fn scout_updates(&self, scout_id: &str, page_size: u32) -> Result<Vec<ScoutUpdate>> {
        let path = format!("/v1/scouting/tasks/{scout_id}/updates?page_size={page_size}");
        let updates: ScoutUpdates = self.get(&path).await?;
        Ok(updates.updates)
    }

    pub async fn delete_scout(&self, scout_id: &str) -> Result<()> {
        let url = format!("{}/v1/scouting/tasks/{scout_id}", self.base_url);
        let resp = self
            .client
            .delete(&url)
            .header("X-API-Key", &self.api_key)
            .send()
            .await?;
        self.check(resp).await?;
        Ok(())
    }

    // --- Browsing ---

    /// Dispatch a browser agent. `output_schema` shapes the structured result.
    pub async fn browse(
        &self,
        task: &str,
        start_url: &str,
        max_steps: u32,
        output_schema: &serde_json::Value,
    ) -> Result<TaskHandle> {
        let payload = json!({
            "task": task,
            "start_url": start_url,
            "max_steps": max_steps,
            "output_schema": output_schema,
        });
        info!(start_url, "Yutori browse task created");
        self.post("/v1/browsing/tasks", &payload).await
    }

    pub async fn browse_result(&self, task_id: &str) -> Result<TaskResult> {
        self.get(&format!("/v1/browsing/tasks/{task_id}")).await
    }

    /// Create a browse task and poll until it settles or the deadline passes.
    pub async fn browse_and_wait(
        &self,
        task: &str,
        start_url: &str,
        max_steps: u32,
        output_schema: &serde_json::Value,
        poll_interval: Duration,
        deadline: Duration,
    ) -> Result<TaskResult> {
        let handle = self.browse(task, start_url, max_steps, output_schema).await?;
        self.wait(&handle.id, poll_interval, deadline, |id| {
            format!("/v1/browsing/tasks/{id}")
        })
        .await
    }

    // --- Research ---

    /// Launch a deep research task.
    pub async fn research(
        &self,
        query: &str,
        output_schema: &serde_json::Value,
    ) -> Result<TaskHandle> {
        let payload = json!({
            "query": query,
            "output_schema": output_schema,
        });
        info!("Yutori research task created");
        self.post("/v1/research/tasks", &payload).await
    }

    pub async fn research_result(&self, task_id: &str) -> Result<TaskResult> {
        self.get(&format!("/v1/research/tasks/{task_id}")).await
    }

    /// Create a research task and poll until it settles or the deadline passes.
    pub async fn research_and_wait(
        &self,
        query: &str,
        output_schema: &serde_json::Value,
        poll_interval: Duration,
        deadline: Duration,
    ) -> Result<TaskResult> {
        let handle = self.research(query, output_schema).await?;
        self.wait(&handle.id, poll_interval, deadline, |id| {
            format!("/v1/research/tasks/{id}")
        })
        .await
    }

    // --- Internals ---

    async fn wait(
        &self,
        task_id: &str,
        poll_interval: Duration,
        deadline: Duration,
        path_for: impl Fn(&str) -> String,
    ) -> Result<TaskResult> {
        let started = std::time::Instant::now();
        loop {
            let result: TaskResult = self.get(&path_for(task_id)).await?;
            if result.is_terminal() {
                if result.status == "failed" {
                    return Err(YutoriError::TaskFailed {
                        task_id: task_id.to_string(),
                        message: result.error.unwrap_or_else(|| "task failed".to_string()),
                    });
                }
                return Ok(result);
            }
            if started.elapsed() >= deadline {
                warn!(task_id, "Yutori task still running at deadline");
                return Err(YutoriError::Timeout {
                    task_id: task_id.to_string(),
                    waited_secs: started.elapsed().as_secs(),
                });
            }
            tokio::time::sleep(poll_interval).await;
        }
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
            .header("X-API-Key", &self.api_key)
            .json(payload)
            .send()
            .await?;
        let resp = self.check(resp).await?;
        Ok(resp.json().await?)
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{path}", self.base_url);
        let resp = self
            .client
            .get(&url)
            .header("X-API-Key", &self.api_key)
            .send()
            .await?;
        let resp = self.check(resp).await?;
        Ok(resp.json().await?)
    }

    async fn check(&self, resp: reqwest::Response) -> Result<reqwest::Response> {
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(YutoriError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(resp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_platforms_resolve_to_start_urls() {
        assert_eq!(platform_start_url("chatgpt"), Some("https://chatgpt.com"));
        assert_eq!(platform_start_url("gemini"), Some("https://gemini.google.com"));
        assert_eq!(platform_start_url("copilot"), None);
    }

    #[test]
    fn task_result_terminal_states() {
        let mut r = TaskResult {
            status: "running".to_string(),
            structured_result: None,
            result: None,
            error: None,
        };
        assert!(!r.is_terminal());
        r.status = "succeeded".to_string();
        assert!(r.is_terminal());
        r.status = "failed".to_string();
        assert!(r.is_terminal());
    }
}
