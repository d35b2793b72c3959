use serde::Deserialize;

/// Handle returned when a browsing or research task is created.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskHandle {
    #[serde(alias = "task_id")]
    pub id: String,
    #[serde(default = "queued")]
    pub status: String,
    #[serde(default)]
    pub view_url: Option<String>,
}

fn queued() -> String {
    "queued".to_string()
}

/// Polled state of a long-running task.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskResult {
    #[serde(default)]
    pub status: String,
    /// Structured output matching the schema the task was created with.
    #[serde(default)]
    pub structured_result: Option<serde_json::Value>,
    /// Free-text result when no schema was supplied or matching failed.
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl TaskResult {
    pub fn is_terminal(&self) -> bool {
        matches!(self.status.as_str(), "succeeded" | "failed")
    }
}

/// A persistent monitoring scout.
#[derive(Debug, Clone, Deserialize)]
pub struct Scout {
    pub id: String,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoutList {
    #[serde(default)]
    pub tasks: Vec<Scout>,
}

/// One update emitted by a scout.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoutUpdate {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub citations: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoutUpdates {
    #[serde(default)]
    pub updates: Vec<ScoutUpdate>,
}
