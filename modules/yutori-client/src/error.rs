use thiserror::Error;

pub type Result<T> = std::result::Result<T, YutoriError>;

#[derive(Debug, Error)]
pub enum YutoriError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Task {task_id} did not finish within {waited_secs}s")]
    Timeout { task_id: String, waited_secs: u64 },

    #[error("Task {task_id} failed: {message}")]
    TaskFailed { task_id: String, message: String },
}

impl From<reqwest::Error> for YutoriError {
    fn from(err: reqwest::Error) -> Self {
        YutoriError::Network(err.to_string())
    }
}
