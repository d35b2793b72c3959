use thiserror::Error;

#[derive(Error, Debug)]
pub enum BrandGuardError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Graph error: {0}")]
    Graph(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl BrandGuardError {
    /// Whether a caller may reasonably retry the failed call.
    pub fn is_retryable(&self) -> bool {
        matches!(self, BrandGuardError::ServiceUnavailable(_))
    }
}
