use thiserror::Error;

pub type Result<T> = std::result::Result<T, SensoError>;

#[derive(Debug, Error)]
pub enum SensoError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

impl From<reqwest::Error> for SensoError {
    fn from(err: reqwest::Error) -> Self {
        SensoError::Network(err.to_string())
    }
}
