use thiserror::Error;

pub type Result<T> = std::result::Result<T, ModulateError>;

#[derive(Debug, Error)]
pub enum ModulateError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

impl From<reqwest::Error> for ModulateError {
    fn from(err: reqwest::Error) -> Self {
        ModulateError::Network(err.to_string())
    }
}
