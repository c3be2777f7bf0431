use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Nest API request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("OAuth token refresh failed: {0}")]
    Auth(String),

    #[error("Nest API responded with non-200 code: {status}")]
    Non200Response { status: u16 },

    #[error("Failed reading Nest API response body: {0}")]
    ReadBody(#[source] reqwest::Error),

    #[error("Failed unmarshalling Nest API response body: {0}")]
    Unmarshal(String),

    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
