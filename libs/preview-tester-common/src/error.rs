use thiserror::Error;

/// Errors raised while talking to the remote task service
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("request to task service failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("task service returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("failed to decode task service response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}
