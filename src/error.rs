use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuddyError {
    #[error("Network error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("{0}")]
    NotFound(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Prompt failed: {0}")]
    Prompt(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("No configuration found at {0}")]
    MissingConfig(String),

    #[error("Git error: {0}")]
    Git(String),

    #[error("Unable to deploy protected pipeline: {0}")]
    ProtectedPipeline(String),

    #[error("Unable to deploy protected branch: {0}")]
    ProtectedBranch(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BuddyError>;
