// error.rs
use thiserror::Error;

/// Errors from the collaborator adapters. The render tick itself never
/// fails: rig writes are presence-guarded no-ops.
#[derive(Error, Debug)]
pub enum PuppetError {
    #[error("config error: {0}")]
    Config(String),

    #[error("language model error: {0}")]
    Llm(String),

    #[error("speech error: {0}")]
    Speech(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PuppetError>;
