use thiserror::Error;

#[derive(Error, Debug)]
pub enum VibeError {
    /// Caller-facing validation failure (maps to HTTP 400).
    #[error("invalid request: {0}")] InvalidRequest(String),
    /// Remote provider call failed (non-success status or transport error).
    #[error("upstream error: {0}")] Upstream(String),
    #[error("config error: {0}")] Config(String),
    #[error("JSON error: {0}")] Json(#[from] serde_json::Error),
    #[error("IO error: {0}")] Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, VibeError>;
