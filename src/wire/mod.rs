use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::usage::UsageSnapshot;

/// ========================================
/// Request/Response wire protocol
/// ========================================

/// Body of `POST /api/generate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Prior exchange records, oldest first. Only the last 3 are forwarded
    /// upstream, serialized as text inside the user prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Vec<Value>>,
    /// Accepted for wire compatibility with older clients; never read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<Value>>,
}

/// One generated source file. Constructed fresh per generation call and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
    #[serde(default)]
    pub language: String,
}

impl GeneratedFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>, language: impl Into<String>) -> Self {
        Self { path: path.into(), content: content.into(), language: language.into() }
    }
}

/// The JSON contract the model is instructed to emit.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelFileSet {
    pub files: Vec<GeneratedFile>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "setupInstructions")]
    pub setup_instructions: Option<String>,
}

/// Usage block attached to remote-backed responses. `requests` is the
/// running process total; `tokens_used` is this call's spend.
#[derive(Debug, Clone, Serialize)]
pub struct UsageReport {
    pub provider: String,
    pub requests: u64,
    pub limit: u64,
    #[serde(rename = "tokensUsed")]
    pub tokens_used: u64,
}

/// Body of a successful `POST /api/generate` response.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateResponse {
    /// Best-guess "main" file content, for direct display.
    pub code: String,
    pub model: String,
    pub usage: Option<UsageReport>,
    pub files: Vec<GeneratedFile>,
}

/// Body of `GET /api/generate`.
#[derive(Debug, Clone, Serialize)]
pub struct UsageResponse {
    pub usage: UsageSnapshot,
}
