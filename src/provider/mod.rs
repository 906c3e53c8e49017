use async_trait::async_trait;

use crate::config::Config;
use crate::errors::Result;

pub mod aimlapi;

/// A single prompt pair sent upstream.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub model: String,
    pub system: String,
    pub user: String,
}

/// Raw reply text plus the provider's reported token spend.
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub content: String,
    pub total_tokens: u64,
}

/// Chat-completion backend. One synchronous round-trip per call: no
/// streaming, no retries, no backoff.
#[async_trait]
pub trait Provider: Send + Sync {
    async fn complete(&self, req: &ChatRequest) -> Result<ChatReply>;
}

pub type DynProvider = Box<dyn Provider + Send + Sync>;

/// Build the configured provider. `None` when no credential is set, which
/// is the documented trigger for degraded template-only mode.
pub fn make_provider(cfg: &Config) -> Result<Option<DynProvider>> {
    match &cfg.api_key {
        Some(key) => {
            let provider = aimlapi::AimlApi::new(cfg, key.clone())?;
            Ok(Some(Box::new(provider)))
        }
        None => Ok(None),
    }
}
