use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::Config;
use crate::errors::{Result, VibeError};

use super::{ChatReply, ChatRequest, Provider};

/// AIMLAPI chat-completions client (OpenAI-compatible endpoint).
pub struct AimlApi {
    client: Client,
    api_key: String,
    base_url: String,
    temperature: f32,
    max_tokens: u32,
}

// -- OpenAI-compatible request/response types ---

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: String,
}

#[derive(Deserialize)]
struct Usage {
    #[serde(default)]
    total_tokens: u64,
}

impl AimlApi {
    pub fn new(cfg: &Config, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|e| VibeError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: cfg.api_base.trim_end_matches('/').to_string(),
            temperature: cfg.temperature,
            max_tokens: cfg.max_tokens,
        })
    }
}

#[async_trait]
impl Provider for AimlApi {
    async fn complete(&self, req: &ChatRequest) -> Result<ChatReply> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = CompletionRequest {
            model: &req.model,
            messages: vec![
                Message { role: "system", content: &req.system },
                Message { role: "user", content: &req.user },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        debug!(model = %req.model, prompt_len = req.user.len(), "invoking AIMLAPI");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| VibeError::Upstream(format!("AIMLAPI request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            warn!(status = %status, body = %text, "AIMLAPI error");
            return Err(VibeError::Upstream(format!("AIMLAPI returned {status}: {text}")));
        }

        let parsed: CompletionResponse = resp
            .json()
            .await
            .map_err(|e| VibeError::Upstream(format!("failed to parse AIMLAPI response: {e}")))?;

        let total_tokens = parsed.usage.map(|u| u.total_tokens).unwrap_or(0);

        // An empty choices list is not an error here: the extraction ladder
        // downgrades an empty reply to template scaffolding.
        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();

        debug!(reply_len = content.len(), total_tokens, "AIMLAPI reply received");

        Ok(ChatReply { content, total_tokens })
    }
}
