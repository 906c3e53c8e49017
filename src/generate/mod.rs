use std::sync::Arc;

use tracing::{info, warn};

use crate::config::Config;
use crate::errors::{Result, VibeError};
use crate::extract::{self, Extraction};
use crate::prompt;
use crate::provider::{ChatRequest, DynProvider};
use crate::scaffold::{self, Classifier};
use crate::usage::{UsageCounter, UsageSnapshot};
use crate::wire::{GenerateRequest, GenerateResponse, UsageReport};

const PROVIDER_NAME: &str = "AIMLAPI";
const FALLBACK_MODEL: &str = "fallback";

/// Generation orchestrator: prefers the remote provider, degrades to the
/// template scaffold on any failure past validation. Every exit produces a
/// renderable file set.
pub struct Generator {
    provider: Option<DynProvider>,
    usage: Arc<UsageCounter>,
    classifier: Classifier,
    default_model: String,
}

impl Generator {
    pub fn new(cfg: &Config, provider: Option<DynProvider>, usage: Arc<UsageCounter>) -> Self {
        Self {
            provider,
            usage,
            classifier: Classifier::default(),
            default_model: cfg.model.clone(),
        }
    }

    pub fn usage(&self) -> UsageSnapshot {
        self.usage.snapshot()
    }

    pub fn degraded(&self) -> bool {
        self.provider.is_none()
    }

    pub async fn generate(&self, req: &GenerateRequest) -> Result<GenerateResponse> {
        let task = req.prompt.trim();
        if task.is_empty() {
            return Err(VibeError::InvalidRequest("Prompt is required".into()));
        }

        let Some(provider) = &self.provider else {
            // No credential configured: documented degraded mode, not an error.
            return Ok(GenerateResponse {
                code: scaffold::default_component(task),
                model: FALLBACK_MODEL.into(),
                usage: None,
                files: scaffold::file_set(&self.classifier, task, None),
            });
        };

        let model = req.model.clone().unwrap_or_else(|| self.default_model.clone());
        let chat = ChatRequest {
            model: model.clone(),
            system: prompt::system_prompt().to_string(),
            user: prompt::user_prompt(task, req.context.as_deref()),
        };

        let reply = provider.complete(&chat).await?;

        // Count the call before parsing: a successful round-trip is spend
        // even when the reply turns out to be unusable.
        let snapshot = self.usage.record(reply.total_tokens);

        let (code, files) = match extract::run_ladder(&reply.content) {
            Extraction::FileSet(files) => {
                let code = files
                    .iter()
                    .find(|f| f.path.contains("page.tsx"))
                    .or_else(|| files.first())
                    .map(|f| f.content.clone())
                    .unwrap_or_default();
                (code, files)
            }
            Extraction::CodeBlocks(blocks) => {
                let first = blocks.into_iter().next().unwrap_or_default();
                let files = scaffold::file_set(&self.classifier, task, Some(&first));
                (first, files)
            }
            Extraction::Empty => {
                warn!("reply had no parseable files; scaffolding from templates");
                let code = scaffold::default_component(task);
                let files = scaffold::file_set(&self.classifier, task, None);
                (code, files)
            }
        };

        info!(
            model = %model,
            files = files.len(),
            requests = snapshot.requests,
            "generation complete"
        );

        Ok(GenerateResponse {
            code,
            model,
            usage: Some(UsageReport {
                provider: PROVIDER_NAME.into(),
                requests: snapshot.requests,
                limit: snapshot.limit,
                tokens_used: reply.total_tokens,
            }),
            files,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::provider::{ChatReply, Provider};

    struct CannedProvider {
        reply: String,
        tokens: u64,
    }

    #[async_trait]
    impl Provider for CannedProvider {
        async fn complete(&self, _req: &ChatRequest) -> Result<ChatReply> {
            Ok(ChatReply { content: self.reply.clone(), total_tokens: self.tokens })
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl Provider for FailingProvider {
        async fn complete(&self, _req: &ChatRequest) -> Result<ChatReply> {
            Err(VibeError::Upstream("AIMLAPI returned 503: unavailable".into()))
        }
    }

    fn request(prompt: &str) -> GenerateRequest {
        GenerateRequest { prompt: prompt.into(), model: None, context: None, files: None }
    }

    fn generator_with(provider: Option<DynProvider>) -> Generator {
        Generator::new(&Config::default(), provider, Arc::new(UsageCounter::new(100)))
    }

    #[tokio::test]
    async fn empty_prompt_rejected_before_any_call() {
        struct Untouchable;
        #[async_trait]
        impl Provider for Untouchable {
            async fn complete(&self, _req: &ChatRequest) -> Result<ChatReply> {
                panic!("provider must not be reached for an empty prompt");
            }
        }

        let generator = generator_with(Some(Box::new(Untouchable)));
        match generator.generate(&request("   ")).await {
            Err(VibeError::InvalidRequest(_)) => {}
            other => panic!("expected InvalidRequest, got {other:?}"),
        }
        assert_eq!(generator.usage().requests, 0);
    }

    #[tokio::test]
    async fn degraded_mode_never_calls_out_and_always_yields_files() {
        let generator = generator_with(None);
        let resp = generator.generate(&request("login page")).await.unwrap();
        assert_eq!(resp.model, "fallback");
        assert!(resp.usage.is_none());
        assert!(!resp.files.is_empty());
        assert!(resp.code.contains("login page"));
        assert_eq!(generator.usage().requests, 0);
    }

    #[tokio::test]
    async fn json_reply_round_trips_files() {
        let reply = r#"Here you go:
{"files": [
  {"path": "app/page.tsx", "content": "PAGE", "language": "typescript"},
  {"path": "lib/utils.ts", "content": "UTILS", "language": "typescript"}
], "description": "d", "setupInstructions": "s"}"#;
        let generator = generator_with(Some(Box::new(CannedProvider { reply: reply.into(), tokens: 321 })));

        let resp = generator.generate(&request("todo app")).await.unwrap();
        assert_eq!(resp.files.len(), 2);
        assert_eq!(resp.files[0].content, "PAGE");
        assert_eq!(resp.files[1].content, "UTILS");
        // page.tsx wins primary-code resolution
        assert_eq!(resp.code, "PAGE");

        let usage = resp.usage.unwrap();
        assert_eq!(usage.provider, "AIMLAPI");
        assert_eq!(usage.requests, 1);
        assert_eq!(usage.tokens_used, 321);
    }

    #[tokio::test]
    async fn code_block_reply_becomes_page_file() {
        let block = "export default function Card() {\n  return <div>hi</div>\n}";
        let reply = format!("No JSON this time.\n```tsx\n{block}\n```\nDone.");
        let generator = generator_with(Some(Box::new(CannedProvider { reply, tokens: 10 })));

        let resp = generator.generate(&request("card widget")).await.unwrap();
        assert_eq!(resp.code, block);
        let page = resp.files.iter().find(|f| f.path == "app/page.tsx").unwrap();
        assert_eq!(page.content, block);
        // scaffold synthesized around the block
        assert!(resp.files.iter().any(|f| f.path == "package.json"));
    }

    #[tokio::test]
    async fn unusable_reply_still_counts_usage_and_scaffolds() {
        let generator = generator_with(Some(Box::new(CannedProvider {
            reply: "Sorry, I can't help with that.".into(),
            tokens: 0,
        })));

        let resp = generator.generate(&request("landing page")).await.unwrap();
        assert!(!resp.files.is_empty());
        assert!(resp.code.contains("export default function"));
        assert_eq!(resp.usage.unwrap().requests, 1);
    }

    #[tokio::test]
    async fn consecutive_calls_increment_request_count() {
        let generator = generator_with(Some(Box::new(CannedProvider {
            reply: "```\nlet x = 1\n```".into(),
            tokens: 50,
        })));

        let first = generator.generate(&request("a")).await.unwrap();
        assert_eq!(first.usage.unwrap().requests, 1);
        let second = generator.generate(&request("b")).await.unwrap();
        assert_eq!(second.usage.unwrap().requests, 2);
        assert_eq!(generator.usage().tokens, 100);
    }

    #[tokio::test]
    async fn upstream_failure_surfaces_and_counts_nothing() {
        let generator = generator_with(Some(Box::new(FailingProvider)));
        match generator.generate(&request("x")).await {
            Err(VibeError::Upstream(_)) => {}
            other => panic!("expected Upstream, got {other:?}"),
        }
        assert_eq!(generator.usage().requests, 0);
    }

    #[tokio::test]
    async fn model_override_is_echoed_back() {
        let generator = generator_with(Some(Box::new(CannedProvider { reply: "".into(), tokens: 0 })));
        let mut req = request("x");
        req.model = Some("gpt-4o".into());
        let resp = generator.generate(&req).await.unwrap();
        assert_eq!(resp.model, "gpt-4o");

        let resp = generator.generate(&request("x")).await.unwrap();
        assert_eq!(resp.model, "gpt-4");
    }
}
