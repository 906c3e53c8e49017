use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::post;
use axum::Router;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::{Result, VibeError};
use crate::generate::Generator;
use crate::scaffold;
use crate::wire::{GenerateRequest, GenerateResponse, UsageResponse};

/// State shared across all routes.
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<Generator>,
}

/// Build the API router. CORS is wide open: the frontend may be served
/// from anywhere during development.
pub fn build(generator: Arc<Generator>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/generate", post(generate).get(usage))
        .layer(cors)
        .with_state(AppState { generator })
}

pub async fn serve(bind: &str, generator: Arc<Generator>) -> Result<()> {
    let app = build(generator);
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!(%bind, "vibebuild API listening");
    axum::serve(listener, app).await?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

type ApiError = (StatusCode, Json<ErrorBody>);

async fn generate(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> std::result::Result<Json<GenerateResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    match state.generator.generate(&req).await {
        Ok(resp) => {
            info!(%request_id, model = %resp.model, files = resp.files.len(), "generate ok");
            Ok(Json(resp))
        }
        Err(VibeError::InvalidRequest(msg)) => {
            Err((StatusCode::BAD_REQUEST, Json(ErrorBody { error: msg, code: None })))
        }
        Err(e) => {
            error!(%request_id, err = %e, "generate failed");
            // Mask the failure but keep the UI renderable: the fallback
            // component rides along with the error.
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: "Failed to generate component".into(),
                    code: Some(scaffold::default_component("")),
                }),
            ))
        }
    }
}

async fn usage(State(state): State<AppState>) -> Json<UsageResponse> {
    Json(UsageResponse { usage: state.generator.usage() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::config::Config;
    use crate::errors::Result;
    use crate::provider::{ChatReply, ChatRequest, DynProvider, Provider};
    use crate::usage::UsageCounter;

    fn state_with(provider: Option<DynProvider>) -> AppState {
        let generator = Generator::new(&Config::default(), provider, Arc::new(UsageCounter::new(100)));
        AppState { generator: Arc::new(generator) }
    }

    fn request(prompt: &str) -> GenerateRequest {
        GenerateRequest { prompt: prompt.into(), model: None, context: None, files: None }
    }

    #[tokio::test]
    async fn missing_prompt_maps_to_400() {
        let err = generate(State(state_with(None)), Json(request("")))
            .await
            .err()
            .expect("empty prompt must fail");
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
        assert!(err.1 .0.code.is_none());
    }

    #[tokio::test]
    async fn degraded_generate_returns_renderable_files() {
        let resp = generate(State(state_with(None)), Json(request("landing page")))
            .await
            .unwrap();
        assert_eq!(resp.0.model, "fallback");
        assert!(resp.0.usage.is_none());
        assert!(!resp.0.files.is_empty());
    }

    #[tokio::test]
    async fn upstream_failure_maps_to_500_with_fallback_code() {
        struct Broken;
        #[async_trait]
        impl Provider for Broken {
            async fn complete(&self, _req: &ChatRequest) -> Result<ChatReply> {
                Err(VibeError::Upstream("AIMLAPI returned 502: bad gateway".into()))
            }
        }

        let err = generate(State(state_with(Some(Box::new(Broken)))), Json(request("x")))
            .await
            .err()
            .expect("broken provider must fail");
        assert_eq!(err.0, StatusCode::INTERNAL_SERVER_ERROR);
        let body = err.1 .0;
        assert_eq!(body.error, "Failed to generate component");
        assert!(body.code.unwrap().contains("export default function"));
    }

    #[tokio::test]
    async fn usage_endpoint_reports_counter() {
        let state = state_with(None);
        let resp = usage(State(state)).await;
        assert_eq!(resp.0.usage.requests, 0);
        assert_eq!(resp.0.usage.tokens, 0);
        assert_eq!(resp.0.usage.limit, 100);
    }
}
