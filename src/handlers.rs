use axum::{body::Bytes, extract::State, Json};
use serde_json::{json, Value};
use std::fmt;
use tracing::{debug, error, info, Instrument};
use uuid::Uuid;

use crate::error::TranslateError;
use crate::state::AppState;
use crate::translate::{build_prompt, response, TranslationRequest, ValidatedResponse};

/// Stages of one `/translate` request. Transitions only move forward;
/// `Failed` is terminal and reachable from any stage after `ReceivingRequest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ReceivingRequest,
    Validating,
    BuildingPrompt,
    CallingModel,
    ParsingResponse,
    ValidatingResponse,
    Responding,
    /// Carries the error kind, see [`TranslateError::kind`].
    Failed(&'static str),
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReceivingRequest => "receiving_request",
            Self::Validating => "validating",
            Self::BuildingPrompt => "building_prompt",
            Self::CallingModel => "calling_model",
            Self::ParsingResponse => "parsing_response",
            Self::ValidatingResponse => "validating_response",
            Self::Responding => "responding",
            Self::Failed(_) => "failed",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

struct Progress {
    stage: Stage,
}

impl Progress {
    fn new() -> Self {
        Self {
            stage: Stage::ReceivingRequest,
        }
    }

    fn advance(&mut self, next: Stage) {
        debug!(from = %self.stage, to = %next, "translate stage");
        self.stage = next;
    }
}

pub async fn translate(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ValidatedResponse>, TranslateError> {
    let span = tracing::info_span!("translate", request_id = %Uuid::new_v4());
    async move {
        debug!("Received /translate request");
        let mut progress = Progress::new();
        match run(&state, &body, &mut progress).await {
            Ok(result) => {
                progress.advance(Stage::Responding);
                info!("Translation succeeded");
                Ok(Json(result))
            }
            Err(e) => {
                let failed_at = progress.stage;
                progress.advance(Stage::Failed(e.kind()));
                error!(stage = %failed_at, kind = e.kind(), "{}", e);
                Err(e)
            }
        }
    }
    .instrument(span)
    .await
}

async fn run(
    state: &AppState,
    body: &[u8],
    progress: &mut Progress,
) -> Result<ValidatedResponse, TranslateError> {
    progress.advance(Stage::Validating);
    let request = TranslationRequest::from_body(body)?;

    progress.advance(Stage::BuildingPrompt);
    let system_prompt = build_prompt(
        state.config.prompt_template(),
        &request.text,
        &request.instructions,
    );

    progress.advance(Stage::CallingModel);
    debug!("Calling OpenAI model {}", state.model.model_name());
    let raw = state
        .model
        .chat_completion(&system_prompt, &request.text)
        .await?;
    debug!("Raw response: {}", raw);

    progress.advance(Stage::ParsingResponse);
    let payload = response::normalize(response::parse_reply(&raw)?);

    progress.advance(Stage::ValidatingResponse);
    let validated = response::validate(&state.config, payload)?;
    debug!("Response validated successfully");

    Ok(validated)
}

pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "model": state.config.model_name(),
    }))
}
