use std::sync::Arc;

use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use docfiler_core::extract;

use crate::prompt::{NO_TEXT_SENTINEL, build_prompt};
use crate::state::AppState;
use crate::upload::parse_multipart;

/// The reply envelope: one textual field carrying the model's raw text, the
/// sentinel, or a model-failure description. The relay never validates or
/// parses the text itself.
#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryReply {
    pub summary: String,
}

/// `POST /upload` — the orchestration core: extract, truncate, prompt, call
/// the model, relay its raw text.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<SummaryReply>, (StatusCode, String)> {
    let file = parse_multipart(multipart)
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, e))?;

    tracing::debug!(filename = %file.filename, bytes = file.data.len(), "upload received");

    // PDF decoding is CPU-bound; keep it off the async workers.
    let kind = file.kind;
    let data = file.data;
    let text = tokio::task::spawn_blocking(move || extract(&data, kind))
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Extraction task error: {}", e),
            )
        })?;

    if text.is_empty() {
        // Normal outcome, not a fault: nothing extractable in the input.
        return Ok(Json(SummaryReply {
            summary: NO_TEXT_SENTINEL.to_string(),
        }));
    }

    let prompt = build_prompt(&text);
    let summary = match state
        .model
        .generate(&prompt, &state.http, state.model_timeout)
        .await
    {
        Ok(reply) => reply,
        Err(e) => {
            // Model failures become ordinary reply content; the caller always
            // receives a string, never a fault.
            tracing::warn!(model = state.model.name(), error = %e, "model call failed");
            format!("Error calling {} API: {}", state.model.name(), e)
        }
    };

    Ok(Json(SummaryReply { summary }))
}
