use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::Value;
use tracing::info;

use postbox_db::models::NewMessage;
use postbox_types::api::{SubmitMessageRequest, SubmitMessageResponse};
use postbox_types::validation::{ValidMessage, validate};

use crate::AppState;
use crate::error::ApiError;

pub const MESSAGE_SENT: &str = "Message sent successfully";

/// POST /api/messages — validate, escape and store one submission.
///
/// A request without a JSON content type is treated as an empty form, so it
/// is answered with the usual per-field errors.
pub async fn submit_message(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let req = match body {
        Ok(Json(value)) => decode_form(value)?,
        Err(JsonRejection::MissingJsonContentType(_)) => SubmitMessageRequest::default(),
        Err(rejection) => return Err(rejection.into()),
    };

    let valid = validate(&req).map_err(ApiError::Validation)?;
    let row = sanitize(valid);

    // Run the blocking insert off the async runtime
    let store = state.store.clone();
    let id = tokio::task::spawn_blocking(move || store.insert_message(&row))
        .await
        .map_err(|e| ApiError::Internal(format!("spawn_blocking join error: {}", e)))?
        .map_err(ApiError::Store)?;

    info!(id, "Message stored");

    Ok((
        StatusCode::CREATED,
        Json(SubmitMessageResponse {
            success: true,
            message: MESSAGE_SENT.to_string(),
            id,
        }),
    ))
}

/// Only a JSON object is a form. Arrays would otherwise be read positionally
/// by the derived visitor.
fn decode_form(value: Value) -> Result<SubmitMessageRequest, ApiError> {
    if !value.is_object() {
        return Err(ApiError::MalformedBody("expected a JSON object".to_string()));
    }
    serde_json::from_value(value).map_err(|e| ApiError::MalformedBody(e.to_string()))
}

/// Free text is escaped before it is stored; the phone is already limited to
/// digits and `+`.
fn sanitize(valid: ValidMessage) -> NewMessage {
    NewMessage {
        name: escape_html(&valid.name),
        phone: valid.phone,
        message: escape_html(&valid.message),
    }
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            '\\' => out.push_str("&#x5C;"),
            '`' => out.push_str("&#96;"),
            _ => out.push(c),
        }
    }
    out
}
