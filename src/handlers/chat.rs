use axum::{Json, extract::State};

use crate::dtos::{ChatMessage, ChatRequest, ChatResponse};
use crate::error::AppError;
use crate::handlers::SAMPLING_TEMPERATURE;
use crate::startup::AppState;

/// How many conversation turns get forwarded upstream; older ones are
/// dropped so long sessions cannot grow the prompt without bound.
pub const CHAT_HISTORY_WINDOW: usize = 20;

const SYSTEM_PROMPT: &str = "你是一个中文美食助手。简洁、友好地回答用户关于吃什么的问题。";

pub async fn chat(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let recent = windowed(&payload.messages);

    let mut messages = Vec::with_capacity(recent.len() + 1);
    messages.push(ChatMessage {
        role: "system".to_string(),
        content: SYSTEM_PROMPT.to_string(),
    });
    messages.extend_from_slice(recent);

    let reply = state
        .completion
        .chat_completion(&messages, SAMPLING_TEMPERATURE)
        .await?;

    Ok(Json(ChatResponse { reply }))
}

/// The last `CHAT_HISTORY_WINDOW` entries, oldest first.
fn windowed(messages: &[ChatMessage]) -> &[ChatMessage] {
    let start = messages.len().saturating_sub(CHAT_HISTORY_WINDOW);
    &messages[start..]
}
