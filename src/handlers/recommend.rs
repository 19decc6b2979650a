use axum::{Json, extract::State};
use serde::Deserialize;

use crate::dtos::{ChatMessage, RecommendRequest, RecommendResponse};
use crate::error::AppError;
use crate::handlers::SAMPLING_TEMPERATURE;
use crate::startup::AppState;

const SYSTEM_PROMPT: &str = "你是一个专业的中文美食推荐助手。";

pub async fn recommend(
    State(state): State<AppState>,
    Json(payload): Json<RecommendRequest>,
) -> Result<Json<RecommendResponse>, AppError> {
    let messages = [
        ChatMessage {
            role: "system".to_string(),
            content: SYSTEM_PROMPT.to_string(),
        },
        ChatMessage {
            role: "user".to_string(),
            content: build_prompt(&payload),
        },
    ];

    let content = state
        .completion
        .chat_completion(&messages, SAMPLING_TEMPERATURE)
        .await?;

    Ok(Json(parse_pick(content)))
}

/// Compose the instruction prompt. Empty inputs keep their section with a
/// `(空)`/`(无)` placeholder so the model always sees the same shape.
fn build_prompt(payload: &RecommendRequest) -> String {
    let dishes = or_placeholder(payload.dishes.join("、"), "(空)");
    let preferences = or_placeholder(payload.preferences.clone(), "(无)");
    let history = or_placeholder(payload.history.join("、"), "(无)");

    [
        "你是一个美食推荐助手。".to_string(),
        "请从“可选菜品列表”中挑选 1 道最合适的，并简要说明理由。".to_string(),
        "若用户有偏好/忌口/预算等，请综合考虑。".to_string(),
        r#"输出严格遵循 JSON 格式：{"name":"菜名","reason":"简短理由"}，不要包含多余文本。"#.to_string(),
        String::new(),
        format!("可选菜品列表: {}", dishes),
        format!("用户偏好: {}", preferences),
        format!("近期抽中: {}", history),
    ]
    .join("\n")
}

fn or_placeholder(value: String, placeholder: &str) -> String {
    if value.is_empty() {
        placeholder.to_string()
    } else {
        value
    }
}

/// Decide between the structured pick and the raw fallback. The pick must
/// carry both fields; anything else degrades to the fallback without error.
fn parse_pick(content: String) -> RecommendResponse {
    #[derive(Deserialize)]
    struct StructuredPick {
        name: String,
        reason: String,
    }

    match serde_json::from_str::<StructuredPick>(&content) {
        Ok(pick) => RecommendResponse::Pick {
            name: pick.name,
            reason: pick.reason,
        },
        Err(_) => RecommendResponse::Fallback {
            recommendation: content,
        },
    }
}
