use serde::{Deserialize, Serialize};

/// One conversation turn, forwarded to the upstream API unchanged.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct RecommendRequest {
    #[serde(default)]
    pub dishes: Vec<String>,
    #[serde(default)]
    pub preferences: String,
    #[serde(default)]
    pub history: Vec<String>,
}

/// Either the structured pick the prompt asks for, or the raw model text
/// when the reply did not follow the format. Serializes without a tag, so
/// clients see `{"name", "reason"}` or `{"recommendation"}`.
#[derive(Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RecommendResponse {
    Pick { name: String, reason: String },
    Fallback { recommendation: String },
}

#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub configured: bool,
    pub status: &'static str,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pick_serializes_flat() {
        let pick = RecommendResponse::Pick {
            name: "宫保鸡丁".to_string(),
            reason: "辣味开胃".to_string(),
        };

        let value = serde_json::to_value(&pick).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "name": "宫保鸡丁", "reason": "辣味开胃" })
        );
    }

    #[test]
    fn fallback_serializes_flat() {
        let fallback = RecommendResponse::Fallback {
            recommendation: "随便吃点吧".to_string(),
        };

        let value = serde_json::to_value(&fallback).unwrap();
        assert_eq!(value, serde_json::json!({ "recommendation": "随便吃点吧" }));
    }

    #[test]
    fn recommend_request_fields_all_default() {
        let request: RecommendRequest = serde_json::from_str("{}").unwrap();
        assert!(request.dishes.is_empty());
        assert!(request.preferences.is_empty());
        assert!(request.history.is_empty());
    }
}
