use anyhow::Result;
use dotenvy::dotenv;
use secrecy::Secret;
use std::env;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

#[derive(Clone, Debug)]
pub struct Config {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub static_dir: String,
    pub cors_origins: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Clone, Debug)]
pub struct UpstreamConfig {
    /// Base URL of an OpenAI-compatible API, without the endpoint path.
    pub base_url: String,
    /// Missing key leaves the relay up but answering with configuration errors.
    pub api_key: Option<Secret<String>>,
    pub model: String,
    pub timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()?;

        let base_url = normalize_base_url(
            &env::var("AI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
        );
        let api_key = env::var("AI_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .map(Secret::new);
        let model = env::var("AI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let timeout_secs = env::var("AI_TIMEOUT_SECS")
            .unwrap_or_else(|_| "120".to_string())
            .parse()?;

        let static_dir = env::var("STATIC_DIR").unwrap_or_else(|_| "public".to_string());
        let cors_origins = parse_origins(&env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string()));

        Ok(Self {
            server: ServerConfig { host, port },
            upstream: UpstreamConfig {
                base_url,
                api_key,
                model,
                timeout_secs,
            },
            static_dir,
            cors_origins,
        })
    }
}

/// Strip trailing slashes so endpoint paths can be appended verbatim.
pub fn normalize_base_url(raw: &str) -> String {
    raw.trim_end_matches('/').to_string()
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().to_string())
        .filter(|origin| !origin.is_empty())
        .collect()
}
