//! Common test utilities for dishai-service integration tests.

#![allow(dead_code)]

use dishai_service::config::{Config, ServerConfig, UpstreamConfig};
use dishai_service::startup::Application;
use secrecy::Secret;
use std::sync::Once;
use wiremock::MockServer;

static INIT: Once = Once::new();

/// Initialize tracing for tests (only once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("info,dishai_service=debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Test application running against a mock upstream.
pub struct TestApp {
    pub address: String,
    pub upstream: MockServer,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Spawn the relay on a random port, pointed at a fresh mock upstream.
    pub async fn spawn() -> Self {
        Self::spawn_with_key(Some("test-api-key")).await
    }

    /// Spawn without a credential to exercise the configuration error paths.
    pub async fn spawn_unconfigured() -> Self {
        Self::spawn_with_key(None).await
    }

    async fn spawn_with_key(api_key: Option<&str>) -> Self {
        init_tracing();

        let upstream = MockServer::start().await;

        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            upstream: UpstreamConfig {
                base_url: upstream.uri(),
                api_key: api_key.map(|key| Secret::new(key.to_string())),
                model: "gpt-4o-mini".to_string(),
                timeout_secs: 5,
            },
            static_dir: "public".to_string(),
            cors_origins: vec!["*".to_string()],
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build application");
        let port = app.port();

        // Start the application in the background; the listener is already
        // bound, so requests sent right away just queue until it serves.
        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        TestApp {
            address: format!("http://127.0.0.1:{}", port),
            upstream,
            client: reqwest::Client::new(),
        }
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_json(&self, path: &str, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.address, path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Requests the mock upstream has captured so far, oldest first.
    pub async fn upstream_requests(&self) -> Vec<wiremock::Request> {
        self.upstream.received_requests().await.unwrap_or_default()
    }
}

/// Canned upstream success carrying the given assistant message content.
pub fn completion_body(content: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [
            { "message": { "role": "assistant", "content": content } }
        ]
    })
}
