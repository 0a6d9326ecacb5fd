//!*
use std::net::SocketAddr;

use anyhow::Result;
use wiremock::MockServer;

use signup_relay::{
    config::{AppConfig, CorsConfig, NetConfig, UpstreamConfig},
    App,
};

/// First entry of the allow-list, which doubles as the 403 fallback origin.
pub const ALLOWED_ORIGIN: &str = "https://blog.example.com";
pub const SECOND_ALLOWED_ORIGIN: &str = "http://localhost:8787";

pub const SUBSCRIBE_PATH: &str = "/v1/newsletter/subscribe";

pub struct TestApp {
    pub addr: SocketAddr,
    pub upstream_server: MockServer,
    pub http_client: reqwest::Client,
}

impl TestApp {
    /// Binding port 0 triggers an OS scan for an available port which will
    /// then be bound to the application. A wiremock server stands in for
    /// the upstream subscription API.
    pub async fn spawn() -> Result<TestApp> {
        let upstream_server = MockServer::start().await;

        let config = AppConfig {
            net_config: NetConfig {
                host: [127, 0, 0, 1],
                app_port: 0,
            },
            upstream_config: UpstreamConfig {
                url: upstream_server.uri(),
                subscribe_path: SUBSCRIBE_PATH.to_string(),
                publication_id: "test-publication".to_string(),
                timeout_millis: 2000,
            },
            cors_config: CorsConfig {
                allowed_origins: vec![
                    ALLOWED_ORIGIN.to_string(),
                    SECOND_ALLOWED_ORIGIN.to_string(),
                ],
            },
        };

        let app = App::build_from_config(config).await?;
        let addr = app.listener.local_addr()?;

        tokio::spawn(signup_relay::web::serve(app));

        Ok(TestApp {
            addr,
            upstream_server,
            http_client: reqwest::Client::new(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// A well-formed signup POST from an allow-listed origin.
    pub async fn post_signup(&self, body: &serde_json::Value) -> Result<reqwest::Response> {
        let res = self
            .http_client
            .post(self.url("/"))
            .header("origin", ALLOWED_ORIGIN)
            .json(body)
            .send()
            .await?;
        Ok(res)
    }
}
