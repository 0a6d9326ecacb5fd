//! The configuration structs used to build the AppConfig, and their impls.
use serde::Deserialize;
use strum_macros::AsRefStr;

use crate::config::ConfigError;

// ###################################
// ->   STRUCTS
// ###################################
#[derive(AsRefStr)]
pub enum Environment {
    Local,
    Production,
}

#[derive(Deserialize, Clone, Debug)]
pub struct AppConfig {
    pub net_config: NetConfig,
    pub upstream_config: UpstreamConfig,
    pub cors_config: CorsConfig,
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NetConfig {
    pub host: [u8; 4],
    pub app_port: u16,
}

/// The third-party subscription API this service relays to.
/// The subscribe URL is `{url}{subscribe_path}`, joined by plain concatenation.
#[derive(Deserialize, Clone, Debug)]
pub struct UpstreamConfig {
    pub url: String,
    pub subscribe_path: String,
    pub publication_id: String,
    pub timeout_millis: u64,
}

/// The ordered origin allow-list. The first entry doubles as the
/// `Access-Control-Allow-Origin` fallback on 403 responses, so the list
/// must never be empty.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

// ###################################
// ->   IMPLs
// ###################################
impl UpstreamConfig {
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_millis)
    }
}

impl CorsConfig {
    pub fn is_allowed(&self, origin: &str) -> bool {
        self.allowed_origins.iter().any(|o| o == origin)
    }

    /// The `Access-Control-Allow-Origin` value served to disallowed callers.
    pub fn fallback_origin(&self) -> &str {
        self.allowed_origins
            .first()
            .map(String::as_str)
            .unwrap_or_default()
    }
}

// ###################################
// ->   TRY FROMs
// ###################################

impl TryFrom<String> for Environment {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            _ => Err(Self::Error::StringToEnvironmentFail),
        }
    }
}

impl TryFrom<&str> for CorsConfig {
    type Error = ConfigError;

    /// Parses a comma-separated origin list, e.g.
    /// `https://blog.example.com,http://localhost:8787`.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let allowed_origins: Vec<String> = value
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(ToOwned::to_owned)
            .collect();

        if allowed_origins.is_empty() {
            return Err(Self::Error::StringToCorsConfigFail);
        }

        Ok(CorsConfig { allowed_origins })
    }
}

// ###################################
// ->   TESTS
// ###################################
