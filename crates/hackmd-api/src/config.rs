//! Client configuration.

use thiserror::Error;

/// Public HackMD API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.hackmd.io/v1";

/// API token plus endpoint. Built fresh per action so a settings change is
/// picked up by the next action, never by a stale cached client.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub token: String,
    pub endpoint: String,
}

impl ApiConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    pub fn with_endpoint(token: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            endpoint: endpoint.into(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// - `HACKMD_TOKEN`: API token (required)
    /// - `HACKMD_ENDPOINT`: endpoint override (optional)
    pub fn from_env() -> Result<Self, ConfigError> {
        let token = std::env::var("HACKMD_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty())
            .ok_or(ConfigError::MissingToken)?;
        let endpoint = std::env::var("HACKMD_ENDPOINT")
            .ok()
            .filter(|endpoint| !endpoint.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        Ok(Self { token, endpoint })
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("HACKMD_TOKEN environment variable not set")]
    MissingToken,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_public_endpoint() {
        let config = ApiConfig::new("secret");
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.token, "secret");
    }

    #[test]
    fn with_endpoint_overrides() {
        let config = ApiConfig::with_endpoint("secret", "https://md.example.com/v1");
        assert_eq!(config.endpoint, "https://md.example.com/v1");
    }
}
