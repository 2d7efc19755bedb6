//! AI configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::config::ConfigError;

/// Default OpenAI-compatible base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default model to use.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

pub const DEFAULT_MAX_TOKENS: u32 = 2000;

pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// AI client configuration.
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// Bearer key for the completion API.
    pub api_key: String,
    pub model: String,
    /// Base URL; `/chat/completions` is appended.
    pub base_url: String,
    pub max_tokens: u32,
    /// Upper bound for one completion call, including reading the body.
    pub timeout: Duration,
}

impl AiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `OPENAI_API_KEY`: API key
    ///
    /// Optional:
    /// - `RECIPEBOX_AI_MODEL`: Model name (default: "gpt-4o-mini")
    /// - `RECIPEBOX_AI_BASE_URL`: API base URL (default: "https://api.openai.com/v1")
    /// - `RECIPEBOX_AI_MAX_TOKENS`: Completion token limit (default: 2000)
    /// - `RECIPEBOX_AI_TIMEOUT_SECS`: Request timeout (default: 60)
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = crate::config::require_env("OPENAI_API_KEY")?;

        let model = env::var("RECIPEBOX_AI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let base_url =
            env::var("RECIPEBOX_AI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let max_tokens = crate::config::parse_env("RECIPEBOX_AI_MAX_TOKENS", DEFAULT_MAX_TOKENS)?;

        let timeout_secs =
            crate::config::parse_env("RECIPEBOX_AI_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;

        Ok(Self {
            api_key,
            model,
            base_url,
            max_tokens,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completions_url_tolerates_trailing_slash() {
        let mut config = AiConfig::new("key");
        config.base_url = "http://localhost:9999/v1/".to_string();
        assert_eq!(
            config.completions_url(),
            "http://localhost:9999/v1/chat/completions"
        );
    }
}
