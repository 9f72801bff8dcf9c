//! # Codeform Configuration
//!
//! Settings for the relay, the completion client and the form.
//! Supports loading from environment variables and programmatic defaults.
//! The API key is deliberately not part of this struct: it belongs to the user's session.

use std::env;
use std::time::Duration;

/// OpenAI chat completions endpoint.
pub const OPENAI_CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Path the form posts to.
pub const RELAY_PATH: &str = "/api/paraphrase";

/// Workspace configuration.
///
/// # Example
/// ```rust
/// use codeform_core::CodeformConfig;
///
/// let config = CodeformConfig::default()
///     .with_port(8080)
///     .with_model("gpt-4o-mini");
/// assert_eq!(config.bind_addr(), "127.0.0.1:8080");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CodeformConfig {
    /// Interface the relay listens on.
    /// Default: 127.0.0.1, Env: CODEFORM_BIND
    pub bind: String,

    /// Port the relay listens on.
    /// Default: 3000, Env: CODEFORM_PORT
    pub port: u16,

    /// Full URL of the relay endpoint, used by the CLI form.
    /// Default: http://127.0.0.1:3000/api/paraphrase, Env: CODEFORM_RELAY_URL
    pub relay_url: String,

    /// Chat completions URL the relay forwards to.
    /// Env: CODEFORM_UPSTREAM_URL
    pub upstream_url: String,

    /// Model requested from the completion service.
    /// Default: gpt-3.5-turbo, Env: CODEFORM_MODEL
    pub model: String,

    /// Sampling temperature (0.0 - 2.0).
    /// Default: 0.7, Env: CODEFORM_TEMPERATURE
    pub temperature: f32,

    /// Maximum tokens to generate.
    /// Default: 2048, Env: CODEFORM_MAX_TOKENS
    pub max_tokens: u32,

    /// Relay-side timeout for the upstream call, in seconds.
    /// Default: 60, Env: CODEFORM_TIMEOUT
    pub timeout_seconds: u64,

    /// How long notices stay visible, in milliseconds.
    /// Default: 3000, Env: CODEFORM_NOTICE_MS
    pub notice_ttl_ms: u64,
}

impl Default for CodeformConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 3000,
            relay_url: format!("http://127.0.0.1:3000{}", RELAY_PATH),
            upstream_url: OPENAI_CHAT_COMPLETIONS_URL.to_string(),
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.7,
            max_tokens: 2048,
            timeout_seconds: 60,
            notice_ttl_ms: 3000,
        }
    }
}

impl CodeformConfig {
    /// Create a new config from environment variables.
    /// Falls back to defaults for missing or unparsable variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`CodeformConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = lookup("CODEFORM_BIND") {
            config.bind = v;
        }
        if let Some(v) = lookup("CODEFORM_PORT") {
            if let Ok(n) = v.parse() {
                config.port = n;
                config.relay_url = format!("http://127.0.0.1:{}{}", n, RELAY_PATH);
            }
        }
        if let Some(v) = lookup("CODEFORM_RELAY_URL") {
            config.relay_url = v;
        }
        if let Some(v) = lookup("CODEFORM_UPSTREAM_URL") {
            config.upstream_url = v;
        }
        if let Some(v) = lookup("CODEFORM_MODEL") {
            config.model = v;
        }
        if let Some(v) = lookup("CODEFORM_TEMPERATURE") {
            if let Ok(t) = v.parse::<f32>() {
                config.temperature = t.clamp(0.0, 2.0);
            }
        }
        if let Some(v) = lookup("CODEFORM_MAX_TOKENS") {
            if let Ok(n) = v.parse() {
                config.max_tokens = n;
            }
        }
        if let Some(v) = lookup("CODEFORM_TIMEOUT") {
            if let Ok(n) = v.parse() {
                config.timeout_seconds = n;
            }
        }
        if let Some(v) = lookup("CODEFORM_NOTICE_MS") {
            if let Ok(n) = v.parse() {
                config.notice_ttl_ms = n;
            }
        }

        config
    }

    /// Builder: Set the listen interface.
    pub fn with_bind(mut self, bind: impl Into<String>) -> Self {
        self.bind = bind.into();
        self
    }

    /// Builder: Set the listen port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Builder: Set the relay URL the form posts to.
    pub fn with_relay_url(mut self, url: impl Into<String>) -> Self {
        self.relay_url = url.into();
        self
    }

    /// Builder: Set the upstream completions URL.
    pub fn with_upstream_url(mut self, url: impl Into<String>) -> Self {
        self.upstream_url = url.into();
        self
    }

    /// Builder: Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Builder: Set temperature.
    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = temp.clamp(0.0, 2.0);
        self
    }

    /// Builder: Set the upstream timeout.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// `bind:port`, ready for a listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn notice_ttl(&self) -> Duration {
        Duration::from_millis(self.notice_ttl_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = CodeformConfig::default();
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
        assert_eq!(config.relay_url, "http://127.0.0.1:3000/api/paraphrase");
        assert_eq!(config.upstream_url, OPENAI_CHAT_COMPLETIONS_URL);
        assert_eq!(config.notice_ttl(), Duration::from_millis(3000));
    }

    #[test]
    fn test_builder_pattern() {
        let config = CodeformConfig::default()
            .with_bind("0.0.0.0")
            .with_port(8080)
            .with_temperature(5.0)
            .with_timeout(10);

        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.temperature, 2.0);
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("CODEFORM_PORT", "4000"),
            ("CODEFORM_MODEL", "gpt-4o-mini"),
            ("CODEFORM_MAX_TOKENS", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let config = CodeformConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.port, 4000);
        assert_eq!(config.relay_url, "http://127.0.0.1:4000/api/paraphrase");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.max_tokens, 2048);
    }
}
