//! Process-wide configuration, loaded once from environment variables.
//!
//! Every field has a default so the service runs against local backends with
//! zero configuration. Once loaded, a [`Config`] is never mutated; it is
//! shared behind an [`std::sync::Arc`] by whichever collaborator needs it.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::languages::DEFAULT_LANGUAGE;

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_string_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Settings for reaching the rule-based grammar backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct RuleBackendConfig {
    /// Base URL, e.g. `"http://localhost:8010/v2"`.
    pub base_url: String,
    /// Request timeout, in seconds.
    pub timeout_s: u64,
}

impl Default for RuleBackendConfig {
    fn default() -> Self {
        Self {
            base_url: env_string_or("RULE_BACKEND_URL", "http://localhost:8010/v2"),
            timeout_s: env_or("RULE_BACKEND_TIMEOUT_S", 10),
        }
    }
}

impl RuleBackendConfig {
    /// The timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_s)
    }
}

/// Settings for reaching the generative model backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct ModelBackendConfig {
    /// Base URL of an OpenAI-compatible chat-completion endpoint.
    pub base_url: String,
    /// Model name to request.
    pub model: String,
    /// Optional bearer API key.
    pub api_key: Option<String>,
    /// Sampling temperature; kept low for deterministic corrections.
    pub temperature: f32,
    /// Maximum number of tokens in the completion.
    pub max_tokens: u32,
    /// Request timeout, in seconds.
    pub timeout_s: u64,
}

impl Default for ModelBackendConfig {
    fn default() -> Self {
        Self {
            base_url: env_string_or(
                "MODEL_BACKEND_URL",
                "https://api.openai.com/v1/chat/completions",
            ),
            model: env_string_or("MODEL_NAME", "gpt-4o-mini"),
            api_key: std::env::var("MODEL_API_KEY").ok(),
            temperature: env_or("MODEL_TEMPERATURE", 0.1),
            max_tokens: env_or("MODEL_MAX_TOKENS", 2048),
            timeout_s: env_or("MODEL_TIMEOUT_S", 30),
        }
    }
}

impl ModelBackendConfig {
    /// The timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_s)
    }
}

/// Settings for the optional end-to-end encryption envelope.
#[cfg(feature = "encryption")]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct EncryptionConfig {
    /// Whether the encryption envelope is enabled at runtime.
    pub enabled: bool,
    /// Path to a PEM-encoded RSA private key; if unset and `enabled` is true,
    /// an ephemeral key pair is generated at startup.
    pub private_key_path: Option<String>,
    /// Path to a PEM-encoded RSA public key.
    pub public_key_path: Option<String>,
}

#[cfg(feature = "encryption")]
impl Default for EncryptionConfig {
    fn default() -> Self {
        Self {
            enabled: env_or("ENCRYPTION_ENABLED", false),
            private_key_path: std::env::var("ENCRYPTION_PRIVATE_KEY_PATH").ok(),
            public_key_path: std::env::var("ENCRYPTION_PUBLIC_KEY_PATH").ok(),
        }
    }
}

/// Settings for the optional per-IP rate limiter.
#[cfg(feature = "rate-limit")]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct RateLimitConfig {
    /// Whether rate limiting is enabled.
    pub enabled: bool,
    /// Maximum number of requests per window, per client IP.
    pub requests: u32,
    /// Window length, in seconds.
    pub window_s: u64,
}

#[cfg(feature = "rate-limit")]
impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: env_or("RATE_LIMIT_ENABLED", false),
            requests: env_or("RATE_LIMIT_REQUESTS", 60),
            window_s: env_or("RATE_LIMIT_WINDOW_S", 60),
        }
    }
}

/// Top-level, process-wide configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct Config {
    /// Rule backend settings.
    pub rule_backend: RuleBackendConfig,
    /// Model backend settings.
    pub model_backend: ModelBackendConfig,
    /// Maximum accepted request text length, in chars.
    pub max_text_length: usize,
    /// Size, in chars, above which the chunker splits a document.
    pub chunk_size: usize,
    /// Cache entry time-to-live, in seconds.
    pub cache_ttl_s: u64,
    /// Maximum number of entries kept in the response cache.
    pub cache_max_entries: usize,
    /// Default language used when a request omits one.
    pub default_language: String,
    /// Optional static API key required on `/api/v1/*` via `X-API-Key`.
    pub api_key: Option<String>,
    /// Allowed CORS origins; `"*"` allows any origin.
    pub cors_origins: String,
    /// Log level passed to the logging backend, e.g. `"info"`.
    pub log_level: String,
    /// Encryption settings.
    #[cfg(feature = "encryption")]
    pub encryption: EncryptionConfig,
    /// Rate limit settings.
    #[cfg(feature = "rate-limit")]
    pub rate_limit: RateLimitConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rule_backend: RuleBackendConfig::default(),
            model_backend: ModelBackendConfig::default(),
            max_text_length: env_or("MAX_TEXT_LENGTH", 20_000),
            chunk_size: env_or("CHUNK_SIZE", 4_000),
            cache_ttl_s: env_or("CACHE_TTL_S", 300),
            cache_max_entries: env_or("CACHE_MAX_ENTRIES", 1_000),
            default_language: env_string_or("DEFAULT_LANGUAGE", DEFAULT_LANGUAGE),
            api_key: std::env::var("API_KEY").ok(),
            cors_origins: env_string_or("CORS_ORIGINS", "*"),
            log_level: env_string_or("LOG_LEVEL", "info"),
            #[cfg(feature = "encryption")]
            encryption: EncryptionConfig::default(),
            #[cfg(feature = "rate-limit")]
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_sane_values() {
        let config = Config {
            api_key: None,
            ..Config::default()
        };
        assert!(config.max_text_length > 0);
        assert!(config.chunk_size > 0);
        assert_eq!(config.default_language, "nl");
    }

    #[test]
    fn test_rule_backend_timeout_duration() {
        let rb = RuleBackendConfig {
            base_url: "http://x".to_string(),
            timeout_s: 5,
        };
        assert_eq!(rb.timeout(), Duration::from_secs(5));
    }
}
