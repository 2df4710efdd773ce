//! Client for an OpenAI-compatible chat-completion endpoint.

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    Client,
};
use serde::{Deserialize, Serialize};

use crate::{
    config::ModelBackendConfig,
    error::{Error, Result},
};

/// Contract satisfied by anything that can turn a prompt into raw model
/// output.
///
/// [`crate::pipeline::Pipeline`] depends only on this trait, so tests can
/// substitute an in-memory fake instead of calling out to a real endpoint.
#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// Send `prompt` (with `system` as the system-role message) to the
    /// model and return its raw textual reply.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String>;

    /// Returns `true` if the backend answered a minimal completion probe.
    async fn probe(&self) -> bool;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// HTTP-backed [`ModelBackend`] implementation.
#[derive(Clone, Debug)]
pub struct ModelClient {
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    client: Client,
}

impl ModelClient {
    /// Build a client from configuration.
    #[must_use]
    pub fn new(config: &ModelBackendConfig) -> Self {
        let mut headers = HeaderMap::new();
        if let Some(api_key) = &config.api_key {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {api_key}")) {
                headers.insert(AUTHORIZATION, value);
            }
        }
        let client = Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()
            .unwrap_or_default();

        Self {
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            client,
        }
    }
}

#[async_trait]
impl ModelBackend for ModelClient {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let resp = self
            .client
            .post(&self.base_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::model_timeout()
                } else {
                    Error::model_unavailable(e.to_string())
                }
            })?;

        match resp.error_for_status_ref() {
            Ok(_) => {
                let parsed: ChatResponse = resp
                    .json()
                    .await
                    .map_err(|e| Error::model_protocol(e.to_string()))?;
                parsed
                    .choices
                    .into_iter()
                    .next()
                    .map(|c| c.message.content)
                    .ok_or_else(|| Error::model_protocol("empty choices array".to_string()))
            },
            Err(e) => Err(Error::model_protocol(e.to_string())),
        }
    }

    async fn probe(&self) -> bool {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: "ping",
            }],
            temperature: 0.0,
            max_tokens: 1,
        };

        self.client
            .post(&self.base_url)
            .json(&body)
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }
}

/// The model's decoded structured reply.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    /// The model's proposed corrected text.
    pub corrected_text: String,
    /// Whole-text rewrites.
    pub rewrites: Vec<crate::core::Rewrite>,
    /// Per-span explanations.
    pub explanations: Vec<crate::core::Explanation>,
}

#[derive(Debug, Deserialize)]
struct RawDecoded {
    corrected_text: Option<String>,
    #[serde(default)]
    rewrites: Vec<serde_json::Value>,
    #[serde(default)]
    explanations: Vec<serde_json::Value>,
}

/// Decode a model's raw textual reply into a [`Decoded`] value.
///
/// The model is untrusted: it may wrap its JSON object in prose, omit
/// fields, or emit malformed list entries. This function tolerates all of
/// that, dropping malformed entries rather than failing the whole decode;
/// it returns `None` only when no JSON object can be located at all.
#[must_use]
pub fn decode(raw: &str, original_text: &str) -> Option<Decoded> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    let object_str = &raw[start..=end];
    let raw_decoded: RawDecoded = serde_json::from_str(object_str).ok()?;

    let corrected_text = raw_decoded
        .corrected_text
        .unwrap_or_else(|| original_text.to_string());

    let rewrites = raw_decoded
        .rewrites
        .into_iter()
        .filter_map(decode_rewrite)
        .collect();

    let explanations = raw_decoded
        .explanations
        .into_iter()
        .filter_map(decode_explanation)
        .collect();

    Some(Decoded {
        corrected_text,
        rewrites,
        explanations,
    })
}

fn decode_rewrite(value: serde_json::Value) -> Option<crate::core::Rewrite> {
    let obj = value.as_object()?;
    let text = obj.get("text")?.as_str()?.to_string();
    let tone: crate::languages::Tone = obj
        .get("tone")
        .and_then(|v| v.as_str())
        .unwrap_or("neutral")
        .parse()
        .unwrap_or_default();
    let score = obj
        .get("score")
        .and_then(serde_json::Value::as_f64)
        .map(|s| s as f32)
        .unwrap_or(5.0);
    let changes_summary = obj
        .get("changes_summary")
        .and_then(|v| v.as_str())
        .map(str::to_string);

    Some(crate::core::Rewrite {
        text,
        tone,
        score: crate::core::Rewrite::clamp_score(score),
        changes_summary,
    })
}

fn decode_explanation(value: serde_json::Value) -> Option<crate::core::Explanation> {
    let obj = value.as_object()?;
    let span = obj.get("span")?.as_str()?.to_string();
    let corrected = obj.get("corrected")?.as_str()?.to_string();
    let original = obj
        .get("original")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| span.clone());
    let reason = obj
        .get("reason")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();

    Some(crate::core::Explanation {
        span,
        original,
        corrected,
        reason,
    })
}
