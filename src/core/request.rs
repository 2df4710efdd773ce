//! The pipeline's single inbound value type.

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    languages::{self, Tone, DEFAULT_LANGUAGE},
};

/// Correction strictness.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Mode {
    /// Fixes only; [`crate::core::CheckResponse::rewrites`] is always empty.
    Strict,
    /// Fixes plus up to two whole-text rewrites.
    Style,
}

impl Default for Mode {
    fn default() -> Self {
        Self::Strict
    }
}

/// A request to check and correct a piece of text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct CheckRequest {
    /// Text to check, `1 ..= max_text_length` chars long.
    pub text: String,
    /// Language code, one of the entries in [`crate::languages::all`].
    #[serde(default = "default_language")]
    pub language: String,
    /// Correction strictness.
    #[serde(default)]
    pub mode: Mode,
    /// Requested rewrite register, consulted only in [`Mode::Style`].
    #[serde(default)]
    pub tone: Tone,
    /// Whether to populate [`crate::core::CheckResponse::explanations`].
    #[serde(default = "default_true")]
    pub include_explanations: bool,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_true() -> bool {
    true
}

impl CheckRequest {
    /// Construct a request with the given text, defaulting everything else.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: default_language(),
            mode: Mode::default(),
            tone: Tone::default(),
            include_explanations: true,
        }
    }

    /// Set the language.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set the mode.
    #[must_use]
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the tone.
    #[must_use]
    pub fn with_tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }

    /// Set whether explanations are included.
    #[must_use]
    pub fn with_include_explanations(mut self, include: bool) -> Self {
        self.include_explanations = include;
        self
    }

    /// Validate this request against `max_text_length`, returning an error
    /// describing the first violation found.
    ///
    /// This is the boundary-layer check described for the HTTP surface; the
    /// pipeline itself does not re-validate its input.
    pub fn validate(&self, max_text_length: usize) -> Result<()> {
        if self.text.is_empty() {
            return Err(Error::InvalidRequest("text must not be empty".to_string()));
        }
        if self.text.chars().count() > max_text_length {
            return Err(Error::InvalidRequest(format!(
                "text exceeds the maximum length of {max_text_length} characters"
            )));
        }
        if !languages::is_supported(&self.language) {
            return Err(Error::InvalidRequest(format!(
                "unsupported language: {:?}",
                self.language
            )));
        }
        Ok(())
    }
}
