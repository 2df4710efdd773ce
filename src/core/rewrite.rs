//! Whole-text alternative phrasings and per-span explanations.

use serde::{Deserialize, Serialize};

use crate::languages::Tone;

/// A whole-text alternative formulation in a specified register.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct Rewrite {
    /// The rewritten text.
    pub text: String,
    /// Register the rewrite was generated for.
    pub tone: Tone,
    /// Model-reported confidence in `[0, 10]`.
    pub score: f32,
    /// Optional short description of what changed.
    pub changes_summary: Option<String>,
}

impl Rewrite {
    /// Clamp `score` into the documented `[0, 10]` range, coercing NaN to 0.
    #[must_use]
    pub fn clamp_score(score: f32) -> f32 {
        if score.is_nan() {
            0.0
        } else {
            score.clamp(0.0, 10.0)
        }
    }
}

/// Justification pairing a span's original form with its corrected form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct Explanation {
    /// The span of text the explanation concerns.
    pub span: String,
    /// The original wording.
    pub original: String,
    /// The corrected wording.
    pub corrected: String,
    /// Why the correction was made.
    pub reason: String,
}
