//! The pipeline's single outbound value type.

use serde::{Deserialize, Serialize};

use crate::core::{Explanation, Issue, Rewrite};

/// Result of a single correction pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct CheckResponse {
    /// The text exactly as it was submitted.
    pub original_text: String,
    /// The corrected (or, on fallback, patched) text.
    pub corrected_text: String,
    /// Every issue detected in `original_text`.
    pub issues: Vec<Issue>,
    /// Whole-text rewrites; always empty in [`crate::core::Mode::Strict`].
    pub rewrites: Vec<Rewrite>,
    /// Per-span explanations; empty when the request asked to omit them.
    pub explanations: Vec<Explanation>,
    /// Whether the accepted correction passed the validator.
    pub validation_passed: bool,
    /// Whether `corrected_text` was produced by the deterministic fallback
    /// rather than by the model.
    pub fallback_used: bool,
    /// Language the request was checked against.
    pub language: String,
    /// Number of issues detected; always equal to `issues.len()`.
    pub issue_count: usize,
}

impl CheckResponse {
    /// Build a response, deriving `issue_count` from `issues`.
    #[must_use]
    pub fn new(
        original_text: String,
        corrected_text: String,
        issues: Vec<Issue>,
        rewrites: Vec<Rewrite>,
        explanations: Vec<Explanation>,
        validation_passed: bool,
        fallback_used: bool,
        language: String,
    ) -> Self {
        let issue_count = issues.len();
        Self {
            original_text,
            corrected_text,
            issues,
            rewrites,
            explanations,
            validation_passed,
            fallback_used,
            language,
            issue_count,
        }
    }

    /// Empty `explanations` in place, leaving every other field untouched.
    ///
    /// Used to honor `include_explanations = false` without disturbing
    /// `validation_passed` or `fallback_used`.
    pub fn clear_explanations(&mut self) {
        self.explanations.clear();
    }
}

/// Result of re-checking a candidate corrected text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct ValidationResult {
    /// Whether the candidate is accepted.
    pub is_valid: bool,
    /// Issues found in the candidate that were not present (by
    /// [`Issue::similarity_key`]) in the original issue set.
    pub new_issues: Vec<Issue>,
    /// Human-readable explanation of the verdict.
    pub message: String,
}
