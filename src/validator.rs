//! Re-checks a candidate corrected text against the issues detected in the
//! original, and decides whether the candidate is acceptable.
//!
//! This is the component that keeps a stochastic model backend honest: its
//! output is never trusted on its own word, only on a fresh pass through
//! the same rule-based oracle that produced the original issue list.

use crate::{
    backends::RuleBackend,
    core::{Issue, ValidationResult},
    error::Result,
};

/// Maximum number of genuinely new issues tolerated before a candidate is
/// rejected. The specified default is zero: any newly introduced error
/// rejects the candidate outright.
pub const DEFAULT_MAX_NEW_ISSUES: usize = 0;

/// Re-checks candidates produced by the model backend.
pub struct Validator<'a, R: RuleBackend> {
    rule_backend: &'a R,
    max_new_issues: usize,
}

impl<'a, R: RuleBackend> Validator<'a, R> {
    /// Build a validator around a rule backend, using the default
    /// tolerance of zero new issues.
    #[must_use]
    pub fn new(rule_backend: &'a R) -> Self {
        Self {
            rule_backend,
            max_new_issues: DEFAULT_MAX_NEW_ISSUES,
        }
    }

    /// Override the tolerance for newly introduced issues.
    #[must_use]
    pub fn with_max_new_issues(mut self, max_new_issues: usize) -> Self {
        self.max_new_issues = max_new_issues;
        self
    }

    /// Returns `true` iff `candidate` (found by re-checking with the rule
    /// backend) is similar to some issue already present in `original`.
    ///
    /// Two issues are similar when they share a `rule_id` and (case-folded)
    /// span, or when their spans match exactly -- offsets are deliberately
    /// excluded, because a successful fix shifts every later offset.
    fn is_similar_issue(candidate: &Issue, original: &[Issue]) -> bool {
        let candidate_key = candidate.similarity_key();
        original
            .iter()
            .any(|orig| candidate_key == orig.similarity_key() || candidate.original_span == orig.original_span)
    }

    /// Re-check `candidate` against `original_issues` and decide whether it
    /// is acceptable.
    ///
    /// `strict` mirrors the rule-backend's strictness; when `false`, newly
    /// introduced `style`/`typography` issues are ignored rather than
    /// counted toward rejection.
    pub async fn validate(
        &self,
        candidate: &str,
        original_issues: &[Issue],
        language: &str,
        strict: bool,
    ) -> ValidationResult {
        let new_issues = match self.rule_backend.check(candidate, language).await {
            Ok(issues) => issues,
            Err(e) => {
                return ValidationResult {
                    is_valid: false,
                    new_issues: vec![],
                    message: format!("validation failed: {e}"),
                }
            },
        };

        let truly_new: Vec<Issue> = new_issues
            .iter()
            .filter(|issue| !Self::is_similar_issue(issue, original_issues))
            .filter(|issue| strict || !issue.is_cosmetic())
            .cloned()
            .collect();

        if truly_new.len() > self.max_new_issues {
            return ValidationResult {
                is_valid: false,
                message: format!("candidate introduced {} new issues", truly_new.len()),
                new_issues: truly_new,
            };
        }

        if new_issues.len() > original_issues.len() {
            return ValidationResult {
                is_valid: false,
                message: "candidate did not reduce the error count".to_string(),
                new_issues,
            };
        }

        ValidationResult {
            is_valid: true,
            new_issues: truly_new,
            message: "validation passed".to_string(),
        }
    }

    /// Validate `llm_text` and choose between it and `fallback_text`.
    ///
    /// Returns `(chosen_text, used_fallback, verdict)`.
    pub async fn validate_and_choose(
        &self,
        llm_text: &str,
        fallback_text: &str,
        original_issues: &[Issue],
        language: &str,
        strict: bool,
    ) -> Result<(String, bool, ValidationResult)> {
        let verdict = self
            .validate(llm_text, original_issues, language, strict)
            .await;

        if verdict.is_valid {
            Ok((llm_text.to_string(), false, verdict))
        } else {
            Ok((fallback_text.to_string(), true, verdict))
        }
    }
}
