//! A single detected grammar/spelling/style problem.

use serde::{Deserialize, Serialize};

/// Broad classification of an [`Issue`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Category {
    /// A grammatical error (agreement, tense, confused words, ...).
    Grammar,
    /// A spelling error.
    Spelling,
    /// A punctuation error.
    Punctuation,
    /// A style suggestion, not strictly incorrect.
    Style,
    /// A capitalization or typography issue.
    Typography,
    /// Incorrect word ordering.
    WordOrder,
    /// Subject/verb or noun/adjective agreement.
    Agreement,
    /// Anything not covered by the categories above.
    Other,
}

/// Severity of an [`Issue`], independent of its [`Category`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Severity {
    /// A clear error.
    Error,
    /// A likely but not certain error.
    Warning,
    /// A stylistic nit.
    Style,
    /// An informational note.
    Hint,
}

/// A single localized problem in a piece of text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct Issue {
    /// Char offset at which the problematic span begins.
    pub offset: usize,
    /// Length, in chars, of the problematic span.
    pub length: usize,
    /// Human-readable description of the problem.
    pub message: String,
    /// Identifier of the rule that flagged this issue, backend-specific.
    pub rule_id: String,
    /// Broad classification.
    pub category: Category,
    /// Severity.
    pub severity: Severity,
    /// The literal substring at `[offset, offset + length)`.
    pub original_span: String,
    /// Ordered list of suggested replacements, most preferred first.
    pub suggestions: Vec<String>,
    /// A short excerpt of surrounding text, when available.
    pub context: Option<String>,
}

impl Issue {
    /// Case-folded comparison key used by [`crate::validator`] to decide
    /// whether two issues (possibly at different offsets, after a fix
    /// shifted the text) refer to the same underlying problem.
    #[must_use]
    pub fn similarity_key(&self) -> (String, String) {
        (self.rule_id.clone(), self.original_span.to_lowercase())
    }

    /// The first suggestion, if any -- used by the deterministic fallback.
    #[must_use]
    pub fn best_suggestion(&self) -> Option<&str> {
        self.suggestions.first().map(String::as_str)
    }

    /// Returns `true` if this issue's category is cosmetic rather than a
    /// correctness error (used by the non-strict validator to decide which
    /// newly introduced issues are tolerated).
    #[must_use]
    pub fn is_cosmetic(&self) -> bool {
        matches!(self.category, Category::Style | Category::Typography)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(rule_id: &str, span: &str) -> Issue {
        Issue {
            offset: 0,
            length: span.chars().count(),
            message: "test".to_string(),
            rule_id: rule_id.to_string(),
            category: Category::Grammar,
            severity: Severity::Error,
            original_span: span.to_string(),
            suggestions: vec!["fixed".to_string()],
            context: None,
        }
    }

    #[test]
    fn test_similarity_key_is_case_insensitive() {
        let a = issue("DE_HET", "De");
        let b = issue("DE_HET", "de");
        assert_eq!(a.similarity_key(), b.similarity_key());
    }

    #[test]
    fn test_best_suggestion() {
        let i = issue("RULE", "foo");
        assert_eq!(i.best_suggestion(), Some("fixed"));

        let mut i2 = issue("RULE", "foo");
        i2.suggestions.clear();
        assert_eq!(i2.best_suggestion(), None);
    }

    #[test]
    fn test_is_cosmetic() {
        let mut i = issue("RULE", "foo");
        i.category = Category::Style;
        assert!(i.is_cosmetic());
        i.category = Category::Grammar;
        assert!(!i.is_cosmetic());
    }
}
