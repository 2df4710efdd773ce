//! Client for a rule-based grammar checking service (a `LanguageTool`-style
//! HTTP backend).

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    config::RuleBackendConfig,
    core::{Category, Issue, Severity},
    error::{Error, Result},
    languages,
};

/// Contract satisfied by anything that can grade text against grammar rules.
///
/// [`crate::validator::Validator`] depends only on this trait, not on
/// [`RuleClient`] directly, so tests can substitute an in-memory fake.
#[async_trait]
pub trait RuleBackend: Send + Sync {
    /// Check `text` (tagged with internal language code `language`) and
    /// return every issue found, in the backend's own order.
    async fn check(&self, text: &str, language: &str) -> Result<Vec<Issue>>;

    /// Returns `true` if the backend answered a lightweight health probe.
    async fn probe(&self) -> bool;
}

#[derive(Debug, Deserialize)]
struct RawResponse {
    matches: Vec<RawMatch>,
}

#[derive(Debug, Deserialize)]
struct RawMatch {
    offset: usize,
    length: usize,
    message: String,
    #[serde(default)]
    replacements: Vec<RawReplacement>,
    rule: RawRule,
    #[serde(rename = "type")]
    match_type: Option<RawType>,
    context: Option<RawContext>,
}

#[derive(Debug, Deserialize)]
struct RawReplacement {
    value: String,
}

#[derive(Debug, Deserialize)]
struct RawRule {
    id: String,
    category: RawCategory,
}

#[derive(Debug, Deserialize)]
struct RawCategory {
    id: String,
}

#[derive(Debug, Deserialize)]
struct RawType {
    #[serde(rename = "typeName")]
    type_name: String,
}

#[derive(Debug, Deserialize)]
struct RawContext {
    text: String,
}

const MAX_SUGGESTIONS: usize = 5;

fn map_category(provider_id: &str) -> Category {
    match provider_id.to_ascii_uppercase().as_str() {
        "GRAMMAR" => Category::Grammar,
        "TYPOS" | "SPELLING" => Category::Spelling,
        "PUNCTUATION" => Category::Punctuation,
        "STYLE" | "REDUNDANCY" => Category::Style,
        "TYPOGRAPHY" | "CASING" => Category::Typography,
        "CONFUSED_WORDS" => Category::Grammar,
        _ => Category::Other,
    }
}

fn map_severity(type_name: Option<&str>) -> Severity {
    match type_name.map(str::to_ascii_lowercase).as_deref() {
        Some("misspelling" | "grammar") => Severity::Error,
        Some("style") => Severity::Style,
        Some("typographical") => Severity::Warning,
        Some("hint") => Severity::Hint,
        _ => Severity::Warning,
    }
}

impl RawMatch {
    fn into_issue(self, text: &str) -> Issue {
        let original_span = text
            .chars()
            .skip(self.offset)
            .take(self.length)
            .collect::<String>();
        let mut suggestions: Vec<String> =
            self.replacements.into_iter().map(|r| r.value).collect();
        suggestions.truncate(MAX_SUGGESTIONS);

        Issue {
            offset: self.offset,
            length: self.length,
            message: self.message,
            rule_id: self.rule.id,
            category: map_category(&self.rule.category.id),
            severity: map_severity(self.match_type.as_ref().map(|t| t.type_name.as_str())),
            original_span,
            suggestions,
            context: self.context.map(|c| c.text),
        }
    }
}

/// HTTP-backed [`RuleBackend`] implementation.
#[derive(Clone, Debug)]
pub struct RuleClient {
    base_url: String,
    client: Client,
}

impl RuleClient {
    /// Build a client from configuration.
    #[must_use]
    pub fn new(config: &RuleBackendConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .unwrap_or_default();
        Self {
            base_url: config.base_url.clone(),
            client,
        }
    }
}

#[async_trait]
impl RuleBackend for RuleClient {
    async fn check(&self, text: &str, language: &str) -> Result<Vec<Issue>> {
        let provider_tag = languages::lookup(language)
            .map(|l| l.provider_tag)
            .unwrap_or(language);

        let resp = self
            .client
            .post(format!("{}/check", self.base_url))
            .form(&[
                ("text", text),
                ("language", provider_tag),
                ("enabledOnly", "false"),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::rule_timeout()
                } else {
                    Error::rule_unavailable(e.to_string())
                }
            })?;

        match resp.error_for_status_ref() {
            Ok(_) => {
                let raw: RawResponse = resp
                    .json()
                    .await
                    .map_err(|e| Error::rule_protocol(e.to_string()))?;
                Ok(raw
                    .matches
                    .into_iter()
                    .map(|m| m.into_issue(text))
                    .collect())
            },
            Err(e) => Err(Error::rule_protocol(e.to_string())),
        }
    }

    async fn probe(&self) -> bool {
        self.client
            .get(format!("{}/languages", self.base_url))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_category_known() {
        assert_eq!(map_category("GRAMMAR"), Category::Grammar);
        assert_eq!(map_category("TYPOS"), Category::Spelling);
        assert_eq!(map_category("redundancy"), Category::Style);
    }

    #[test]
    fn test_map_category_unknown_falls_back_to_other() {
        assert_eq!(map_category("SOME_NEW_CATEGORY"), Category::Other);
    }

    #[test]
    fn test_map_severity() {
        assert_eq!(map_severity(Some("misspelling")), Severity::Error);
        assert_eq!(map_severity(Some("hint")), Severity::Hint);
        assert_eq!(map_severity(None), Severity::Warning);
    }

    #[test]
    fn test_into_issue_extracts_original_span() {
        let raw = RawMatch {
            offset: 8,
            length: 2,
            message: "use 'het'".to_string(),
            replacements: vec![RawReplacement {
                value: "het".to_string(),
            }],
            rule: RawRule {
                id: "DE_HET".to_string(),
                category: RawCategory {
                    id: "GRAMMAR".to_string(),
                },
            },
            match_type: Some(RawType {
                type_name: "grammar".to_string(),
            }),
            context: None,
        };
        let issue = raw.into_issue("Ik heb de boek gelezen.");
        assert_eq!(issue.original_span, "de");
        assert_eq!(issue.suggestions, vec!["het".to_string()]);
        assert_eq!(issue.category, Category::Grammar);
    }

    #[test]
    fn test_suggestions_truncated_to_max() {
        let raw = RawMatch {
            offset: 0,
            length: 1,
            message: "x".to_string(),
            replacements: (0..10)
                .map(|i| RawReplacement {
                    value: i.to_string(),
                })
                .collect(),
            rule: RawRule {
                id: "X".to_string(),
                category: RawCategory {
                    id: "OTHER".to_string(),
                },
            },
            match_type: None,
            context: None,
        };
        let issue = raw.into_issue("a");
        assert_eq!(issue.suggestions.len(), MAX_SUGGESTIONS);
    }
}
