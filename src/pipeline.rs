//! The orchestrator: a single public entry point, [`Pipeline::process`],
//! sequencing the rule backend, the model backend, and the validator.

use crate::{
    backends::{decode, ModelBackend, RuleBackend},
    core::{CheckRequest, CheckResponse, Explanation, Issue, Mode},
    prompt,
    validator::Validator,
};

/// Availability of the two backends the pipeline depends on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct HealthStatus {
    /// Whether the rule backend answered a probe.
    pub rule_backend_available: bool,
    /// Whether the model backend answered a probe.
    pub model_backend_available: bool,
    /// Whether the pipeline can serve requests at all (the rule backend is
    /// required; the model backend is optional, as its absence only forces
    /// the deterministic fallback branch).
    pub pipeline_ready: bool,
}

/// Orchestrates a rule backend, a model backend, and a validator built
/// around the former, to implement the two-stage correction pipeline.
///
/// Generic over both backend contracts so tests can substitute in-memory
/// fakes for either collaborator.
pub struct Pipeline<R: RuleBackend, M: ModelBackend> {
    rule_backend: R,
    model_backend: M,
}

impl<R: RuleBackend, M: ModelBackend> Pipeline<R, M> {
    /// Build a pipeline around the given backends.
    pub fn new(rule_backend: R, model_backend: M) -> Self {
        Self {
            rule_backend,
            model_backend,
        }
    }

    /// Probe both backends concurrently and report their availability.
    pub async fn check_services(&self) -> HealthStatus {
        let (rule_ok, model_ok) =
            tokio::join!(self.rule_backend.probe(), self.model_backend.probe());
        HealthStatus {
            rule_backend_available: rule_ok,
            model_backend_available: model_ok,
            pipeline_ready: rule_ok,
        }
    }

    /// Process a single request through the full pipeline.
    pub async fn process(&self, request: &CheckRequest) -> CheckResponse {
        let text = request.text.as_str();
        let language = request.language.as_str();
        let include_rewrites = request.mode == Mode::Style;

        let issues = match self.rule_backend.check(text, language).await {
            Ok(issues) => issues,
            Err(_) => {
                return finish(
                    CheckResponse::new(
                        text.to_string(),
                        text.to_string(),
                        vec![],
                        vec![],
                        vec![],
                        false,
                        true,
                        language.to_string(),
                    ),
                    request,
                );
            },
        };

        let response = if issues.is_empty() {
            self.process_no_issues(request, text, language, include_rewrites)
                .await
        } else {
            self.process_with_issues(request, text, language, issues, include_rewrites)
                .await
        };

        finish(response, request)
    }

    async fn process_no_issues(
        &self,
        request: &CheckRequest,
        text: &str,
        language: &str,
        include_rewrites: bool,
    ) -> CheckResponse {
        let system = prompt::system_prompt(language);
        let review_prompt = prompt::build_style_review_prompt(text, language, request.tone);

        let raw = match self.model_backend.complete(system, &review_prompt).await {
            Ok(raw) => raw,
            Err(_) => {
                return CheckResponse::new(
                    text.to_string(),
                    text.to_string(),
                    vec![],
                    vec![],
                    vec![],
                    true,
                    false,
                    language.to_string(),
                );
            },
        };

        let Some(decoded) = decode(&raw, text) else {
            return CheckResponse::new(
                text.to_string(),
                text.to_string(),
                vec![],
                vec![],
                vec![],
                true,
                false,
                language.to_string(),
            );
        };

        let model_found_issues = decoded.corrected_text != text;
        let mut corrected = decoded.corrected_text.clone();

        if model_found_issues {
            let validator = Validator::new(&self.rule_backend);
            let verdict = validator.validate(&corrected, &[], language, true).await;
            if !verdict.is_valid {
                corrected = text.to_string();
            }
        }

        let issues = if model_found_issues {
            explanations_to_issues(text, &decoded.explanations)
        } else {
            vec![]
        };

        CheckResponse::new(
            text.to_string(),
            corrected,
            issues,
            if include_rewrites {
                decoded.rewrites
            } else {
                vec![]
            },
            decoded.explanations,
            true,
            false,
            language.to_string(),
        )
    }

    async fn process_with_issues(
        &self,
        request: &CheckRequest,
        text: &str,
        language: &str,
        issues: Vec<Issue>,
        include_rewrites: bool,
    ) -> CheckResponse {
        let fallback_text = apply_rule_based_fixes(text, &issues);
        let system = prompt::system_prompt(language);
        let correction_prompt =
            prompt::build_correction_prompt(text, &issues, language, request.tone, include_rewrites);

        let raw = match self.model_backend.complete(system, &correction_prompt).await {
            Ok(raw) => raw,
            Err(_) => {
                return CheckResponse::new(
                    text.to_string(),
                    fallback_text,
                    issues.clone(),
                    vec![],
                    generate_basic_explanations(&issues),
                    false,
                    true,
                    language.to_string(),
                );
            },
        };

        let Some(decoded) = decode(&raw, text) else {
            return CheckResponse::new(
                text.to_string(),
                fallback_text,
                issues.clone(),
                vec![],
                generate_basic_explanations(&issues),
                false,
                true,
                language.to_string(),
            );
        };

        let validator = Validator::new(&self.rule_backend);
        let (final_text, used_fallback, verdict) = validator
            .validate_and_choose(&decoded.corrected_text, &fallback_text, &issues, language, true)
            .await
            .unwrap_or_else(|_| {
                (
                    fallback_text.clone(),
                    true,
                    crate::core::ValidationResult {
                        is_valid: false,
                        new_issues: vec![],
                        message: "validation failed".to_string(),
                    },
                )
            });

        let (rewrites, explanations) = if used_fallback {
            (vec![], generate_basic_explanations(&issues))
        } else {
            (
                if include_rewrites {
                    decoded.rewrites
                } else {
                    vec![]
                },
                decoded.explanations,
            )
        };

        CheckResponse::new(
            text.to_string(),
            final_text,
            issues,
            rewrites,
            explanations,
            verdict.is_valid,
            used_fallback,
            language.to_string(),
        )
    }
}

/// Apply each issue's first suggestion to `text`, replacing issue spans in
/// descending offset order so earlier edits do not invalidate the offsets
/// of later ones. Issues without a suggestion are left untouched.
fn apply_rule_based_fixes(text: &str, issues: &[Issue]) -> String {
    let mut sorted: Vec<&Issue> = issues.iter().collect();
    sorted.sort_by(|a, b| b.offset.cmp(&a.offset));

    let mut chars: Vec<char> = text.chars().collect();
    for issue in sorted {
        if let Some(suggestion) = issue.best_suggestion() {
            let start = issue.offset.min(chars.len());
            let end = (issue.offset + issue.length).min(chars.len());
            if start <= end {
                chars.splice(start..end, suggestion.chars());
            }
        }
    }
    chars.into_iter().collect()
}

/// Synthesize one explanation per issue that has a suggestion, using the
/// rule backend's own message as the reason.
fn generate_basic_explanations(issues: &[Issue]) -> Vec<Explanation> {
    issues
        .iter()
        .filter_map(|issue| {
            issue.best_suggestion().map(|suggestion| Explanation {
                span: issue.original_span.clone(),
                original: issue.original_span.clone(),
                corrected: suggestion.to_string(),
                reason: issue.message.clone(),
            })
        })
        .collect()
}

/// Convert model-reported explanations into [`Issue`]s, used when the model
/// finds problems the rule backend missed. The offset is found by a first
/// substring match; if the span does not occur in `text`, offset `0` is
/// used rather than failing the conversion.
fn explanations_to_issues(text: &str, explanations: &[Explanation]) -> Vec<Issue> {
    explanations
        .iter()
        .filter(|exp| !exp.original.is_empty() && exp.original != exp.corrected)
        .map(|exp| {
            let offset = text.find(&exp.original).map_or(0, |byte_idx| {
                text[..byte_idx].chars().count()
            });
            let length = exp.original.chars().count();
            let context_start = offset.saturating_sub(20);
            let context = text
                .chars()
                .skip(context_start)
                .take(length + 40)
                .collect::<String>();

            Issue {
                offset,
                length,
                message: if exp.reason.is_empty() {
                    "model-detected issue".to_string()
                } else {
                    exp.reason.clone()
                },
                rule_id: "MODEL_DETECTED".to_string(),
                category: crate::core::Category::Grammar,
                severity: crate::core::Severity::Warning,
                original_span: exp.original.clone(),
                suggestions: vec![exp.corrected.clone()],
                context: Some(context),
            }
        })
        .collect()
}

/// Honor `include_explanations = false` without touching any other field.
fn finish(mut response: CheckResponse, request: &CheckRequest) -> CheckResponse {
    if !request.include_explanations {
        response.clear_explanations();
    }
    response
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::{
        core::{Category, Severity},
        error::{Error, Result},
    };

    struct FakeRuleBackend {
        response: std::sync::Mutex<std::collections::HashMap<String, Vec<Issue>>>,
        fail: bool,
    }

    impl FakeRuleBackend {
        fn new() -> Self {
            Self {
                response: std::sync::Mutex::new(std::collections::HashMap::new()),
                fail: false,
            }
        }

        fn with_issues(self, text: &str, issues: Vec<Issue>) -> Self {
            self.response
                .lock()
                .unwrap()
                .insert(text.to_string(), issues);
            self
        }

        fn failing() -> Self {
            Self {
                response: std::sync::Mutex::new(std::collections::HashMap::new()),
                fail: true,
            }
        }
    }

    #[async_trait]
    impl RuleBackend for FakeRuleBackend {
        async fn check(&self, text: &str, _language: &str) -> Result<Vec<Issue>> {
            if self.fail {
                return Err(Error::rule_unavailable("down"));
            }
            Ok(self
                .response
                .lock()
                .unwrap()
                .get(text)
                .cloned()
                .unwrap_or_default())
        }

        async fn probe(&self) -> bool {
            !self.fail
        }
    }

    struct FakeModelBackend {
        reply: Option<String>,
    }

    #[async_trait]
    impl ModelBackend for FakeModelBackend {
        async fn complete(&self, _system: &str, _prompt: &str) -> Result<String> {
            self.reply
                .clone()
                .ok_or_else(|| Error::model_unavailable("no reply configured"))
        }

        async fn probe(&self) -> bool {
            self.reply.is_some()
        }
    }

    fn issue(rule_id: &str, offset: usize, span: &str, suggestion: &str) -> Issue {
        Issue {
            offset,
            length: span.chars().count(),
            message: format!("fix {span}"),
            rule_id: rule_id.to_string(),
            category: Category::Grammar,
            severity: Severity::Error,
            original_span: span.to_string(),
            suggestions: vec![suggestion.to_string()],
            context: None,
        }
    }

    #[tokio::test]
    async fn test_scenario_model_accepted() {
        let text = "Ik heb de boek gelezen.";
        let rule = FakeRuleBackend::new()
            .with_issues(text, vec![issue("DE_HET", 8, "de", "het")])
            .with_issues("Ik heb het boek gelezen.", vec![]);
        let model = FakeModelBackend {
            reply: Some(
                r#"{"corrected_text":"Ik heb het boek gelezen.","rewrites":[],"explanations":[{"span":"de","original":"de","corrected":"het","reason":"article"}]}"#
                    .to_string(),
            ),
        };
        let pipeline = Pipeline::new(rule, model);
        let req = CheckRequest::new(text).with_language("nl");
        let resp = pipeline.process(&req).await;

        assert_eq!(resp.corrected_text, "Ik heb het boek gelezen.");
        assert!(!resp.fallback_used);
        assert!(resp.validation_passed);
    }

    #[tokio::test]
    async fn test_scenario_model_times_out_falls_back() {
        let text = "Ik heb de boek gelezen.";
        let rule = FakeRuleBackend::new().with_issues(text, vec![issue("DE_HET", 8, "de", "het")]);
        let model = FakeModelBackend { reply: None };
        let pipeline = Pipeline::new(rule, model);
        let req = CheckRequest::new(text).with_language("nl");
        let resp = pipeline.process(&req).await;

        assert_eq!(resp.corrected_text, "Ik heb het boek gelezen.");
        assert!(resp.fallback_used);
        assert!(!resp.validation_passed);
    }

    #[tokio::test]
    async fn test_scenario_model_introduces_new_issue_falls_back() {
        let text = "Hij loop naar de werk.";
        let fixed = "Hij loopt naar het werk.";
        let rule = FakeRuleBackend::new()
            .with_issues(
                text,
                vec![
                    issue("VERB_FORM", 4, "loop", "loopt"),
                    issue("DE_HET", 14, "de", "het"),
                ],
            )
            .with_issues(
                "Hij loopt naar het werk, I think.",
                vec![issue("NEW_RULE", 0, "new", "fix")],
            );
        let model = FakeModelBackend {
            reply: Some(
                r#"{"corrected_text":"Hij loopt naar het werk, I think."}"#.to_string(),
            ),
        };
        let pipeline = Pipeline::new(rule, model);
        let req = CheckRequest::new(text).with_language("nl");
        let resp = pipeline.process(&req).await;

        assert_eq!(resp.corrected_text, fixed);
        assert!(resp.fallback_used);
    }

    #[tokio::test]
    async fn test_scenario_no_issues_style_mode_returns_rewrites() {
        let text = "Dit is een correcte zin.";
        let rule = FakeRuleBackend::new().with_issues(text, vec![]);
        let model = FakeModelBackend {
            reply: Some(
                r#"{"corrected_text":"Dit is een correcte zin.","rewrites":[{"text":"a","tone":"formal","score":8},{"text":"b","tone":"casual","score":7}]}"#
                    .to_string(),
            ),
        };
        let pipeline = Pipeline::new(rule, model);
        let req = CheckRequest::new(text)
            .with_language("nl")
            .with_mode(Mode::Style);
        let resp = pipeline.process(&req).await;

        assert_eq!(resp.corrected_text, text);
        assert!(!resp.fallback_used);
        assert!(resp.validation_passed);
        assert_eq!(resp.rewrites.len(), 2);
    }

    #[tokio::test]
    async fn test_scenario_unsupported_language_never_reaches_backends() {
        let req = CheckRequest::new("whatever").with_language("zz");
        assert!(req.validate(1000).is_err());
    }

    #[tokio::test]
    async fn test_rule_backend_failure_is_degraded_response_not_error() {
        let rule = FakeRuleBackend::failing();
        let model = FakeModelBackend { reply: None };
        let pipeline = Pipeline::new(rule, model);
        let req = CheckRequest::new("some text").with_language("en");
        let resp = pipeline.process(&req).await;

        assert_eq!(resp.corrected_text, "some text");
        assert!(resp.fallback_used);
        assert!(!resp.validation_passed);
        assert!(resp.issues.is_empty());
    }

    #[tokio::test]
    async fn test_strict_mode_never_returns_rewrites() {
        let text = "Ik heb de boek gelezen.";
        let rule = FakeRuleBackend::new()
            .with_issues(text, vec![issue("DE_HET", 8, "de", "het")])
            .with_issues("Ik heb het boek gelezen.", vec![]);
        let model = FakeModelBackend {
            reply: Some(
                r#"{"corrected_text":"Ik heb het boek gelezen.","rewrites":[{"text":"x","tone":"formal","score":5}]}"#
                    .to_string(),
            ),
        };
        let pipeline = Pipeline::new(rule, model);
        let req = CheckRequest::new(text)
            .with_language("nl")
            .with_mode(Mode::Strict);
        let resp = pipeline.process(&req).await;
        assert!(resp.rewrites.is_empty());
    }

    #[tokio::test]
    async fn test_include_explanations_false_clears_explanations_only() {
        let text = "Ik heb de boek gelezen.";
        let rule = FakeRuleBackend::new()
            .with_issues(text, vec![issue("DE_HET", 8, "de", "het")])
            .with_issues("Ik heb het boek gelezen.", vec![]);
        let model = FakeModelBackend {
            reply: Some(
                r#"{"corrected_text":"Ik heb het boek gelezen.","explanations":[{"span":"de","corrected":"het","reason":"x"}]}"#
                    .to_string(),
            ),
        };
        let pipeline = Pipeline::new(rule, model);
        let req = CheckRequest::new(text)
            .with_language("nl")
            .with_include_explanations(false);
        let resp = pipeline.process(&req).await;
        assert!(resp.explanations.is_empty());
        assert!(!resp.fallback_used);
    }

    #[test]
    fn test_apply_rule_based_fixes_handles_multiple_issues_in_descending_order() {
        let text = "Hij loop naar de werk.";
        let issues = vec![
            issue("VERB_FORM", 4, "loop", "loopt"),
            issue("DE_HET", 14, "de", "het"),
        ];
        assert_eq!(
            apply_rule_based_fixes(text, &issues),
            "Hij loopt naar het werk."
        );
    }

    #[test]
    fn test_apply_rule_based_fixes_skips_issues_without_suggestions() {
        let mut no_suggestion = issue("X", 0, "Hij", "ignored");
        no_suggestion.suggestions.clear();
        let text = "Hij liep.";
        assert_eq!(apply_rule_based_fixes(text, &[no_suggestion]), text);
    }
}
