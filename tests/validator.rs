//! Black-box tests of the public [`gramcheck::validator::Validator`] API,
//! covering scenarios the in-crate unit tests don't: tolerance overrides and
//! backend failure during re-validation.

use async_trait::async_trait;
use gramcheck::{
    backends::RuleBackend,
    core::{Category, Issue, Severity},
    error::{Error, Result},
    validator::Validator,
};

struct FakeRuleBackend {
    issues_by_text: Vec<(String, Vec<Issue>)>,
    fail: bool,
}

impl FakeRuleBackend {
    fn new(issues_by_text: Vec<(String, Vec<Issue>)>) -> Self {
        Self {
            issues_by_text,
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            issues_by_text: vec![],
            fail: true,
        }
    }
}

#[async_trait]
impl RuleBackend for FakeRuleBackend {
    async fn check(&self, text: &str, _language: &str) -> Result<Vec<Issue>> {
        if self.fail {
            return Err(Error::rule_unavailable("down for maintenance"));
        }
        Ok(self
            .issues_by_text
            .iter()
            .find(|(t, _)| t == text)
            .map(|(_, issues)| issues.clone())
            .unwrap_or_default())
    }

    async fn probe(&self) -> bool {
        !self.fail
    }
}

fn issue(rule_id: &str, span: &str) -> Issue {
    Issue {
        offset: 0,
        length: span.chars().count(),
        message: "msg".to_string(),
        rule_id: rule_id.to_string(),
        category: Category::Grammar,
        severity: Severity::Error,
        original_span: span.to_string(),
        suggestions: vec!["fixed".to_string()],
        context: None,
    }
}

#[tokio::test]
async fn test_tolerance_override_accepts_one_new_issue() {
    let backend = FakeRuleBackend::new(vec![(
        "candidate".to_string(),
        vec![issue("A", "foo"), issue("B", "bar")],
    )]);
    let original = vec![issue("A", "foo")];

    let strict_validator = Validator::new(&backend);
    let rejected = strict_validator.validate("candidate", &original, "en", true).await;
    assert!(!rejected.is_valid);

    let lenient_validator = Validator::new(&backend).with_max_new_issues(1);
    let accepted = lenient_validator.validate("candidate", &original, "en", true).await;
    assert!(accepted.is_valid);
}

#[tokio::test]
async fn test_backend_failure_during_revalidation_rejects_candidate() {
    let backend = FakeRuleBackend::failing();
    let validator = Validator::new(&backend);

    let result = validator.validate("anything", &[], "en", true).await;
    assert!(!result.is_valid);
    assert!(result.message.contains("validation failed"));
}

#[tokio::test]
async fn test_validate_and_choose_surfaces_backend_failure_as_fallback() {
    let backend = FakeRuleBackend::failing();
    let validator = Validator::new(&backend);

    let (text, used_fallback, verdict) = validator
        .validate_and_choose("llm output", "fallback text", &[], "en", true)
        .await
        .unwrap();

    assert!(used_fallback);
    assert_eq!(text, "fallback text");
    assert!(!verdict.is_valid);
}

#[tokio::test]
async fn test_equal_error_count_without_new_issues_is_accepted() {
    let original = vec![issue("A", "foo"), issue("C", "baz")];
    let backend = FakeRuleBackend::new(vec![(
        "candidate".to_string(),
        vec![issue("A", "foo")],
    )]);
    let validator = Validator::new(&backend);

    let result = validator.validate("candidate", &original, "en", true).await;
    assert!(result.is_valid, "fewer issues than the original should always pass");
}
