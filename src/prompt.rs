//! Deterministic construction of prompts sent to the model backend.
//!
//! Every function here is a pure function of its arguments: same inputs,
//! identical bytes out. No network access, no randomness.

use crate::{
    core::Issue,
    languages::{self, Tone},
};

fn language_name(code: &str) -> String {
    languages::lookup(code)
        .map(|l| l.name.to_string())
        .unwrap_or_else(|| code.to_ascii_uppercase())
}

fn format_issues(issues: &[Issue]) -> String {
    issues
        .iter()
        .enumerate()
        .map(|(i, issue)| {
            let suggestions = issue
                .suggestions
                .iter()
                .take(3)
                .map(|s| format!("{s:?}"))
                .collect::<Vec<_>>()
                .join(", ");
            format!(
                "{}. Position {}-{}: {:?} \u{2192} Suggestions: [{}] | Rule: {} | Issue: {}",
                i + 1,
                issue.offset,
                issue.offset + issue.length,
                issue.original_span,
                suggestions,
                issue.rule_id,
                issue.message
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// The fixed structured-output contract both prompt flavors request.
const OUTPUT_FORMAT: &str = r#"OUTPUT FORMAT (strict JSON):
{
  "corrected_text": "...",
  "rewrites": [
    {
      "text": "...",
      "tone": "neutral|formal|casual|academic",
      "score": 8,
      "changes_summary": "..."
    }
  ],
  "explanations": [
    {
      "span": "...",
      "original": "...",
      "corrected": "...",
      "reason": "..."
    }
  ]
}

Respond with JSON only, no additional text."#;

/// Build the correction prompt: text + a ground-truth issue list, asking the
/// model to apply only those fixes.
#[must_use]
pub fn build_correction_prompt(
    text: &str,
    issues: &[Issue],
    language: &str,
    tone: Tone,
    include_rewrites: bool,
) -> String {
    let language_name = language_name(language);
    let tone_description = tone.description();
    let issues_formatted = format_issues(issues);

    let rewrite_instruction = if include_rewrites {
        format!(
            "\nAdditionally, provide 2 alternative rewrites:\n\
             1. FIRST rewrite MUST be in \"{}\" tone ({tone_description}) -- this is the user's selected tone\n\
             2. SECOND rewrite can be in a contrasting tone for comparison\n\
             Each rewrite should preserve the original meaning while improving clarity or style.\n",
            tone.as_str()
        )
    } else {
        String::new()
    };

    format!(
        "You are a precise grammar correction assistant for {language_name}.\n\n\
         ORIGINAL TEXT:\n\"{text}\"\n\n\
         DETECTED ISSUES (ground truth, do not second-guess):\n{issues_formatted}\n\n\
         YOUR TASK:\n\
         1. Create a corrected version by applying ONLY the fixes for the detected issues above\n\
         2. For each fix, provide a brief explanation\n\
         {rewrite_instruction}\n\
         CRITICAL RULES:\n\
         - ONLY fix the issues listed above\n\
         - NEVER invent new errors or make unnecessary changes\n\
         - Preserve the original meaning exactly\n\
         - Maintain the original text structure and formatting\n\
         - Use the suggested corrections when appropriate\n\
         - Respond in valid JSON only\n\n\
         {OUTPUT_FORMAT}\n\n\
         IMPORTANT:\n\
         - The \"corrected_text\" must contain ONLY fixes for the {count} detected issues\n\
         - Explanations should be in {language_name}\n\
         - If no rewrites requested, return an empty array for rewrites\n\
         - Score should reflect how natural and well-written the rewrite is (0-10)",
        count = issues.len(),
    )
}

/// Build the style-review prompt, used when the rule backend found no
/// issues but the model may still find improvements and rewrites.
#[must_use]
pub fn build_style_review_prompt(text: &str, language: &str, tone: Tone) -> String {
    let language_name = language_name(language);
    let tone_description = tone.description();

    format!(
        "You are an expert {language_name} language assistant and editor.\n\n\
         ORIGINAL TEXT:\n\"{text}\"\n\n\
         A grammar checker found no issues in this text. However, you should:\n\n\
         1. CAREFULLY CHECK for any issues the grammar checker might have missed:\n\
         \u{2022} subtle grammar errors, word choice problems, awkward phrasing, contextual errors, style inconsistencies\n\n\
         2. GENERATE 2 rewrite suggestions:\n\
         \u{2022} FIRST rewrite MUST be in \"{}\" tone ({tone_description}) -- this is the user's selected tone\n\
         \u{2022} SECOND rewrite can be in a contrasting tone for comparison\n\
         \u{2022} Each should improve clarity or readability\n\n\
         IMPORTANT RULES:\n\
         - Be thorough but don't invent problems that don't exist\n\
         - If the text is genuinely perfect, say so in corrected_text (keep it identical)\n\
         - Provide helpful explanations for any issues you find\n\
         - Rewrites should preserve the original meaning\n\
         - Respond in valid JSON only\n\n\
         {OUTPUT_FORMAT}\n\n\
         NOTES:\n\
         - If no issues found, \"explanations\" can be an empty array\n\
         - \"rewrites\" should have exactly 2 suggestions (first in the selected tone, second in a contrasting tone)\n\
         - Score (0-10) reflects how natural and improved the rewrite is\n\
         - All explanations and changes_summary should be in {language_name}",
        tone.as_str()
    )
}

const LANGUAGE_SYSTEM_PROMPTS: &[(&str, &str)] = &[
    (
        "nl",
        "You are an expert Dutch language assistant. You understand de/het articles, \
         verb conjugation patterns, word order in main and subordinate clauses, common \
         Dutch spelling mistakes, and formal vs informal Dutch (u vs jij/je).",
    ),
    (
        "en",
        "You are an expert English language assistant. You understand subject-verb \
         agreement, tense consistency, commonly confused words (their/there/they're, \
         its/it's), British vs American English conventions, and formal vs casual register.",
    ),
    (
        "de",
        "You are an expert German language assistant. You understand the German case \
         system, verb placement in main and subordinate clauses, noun gender and article \
         agreement, compound word formation, and formal vs informal address (Sie vs du).",
    ),
    (
        "fr",
        "You are an expert French language assistant. You understand French agreement \
         rules, verb conjugation across tenses, accent placement, liaison and elision \
         rules, and formal vs informal register (vous vs tu).",
    ),
    (
        "es",
        "You are an expert Spanish language assistant. You understand verb conjugation \
         patterns, the ser vs estar distinction, subjunctive mood usage, gender and \
         number agreement, and regional variations.",
    ),
];

/// Language-specific system message supplementing the base JSON-only
/// instruction, interpolated into the chat request's `system` role.
#[must_use]
pub fn system_prompt(language: &str) -> &'static str {
    LANGUAGE_SYSTEM_PROMPTS
        .iter()
        .find(|(code, _)| *code == language)
        .map(|(_, prompt)| *prompt)
        .unwrap_or("You are a multilingual grammar expert.")
}
