//! The closed set of supported languages and correction tones.
//!
//! This table is the single source of truth consulted by the rule backend
//! client (to map an internal code to a provider tag), the prompt builder (to
//! interpolate a display name and a tone description), and the HTTP surface
//! (to reject unsupported language codes before invoking the pipeline).

use serde::{Deserialize, Serialize};

/// One row of the supported-language table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct LanguageInfo {
    /// Internal two-letter code, e.g. `"nl"`.
    pub code: &'static str,
    /// Provider-specific tag, e.g. `"en-US"` for `"en"`.
    pub provider_tag: &'static str,
    /// Display name in English, e.g. `"Dutch"`.
    pub name: &'static str,
    /// Native name, e.g. `"Nederlands"`.
    pub native_name: &'static str,
    /// A couple of example sentences containing common errors, used for
    /// documentation and the `/languages` endpoint.
    pub examples: &'static [&'static str],
}

const LANGUAGES: &[LanguageInfo] = &[
    LanguageInfo {
        code: "nl",
        provider_tag: "nl",
        name: "Dutch",
        native_name: "Nederlands",
        examples: &["Ik heb de boek gelezen.", "Hij loop naar de werk."],
    },
    LanguageInfo {
        code: "en",
        provider_tag: "en-US",
        name: "English",
        native_name: "English",
        examples: &["I has been working here.", "She dont like coffee."],
    },
    LanguageInfo {
        code: "de",
        provider_tag: "de-DE",
        name: "German",
        native_name: "Deutsch",
        examples: &["Ich habe die Buch gelesen.", "Er gehen zur Arbeit."],
    },
    LanguageInfo {
        code: "fr",
        provider_tag: "fr",
        name: "French",
        native_name: "Français",
        examples: &["Je suis aller au marché.", "Il a manger une pomme."],
    },
    LanguageInfo {
        code: "es",
        provider_tag: "es",
        name: "Spanish",
        native_name: "Español",
        examples: &["Yo ha comido ya.", "Ellos va al mercado."],
    },
];

/// Default language used when a request does not specify one.
pub const DEFAULT_LANGUAGE: &str = "nl";

/// Look up a supported language by its internal code.
#[must_use]
pub fn lookup(code: &str) -> Option<&'static LanguageInfo> {
    LANGUAGES.iter().find(|l| l.code == code)
}

/// Returns `true` if `code` is one of the supported languages.
#[must_use]
pub fn is_supported(code: &str) -> bool {
    lookup(code).is_some()
}

/// The full supported-language table, in a stable order.
#[must_use]
pub fn all() -> &'static [LanguageInfo] {
    LANGUAGES
}

/// A correction tone, used to steer the model's rewrite register.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Tone {
    /// Plain, unmarked register; the default.
    Neutral,
    /// Formal, professional register.
    Formal,
    /// Relaxed, conversational register.
    Casual,
    /// Precise, citation-ready academic register.
    Academic,
}

impl Default for Tone {
    fn default() -> Self {
        Self::Neutral
    }
}

impl Tone {
    /// The lowercase wire value, e.g. `"formal"` -- used wherever the tone is
    /// interpolated into a prompt or display string instead of `{:?}`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Formal => "formal",
            Self::Casual => "casual",
            Self::Academic => "academic",
        }
    }

    /// One-line description of the register, interpolated into prompts.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Neutral => "a plain, unmarked register suitable for everyday writing",
            Self::Formal => "a formal, professional register suitable for business correspondence",
            Self::Casual => "a relaxed, conversational register suitable for chatting with friends",
            Self::Academic => "a precise, academic register suitable for scholarly writing",
        }
    }

    /// A tone that contrasts with `self`, used to generate the second
    /// rewrite alongside the user-requested one.
    #[must_use]
    pub fn contrasting(self) -> Self {
        match self {
            Self::Neutral | Self::Formal => Self::Casual,
            Self::Casual | Self::Academic => Self::Formal,
        }
    }
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Tone {
    type Err = ();

    /// Parses a tone, coercing anything unrecognized to [`Tone::Neutral`]
    /// rather than failing -- mirrors how the model decoder treats an
    /// out-of-set tone value in a structured reply.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "formal" => Self::Formal,
            "casual" => Self::Casual,
            "academic" => Self::Academic,
            _ => Self::Neutral,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_languages_supported() {
        for code in ["nl", "en", "de", "fr", "es"] {
            assert!(is_supported(code));
        }
    }

    #[test]
    fn test_unsupported_language() {
        assert!(!is_supported("zz"));
        assert!(lookup("zz").is_none());
    }

    #[test]
    fn test_provider_tag_mapping() {
        assert_eq!(lookup("en").unwrap().provider_tag, "en-US");
        assert_eq!(lookup("nl").unwrap().provider_tag, "nl");
    }

    #[test]
    fn test_tone_coercion_defaults_to_neutral() {
        assert_eq!("bogus".parse::<Tone>().unwrap(), Tone::Neutral);
        assert_eq!("Formal".parse::<Tone>().unwrap(), Tone::Formal);
    }

    #[test]
    fn test_contrasting_tone_differs() {
        for tone in [Tone::Neutral, Tone::Formal, Tone::Casual, Tone::Academic] {
            assert_ne!(tone, tone.contrasting());
        }
    }
}
