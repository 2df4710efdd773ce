//! Error and Result structure used all across this crate.

/// Kinds of failure a backend call can produce.
#[derive(Debug, thiserror::Error)]
pub enum BackendErrorKind {
    /// The request did not complete before its configured timeout elapsed.
    #[error("timed out")]
    Timeout,
    /// The backend responded, but with a malformed or unexpected payload.
    #[error("protocol error: {0}")]
    Protocol(String),
    /// The backend could not be reached at all (connection refused, DNS, TLS).
    #[error("unavailable: {0}")]
    Unavailable(String),
    /// The model replied but its structured output could not be decoded.
    #[error("could not decode model output")]
    Undecodable,
}

/// Enumeration of all possible error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error talking to the rule-based grammar backend.
    #[error("rule backend error: {0}")]
    RuleBackend(#[source] BackendErrorKind),

    /// Error talking to the generative model backend.
    #[error("model backend error: {0}")]
    ModelBackend(#[source] BackendErrorKind),

    /// The validator's re-check of a candidate text could not be completed.
    #[error("validation inconclusive: {0}")]
    ValidationInconclusive(String),

    /// Error from the command line parsing (see [`clap::Error`]).
    #[cfg(feature = "cli")]
    #[error(transparent)]
    Cli(#[from] clap::Error),

    /// Error specifying an invalid request (empty text, unsupported language,
    /// text longer than the configured maximum).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Error specifying an invalid configuration value.
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// Error from reading and writing to IO (see [`std::io::Error`]).
    #[error(transparent)]
    IO(#[from] std::io::Error),

    /// Error from parsing JSON (see [`serde_json::Error`]).
    #[error(transparent)]
    JSON(#[from] serde_json::Error),

    /// Any other error from requests (see [`reqwest::Error`]).
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    /// Error from reading environ variable (see [`std::env::VarError`]).
    #[error(transparent)]
    VarError(#[from] std::env::VarError),

    /// Error while setting up or using the end-to-end encryption envelope.
    #[cfg(feature = "encryption")]
    #[error("encryption error: {0}")]
    Encryption(String),
}

impl Error {
    /// Build a [`Error::RuleBackend`] with [`BackendErrorKind::Timeout`].
    #[must_use]
    pub fn rule_timeout() -> Self {
        Self::RuleBackend(BackendErrorKind::Timeout)
    }

    /// Build a [`Error::RuleBackend`] with [`BackendErrorKind::Unavailable`].
    #[must_use]
    pub fn rule_unavailable(reason: impl Into<String>) -> Self {
        Self::RuleBackend(BackendErrorKind::Unavailable(reason.into()))
    }

    /// Build a [`Error::RuleBackend`] with [`BackendErrorKind::Protocol`].
    #[must_use]
    pub fn rule_protocol(reason: impl Into<String>) -> Self {
        Self::RuleBackend(BackendErrorKind::Protocol(reason.into()))
    }

    /// Build a [`Error::ModelBackend`] with [`BackendErrorKind::Timeout`].
    #[must_use]
    pub fn model_timeout() -> Self {
        Self::ModelBackend(BackendErrorKind::Timeout)
    }

    /// Build a [`Error::ModelBackend`] with [`BackendErrorKind::Unavailable`].
    #[must_use]
    pub fn model_unavailable(reason: impl Into<String>) -> Self {
        Self::ModelBackend(BackendErrorKind::Unavailable(reason.into()))
    }

    /// Build a [`Error::ModelBackend`] with [`BackendErrorKind::Protocol`].
    #[must_use]
    pub fn model_protocol(reason: impl Into<String>) -> Self {
        Self::ModelBackend(BackendErrorKind::Protocol(reason.into()))
    }

    /// Build a [`Error::ModelBackend`] with [`BackendErrorKind::Undecodable`].
    #[must_use]
    pub fn model_undecodable() -> Self {
        Self::ModelBackend(BackendErrorKind::Undecodable)
    }

    /// Returns `true` if this error originates from the rule backend.
    #[must_use]
    pub fn is_rule_backend(&self) -> bool {
        matches!(self, Self::RuleBackend(_))
    }

    /// Returns `true` if this error originates from the model backend.
    #[must_use]
    pub fn is_model_backend(&self) -> bool {
        matches!(self, Self::ModelBackend(_))
    }
}

/// Result type alias with error type defined above (see [`Error`]).
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn test_error_json() {
        let result = serde_json::from_str::<serde_json::Value>("invalid JSON");
        assert!(result.is_err());

        let error: Error = result.unwrap_err().into();

        assert_matches!(error, Error::JSON(_));
    }

    #[test]
    fn test_error_io() {
        let result = std::fs::read_to_string("/does/not/exist");
        assert!(result.is_err());

        let error: Error = result.unwrap_err().into();

        assert_matches!(error, Error::IO(_));
    }

    #[test]
    fn test_rule_backend_constructors() {
        assert!(Error::rule_timeout().is_rule_backend());
        assert!(Error::rule_unavailable("connection refused").is_rule_backend());
        assert!(!Error::model_timeout().is_rule_backend());
    }

    #[test]
    fn test_model_backend_constructors() {
        assert!(Error::model_timeout().is_model_backend());
        assert!(Error::model_undecodable().is_model_backend());
        assert!(!Error::rule_timeout().is_model_backend());
    }
}
