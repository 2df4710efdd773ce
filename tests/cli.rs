//! Argument-parsing tests for the `gramcheckd` CLI.
//!
//! These exercise `clap` parsing only -- no subcommand is actually executed,
//! since `check`, `ping`, and `serve` all require reachable backends.

use gramcheck::cli::build_cli;

#[test]
fn test_no_subcommand_fails() {
    let result = build_cli().try_get_matches_from(["gramcheckd"]);
    assert!(result.is_err());
}

#[test]
fn test_check_with_text_parses() {
    let result = build_cli().try_get_matches_from(["gramcheckd", "check", "--text", "hello"]);
    assert!(result.is_ok());
}

#[test]
fn test_check_with_language_and_mode_parses() {
    let result = build_cli().try_get_matches_from([
        "gramcheckd",
        "check",
        "--text",
        "hello",
        "--language",
        "en",
        "--mode",
        "style",
    ]);
    assert!(result.is_ok());
}

#[test]
fn test_check_with_invalid_mode_fails() {
    let result = build_cli().try_get_matches_from([
        "gramcheckd",
        "check",
        "--text",
        "hello",
        "--mode",
        "picky",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_languages_subcommand_parses() {
    let result = build_cli().try_get_matches_from(["gramcheckd", "languages"]);
    assert!(result.is_ok());
}

#[test]
fn test_languages_alias_lang_parses() {
    let result = build_cli().try_get_matches_from(["gramcheckd", "lang"]);
    assert!(result.is_ok());
}

#[test]
fn test_ping_subcommand_parses() {
    let result = build_cli().try_get_matches_from(["gramcheckd", "ping"]);
    assert!(result.is_ok());
}

#[test]
fn test_serve_with_bind_address_parses() {
    let result =
        build_cli().try_get_matches_from(["gramcheckd", "serve", "--bind", "127.0.0.1:9000"]);
    assert!(result.is_ok());
}

#[test]
fn test_unknown_subcommand_fails() {
    let result = build_cli().try_get_matches_from(["gramcheckd", "frobnicate"]);
    assert!(result.is_err());
}
