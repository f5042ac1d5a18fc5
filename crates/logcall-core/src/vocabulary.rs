//! Verbosity vocabulary and the regexes built from it.
//!
//! The open detector, the complete-call matcher and the keyword guesser all
//! derive their alternation from [`VERBOSITY_TOKENS`], so adding a token here
//! updates every site at once.

use regex::Regex;
use std::sync::OnceLock;

/// Logging method names recognized after `<receiver>.`, as regex fragments.
/// Matched case-insensitively.
pub const VERBOSITY_TOKENS: &[&str] = &[
    "fatal",
    "crit(?:ical)?",
    "except(?:ion)?",
    "err(?:or)?",
    "warn(?:ing)?",
    "info",
    "debug",
    "log",
];

/// Generic method whose category has to be guessed from its arguments.
pub const GENERIC_TOKEN: &str = "log";

/// Alternation over the vocabulary, optionally without the generic token.
fn alternation(include_generic: bool) -> String {
    VERBOSITY_TOKENS
        .iter()
        .filter(|token| include_generic || **token != GENERIC_TOKEN)
        .copied()
        .collect::<Vec<_>>()
        .join("|")
}

/// `[indent][a.b.]receiver.verbosity` — the head shared by both call patterns.
fn call_head() -> String {
    format!(
        r"^\s*(?:\w+\.)*(?P<logger_object>\w+)\.(?P<logger_verbosity>(?i:{}))",
        alternation(true)
    )
}

/// Matches a line that opens a logging call: `receiver.verbosity(`.
pub fn call_open_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(&format!(r"{}\(", call_head())).expect("call-open regex"))
}

/// Matches a whole call whose parentheses close at the end of the text.
pub fn call_complete_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(r"{}(?P<logger_content>\(.*\))\s*$", call_head()))
            .expect("complete-call regex")
    })
}

/// Finds the last verbosity keyword (generic token excluded) anywhere in a text.
pub fn keyword_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"(?i).*(?P<logger_verbosity>{})",
            alternation(false)
        ))
        .expect("verbosity keyword regex")
    })
}

/// A physical line whose last non-blank character is `)`.
pub fn closing_paren_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\)\s*$").expect("closing-paren regex"))
}

fn whitespace_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("whitespace regex"))
}

/// Strips a trailing newline and collapses every whitespace run to one space.
pub fn normalize_whitespace(line: &str) -> String {
    let line = line.strip_suffix('\n').unwrap_or(line);
    whitespace_regex().replace_all(line, " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================================================
    // Open detector
    // ==========================================================================

    #[test]
    fn test_open_matches_every_token() {
        for method in [
            "fatal", "crit", "critical", "except", "exception", "err", "error", "warn",
            "warning", "info", "debug", "log",
        ] {
            let line = format!("    logger.{}(", method);
            assert!(call_open_regex().is_match(&line), "{}", line);
        }
    }

    #[test]
    fn test_open_token_is_case_insensitive() {
        let caps = call_open_regex().captures("LOG.Warning(msg").unwrap();
        assert_eq!(&caps["logger_object"], "LOG");
        assert_eq!(&caps["logger_verbosity"], "Warning");
    }

    #[test]
    fn test_open_takes_last_dotted_segment_as_receiver() {
        let caps = call_open_regex()
            .captures("        self.app.logger.debug(\"x\")")
            .unwrap();
        assert_eq!(&caps["logger_object"], "logger");
        assert_eq!(&caps["logger_verbosity"], "debug");
    }

    #[test]
    fn test_open_rejects_non_calls() {
        assert!(!call_open_regex().is_match("logger.info = 3"));
        assert!(!call_open_regex().is_match("x = logger.info(\"a\")"));
        assert!(!call_open_regex().is_match("logger.information(\"a\")"));
        assert!(!call_open_regex().is_match("info(\"a\")"));
    }

    // ==========================================================================
    // Complete matcher
    // ==========================================================================

    #[test]
    fn test_complete_captures_content_with_parens() {
        let caps = call_complete_regex()
            .captures("log.error(\"failed: %s\", err)   ")
            .unwrap();
        assert_eq!(&caps["logger_content"], "(\"failed: %s\", err)");
    }

    #[test]
    fn test_complete_requires_closing_paren_at_end() {
        assert!(!call_complete_regex().is_match("log.error(\"failed: %s\","));
        assert!(!call_complete_regex().is_match("log.error(\"x\") if y else z"));
    }

    // ==========================================================================
    // Keyword guesser
    // ==========================================================================

    #[test]
    fn test_keyword_finds_last_occurrence() {
        let caps = keyword_regex()
            .captures("\"info about a warning\"")
            .unwrap();
        assert_eq!(&caps["logger_verbosity"], "warning");
    }

    #[test]
    fn test_keyword_ignores_generic_token() {
        assert!(keyword_regex().captures("\"a log line\"").is_none());
    }

    // ==========================================================================
    // Whitespace normalization
    // ==========================================================================

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("    \"a\",\t  b)\n"), " \"a\", b)");
        assert_eq!(normalize_whitespace("x"), "x");
    }
}
