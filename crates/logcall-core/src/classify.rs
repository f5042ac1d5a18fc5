//! Verbosity classification of logging method names.

use crate::types::Verbosity;
use crate::vocabulary::{keyword_regex, GENERIC_TOKEN};

/// How a method token maps onto a category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    Known(Verbosity),
    /// `log(...)`: the category must be guessed from the arguments
    Generic,
}

/// Category of a method token, by prefix.
pub fn normalize_token(token: &str) -> TokenClass {
    let token = token.to_lowercase();
    let verbosity = if token.starts_with("debug") {
        Verbosity::Debug
    } else if token.starts_with("info") {
        Verbosity::Info
    } else if token.starts_with("warn") {
        Verbosity::Warning
    } else if token.starts_with("err") || token.starts_with("except") {
        Verbosity::Error
    } else if token.starts_with("fatal") || token.starts_with("crit") {
        Verbosity::Critical
    } else if token.starts_with(GENERIC_TOKEN) {
        return TokenClass::Generic;
    } else {
        Verbosity::Other
    };
    TokenClass::Known(verbosity)
}

/// Guesses a category from the last verbosity keyword found in `content`.
pub fn guess_verbosity(content: &str) -> Verbosity {
    let Some(caps) = keyword_regex().captures(content) else {
        return Verbosity::Other;
    };
    match normalize_token(&caps["logger_verbosity"]) {
        TokenClass::Known(verbosity) => verbosity,
        TokenClass::Generic => Verbosity::Other,
    }
}

/// Classification of a completed call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub verbosity: Verbosity,
    /// Whether the call used the generic `log` method
    pub generic: bool,
}

pub fn classify(method: &str, content: &str) -> Classification {
    match normalize_token(method) {
        TokenClass::Known(verbosity) => Classification {
            verbosity,
            generic: false,
        },
        TokenClass::Generic => Classification {
            verbosity: guess_verbosity(content),
            generic: true,
        },
    }
}
