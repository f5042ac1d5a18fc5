//! False-positive filter applied to completed calls.

use crate::config::ScanConfig;
use crate::types::LoggerCall;
use std::collections::HashSet;

/// Rejects calls on known non-logger receivers and calls with near-empty arguments
#[derive(Debug, Clone)]
pub struct AcceptanceFilter {
    denylist: HashSet<String>,
    min_content_len: usize,
}

impl AcceptanceFilter {
    pub fn new<I, S>(denylist: I, min_content_len: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            denylist: denylist.into_iter().map(Into::into).collect(),
            min_content_len,
        }
    }

    pub fn from_config(config: &ScanConfig) -> Self {
        Self::new(config.denylist.iter().cloned(), config.min_content_len)
    }

    pub fn accepts(&self, call: &LoggerCall) -> bool {
        !self.denylist.contains(&call.logger_object)
            && significant_len(&call.full_content) >= self.min_content_len
    }
}

impl Default for AcceptanceFilter {
    fn default() -> Self {
        Self::from_config(&ScanConfig::default())
    }
}

/// Character count of the argument text, with a bare `""`/`''` counting as empty.
pub fn significant_len(content: &str) -> usize {
    match content.trim() {
        "\"\"" | "''" => 0,
        _ => content.chars().count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Verbosity;

    fn call(receiver: &str, content: &str) -> LoggerCall {
        LoggerCall {
            repo: "r/r".to_string(),
            path: "r/r/a.py".to_string(),
            line: 0,
            logger_object: receiver.to_string(),
            method: "info".to_string(),
            verbosity: Verbosity::Info,
            level: 20,
            full_content: content.to_string(),
            len: content.chars().count(),
        }
    }

    #[test]
    fn test_default_denylist() {
        let filter = AcceptanceFilter::default();
        assert!(!filter.accepts(&call("console", "\"a long message\"")));
        assert!(!filter.accepts(&call("math", "x")));
        assert!(!filter.accepts(&call("np", "arr, 2")));
        assert!(filter.accepts(&call("logger", "\"x\"")));
    }

    #[test]
    fn test_near_empty_content_rejected() {
        let filter = AcceptanceFilter::default();
        assert!(!filter.accepts(&call("logger", "")));
        assert!(!filter.accepts(&call("logger", "x")));
        assert!(!filter.accepts(&call("logger", "\"\"")));
        assert!(!filter.accepts(&call("logger", "'' ")));
        assert!(filter.accepts(&call("logger", "ex")));
    }

    #[test]
    fn test_trailing_whitespace_counts() {
        let filter = AcceptanceFilter::default();
        assert_eq!(significant_len("x "), 2);
        assert!(filter.accepts(&call("logger", "x ")));
        assert_eq!(significant_len("\"\" "), 0);
    }

    #[test]
    fn test_custom_denylist() {
        let filter = AcceptanceFilter::new(["self"], 2);
        assert!(!filter.accepts(&call("self", "\"x\"")));
        assert!(filter.accepts(&call("console", "\"x\"")));
    }
}
