//! Record types emitted by the scanner.
//!
//! - [`Verbosity`]: normalized severity category and its numeric level
//! - [`LoggerCall`]: one recognized logging call site (one CSV row)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Output CSV columns, in serialization order of [`LoggerCall`].
pub const COLUMNS: [&str; 9] = [
    "repo",
    "path",
    "line",
    "logger_object",
    "method",
    "verbosity",
    "level",
    "full_content",
    "len",
];

// =============================================================================
// Verbosity
// =============================================================================

/// Normalized severity category of a logging call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verbosity {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
    Other,
}

impl Verbosity {
    pub const ALL: [Verbosity; 6] = [
        Verbosity::Debug,
        Verbosity::Info,
        Verbosity::Warning,
        Verbosity::Error,
        Verbosity::Critical,
        Verbosity::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Verbosity::Debug => "DEBUG",
            Verbosity::Info => "INFO",
            Verbosity::Warning => "WARNING",
            Verbosity::Error => "ERROR",
            Verbosity::Critical => "CRITICAL",
            Verbosity::Other => "OTHER",
        }
    }

    /// Numeric severity, following Python's `logging` levels
    pub fn level(&self) -> u8 {
        match self {
            Verbosity::Debug => 10,
            Verbosity::Info => 20,
            Verbosity::Warning => 30,
            Verbosity::Error => 40,
            Verbosity::Critical => 50,
            Verbosity::Other => 99,
        }
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// LoggerCall
// =============================================================================

/// A recognized logging call site.
///
/// Field order is the CSV column order (see [`COLUMNS`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoggerCall {
    /// Repository identifier (`owner/name`)
    pub repo: String,
    /// `<repo>/<path inside the repository>`
    pub path: String,
    /// 0-based line where the call opens
    pub line: usize,
    /// Receiver the method is invoked on
    pub logger_object: String,
    /// Lowercased method name as written in the source
    pub method: String,
    pub verbosity: Verbosity,
    pub level: u8,
    /// Argument text with one layer of parentheses stripped
    pub full_content: String,
    /// Character count of `full_content`
    pub len: usize,
}

/// Where a scanned file belongs: repository id and the path reported in records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContext {
    pub repo: String,
    pub path: String,
}

impl FileContext {
    pub fn new(repo: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            repo: repo.into(),
            path: path.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        let levels: Vec<u8> = Verbosity::ALL.iter().map(|v| v.level()).collect();
        assert_eq!(levels, vec![10, 20, 30, 40, 50, 99]);
    }

    #[test]
    fn test_verbosity_serializes_uppercase() {
        let json = serde_json::to_string(&Verbosity::Warning).unwrap();
        assert_eq!(json, "\"WARNING\"");
        let parsed: Verbosity = serde_json::from_str("\"CRITICAL\"").unwrap();
        assert_eq!(parsed, Verbosity::Critical);
    }

    #[test]
    fn test_logger_call_csv_row_follows_columns() {
        let call = LoggerCall {
            repo: "octo/demo".to_string(),
            path: "octo/demo/app.py".to_string(),
            line: 3,
            logger_object: "log".to_string(),
            method: "info".to_string(),
            verbosity: Verbosity::Info,
            level: 20,
            full_content: "\"a, b\"".to_string(),
            len: 6,
        };

        let mut writer = csv::Writer::from_writer(vec![]);
        writer.serialize(&call).unwrap();
        let out = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        let mut lines = out.lines();

        assert_eq!(lines.next().unwrap(), COLUMNS.join(","));
        assert_eq!(
            lines.next().unwrap(),
            "octo/demo,octo/demo/app.py,3,log,info,INFO,20,\"\"\"a, b\"\"\",6"
        );
    }
}
