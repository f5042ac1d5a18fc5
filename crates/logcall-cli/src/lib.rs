//! # logcall-cli
//!
//! Reports over the CSV files produced by `logger_finder`.
//!
//! See the individual binaries for usage information.

use csv::Reader;
use logcall_core::{LoggerCall, Verbosity};
use std::collections::{BTreeMap, HashMap};
use std::error::Error;
use std::io::Read;
use std::path::Path;

/// Distribution of logging calls in an export
#[derive(Debug, Default)]
pub struct CallSummary {
    pub total: usize,
    pub by_verbosity: BTreeMap<Verbosity, usize>,
    pub by_repo: BTreeMap<String, usize>,
    pub by_receiver: HashMap<String, usize>,
    /// Rows whose method was the generic `log`
    pub generic: usize,
}

impl CallSummary {
    pub fn from_csv(path: &Path) -> Result<Self, Box<dyn Error>> {
        let reader = Reader::from_path(path)?;
        Self::from_csv_reader(reader)
    }

    pub fn from_reader<R: Read>(input: R) -> Result<Self, Box<dyn Error>> {
        Self::from_csv_reader(Reader::from_reader(input))
    }

    fn from_csv_reader<R: Read>(mut reader: Reader<R>) -> Result<Self, Box<dyn Error>> {
        let mut summary = CallSummary::default();
        for row in reader.deserialize() {
            let call: LoggerCall = row?;
            summary.add(&call);
        }
        Ok(summary)
    }

    pub fn add(&mut self, call: &LoggerCall) {
        self.total += 1;
        *self.by_verbosity.entry(call.verbosity).or_insert(0) += 1;
        *self.by_repo.entry(call.repo.clone()).or_insert(0) += 1;
        *self.by_receiver.entry(call.logger_object.clone()).or_insert(0) += 1;
        if call.method == "log" {
            self.generic += 1;
        }
    }

    /// Share of all rows in a category, in percent
    pub fn percentage(&self, verbosity: Verbosity) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let count = self.by_verbosity.get(&verbosity).copied().unwrap_or(0);
        count as f64 / self.total as f64 * 100.0
    }

    /// The `n` most frequent receivers, ties broken by name
    pub fn top_receivers(&self, n: usize) -> Vec<(&str, usize)> {
        let mut receivers: Vec<(&str, usize)> = self
            .by_receiver
            .iter()
            .map(|(name, count)| (name.as_str(), *count))
            .collect();
        receivers.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        receivers.truncate(n);
        receivers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = "\
repo,path,line,logger_object,method,verbosity,level,full_content,len
a/one,a/one/x.py,1,log,info,INFO,20,\"\"\"hi\"\"\",4
a/one,a/one/x.py,9,log,warning,WARNING,30,\"\"\"careful\"\"\",9
a/one,a/one/y.py,2,logger,log,OTHER,99,\"lvl, msg\",8
b/two,b/two/z.py,0,logger,error,ERROR,40,\"\"\"bad\"\"\",5
";

    #[test]
    fn test_summary_counts() {
        let summary = CallSummary::from_reader(EXPORT.as_bytes()).unwrap();
        assert_eq!(summary.total, 4);
        assert_eq!(summary.generic, 1);
        assert_eq!(summary.by_repo["a/one"], 3);
        assert_eq!(summary.by_repo["b/two"], 1);
        assert_eq!(summary.by_verbosity[&Verbosity::Warning], 1);
        assert_eq!(summary.percentage(Verbosity::Info), 25.0);
        assert_eq!(summary.percentage(Verbosity::Critical), 0.0);
    }

    #[test]
    fn test_top_receivers() {
        let summary = CallSummary::from_reader(EXPORT.as_bytes()).unwrap();
        assert_eq!(summary.top_receivers(1), vec![("log", 2)]);
        assert_eq!(summary.top_receivers(5), vec![("log", 2), ("logger", 2)]);
    }

    #[test]
    fn test_empty_export() {
        let summary = CallSummary::from_reader(&b"repo,path,line,logger_object,method,verbosity,level,full_content,len\n"[..]).unwrap();
        assert_eq!(summary.total, 0);
        assert_eq!(summary.percentage(Verbosity::Info), 0.0);
    }
}
