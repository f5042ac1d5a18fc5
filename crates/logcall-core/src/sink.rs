//! Append-only CSV output of logger-call records.

use crate::error::{Result, ScanError};
use crate::types::{LoggerCall, COLUMNS};
use csv::WriterBuilder;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

/// CSV writer over any output; the header is written once, on creation.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
    rows: usize,
}

impl CsvSink<File> {
    /// Truncates `path` and writes the header row.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path).map_err(|e| ScanError::io(path, e))?;
        Self::with_header(file)
    }

    /// Opens `path` for appending; writes the header only if the file is new or empty.
    pub fn append(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| ScanError::io(path, e))?;
        let empty = file.metadata().map_err(|e| ScanError::io(path, e))?.len() == 0;
        if empty {
            Self::with_header(file)
        } else {
            Ok(Self::without_header(file))
        }
    }
}

impl<W: Write> CsvSink<W> {
    pub fn with_header(out: W) -> Result<Self> {
        let mut sink = Self::without_header(out);
        sink.writer.write_record(COLUMNS)?;
        Ok(sink)
    }

    pub fn without_header(out: W) -> Self {
        Self {
            writer: WriterBuilder::new().has_headers(false).from_writer(out),
            rows: 0,
        }
    }

    pub fn write_all(&mut self, calls: &[LoggerCall]) -> Result<()> {
        for call in calls {
            self.writer.serialize(call)?;
            self.rows += 1;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| ScanError::Csv(csv::Error::from(e)))
    }

    /// Rows written through this sink
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| {
                let err = std::io::Error::new(e.error().kind(), e.to_string());
                ScanError::Csv(csv::Error::from(err))
            })
    }
}

#[derive(Deserialize)]
struct RepoColumn {
    repo: String,
}

/// Repositories that already have rows in an existing output file.
///
/// A missing file means nothing has been done yet.
pub fn completed_repos(path: &Path) -> Result<BTreeSet<String>> {
    if !path.exists() {
        return Ok(BTreeSet::new());
    }
    let mut reader = csv::Reader::from_path(path)?;
    let mut repos = BTreeSet::new();
    for row in reader.deserialize() {
        let row: RepoColumn = row?;
        repos.insert(row.repo);
    }
    Ok(repos)
}
