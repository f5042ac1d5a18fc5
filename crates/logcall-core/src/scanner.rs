//! Line-oriented recognizer for logging calls.
//!
//! A file is scanned as a fold over its lines through [`ScanState::step`]:
//!
//! - `Idle`: a line matching the call-open pattern either completes on the
//!   same line (record emitted) or starts an accumulator.
//! - `Opened`: every line is whitespace-normalized and appended; when the
//!   physical line ends in `)` the whole accumulated text is tried against
//!   the complete-call pattern.
//!
//! An accumulator still open when the lines run out is dropped.

use crate::classify::{classify, Classification};
use crate::error::{Result, ScanError};
use crate::filter::AcceptanceFilter;
use crate::types::{FileContext, LoggerCall};
use crate::vocabulary::{
    call_complete_regex, call_open_regex, closing_paren_regex, normalize_whitespace,
};
use log::{debug, warn};
use regex::Captures;
use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Text of a call spanning several lines, assembled so far
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accumulator {
    pub text: String,
    pub start_line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScanState {
    #[default]
    Idle,
    Opened(Accumulator),
}

/// A call whose parentheses closed, before acceptance filtering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completed {
    pub call: LoggerCall,
    /// Whether the call used the generic `log` method
    pub generic: bool,
}

impl ScanState {
    /// Advances the scanner by one line (0-based `index`).
    pub fn step(
        self,
        ctx: &FileContext,
        index: usize,
        line: &str,
    ) -> (ScanState, Option<Completed>) {
        match self {
            ScanState::Idle => {
                if !call_open_regex().is_match(line) {
                    return (ScanState::Idle, None);
                }
                if let Some(caps) = call_complete_regex().captures(line) {
                    debug!("{} | {}:{} | Full: {}", ctx.repo, ctx.path, index, line.trim());
                    return (ScanState::Idle, Some(shape(ctx, index, &caps)));
                }
                let text = normalize_whitespace(line);
                debug!("{} | {}:{} | Partial: {}", ctx.repo, ctx.path, index, text);
                (
                    ScanState::Opened(Accumulator {
                        text,
                        start_line: index,
                    }),
                    None,
                )
            }
            ScanState::Opened(mut acc) => {
                acc.text.push_str(&normalize_whitespace(line));
                if closing_paren_regex().is_match(line) {
                    if let Some(caps) = call_complete_regex().captures(&acc.text) {
                        debug!("{} | {}:{} | Final: {}", ctx.repo, ctx.path, index, acc.text);
                        let completed = shape(ctx, acc.start_line, &caps);
                        return (ScanState::Idle, Some(completed));
                    }
                }
                debug!("{} | {}:{} | Partial: {}", ctx.repo, ctx.path, index, acc.text);
                (ScanState::Opened(acc), None)
            }
        }
    }
}

/// Builds the record for a completed call match.
fn shape(ctx: &FileContext, start_line: usize, caps: &Captures<'_>) -> Completed {
    let logger_object = caps["logger_object"].to_string();
    let method = caps["logger_verbosity"].to_lowercase();
    let full_content = strip_parens(&caps["logger_content"]).to_string();
    let Classification { verbosity, generic } = classify(&method, &full_content);

    Completed {
        call: LoggerCall {
            repo: ctx.repo.clone(),
            path: ctx.path.clone(),
            line: start_line,
            logger_object,
            method,
            verbosity,
            level: verbosity.level(),
            len: full_content.chars().count(),
            full_content,
        },
        generic,
    }
}

/// Removes one layer of enclosing parentheses and the whitespace after `(`.
pub fn strip_parens(content: &str) -> &str {
    content
        .strip_prefix('(')
        .and_then(|inner| inner.strip_suffix(')'))
        .unwrap_or(content)
        .trim_start()
}

// =============================================================================
// Per-file scan
// =============================================================================

/// Outcome of scanning one file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileScan {
    /// Accepted calls, in line order
    pub records: Vec<LoggerCall>,
    /// Completed calls using the generic `log` method, accepted or not
    pub generic_log_calls: usize,
    /// Completed calls dropped by the acceptance filter
    pub rejected: usize,
    /// A call was still open when the file ended
    pub unterminated: bool,
    /// Reading stopped early because a line was not valid text
    pub decode_error: Option<String>,
}

/// Feeds lines one at a time, collecting accepted records.
pub struct FileScanner<'a> {
    ctx: &'a FileContext,
    filter: &'a AcceptanceFilter,
    state: ScanState,
    index: usize,
    scan: FileScan,
}

impl<'a> FileScanner<'a> {
    pub fn new(ctx: &'a FileContext, filter: &'a AcceptanceFilter) -> Self {
        Self {
            ctx,
            filter,
            state: ScanState::Idle,
            index: 0,
            scan: FileScan::default(),
        }
    }

    pub fn feed(&mut self, line: &str) {
        let state = std::mem::take(&mut self.state);
        let (next, completed) = state.step(self.ctx, self.index, line);
        self.state = next;
        self.index += 1;

        if let Some(Completed { call, generic }) = completed {
            if generic {
                self.scan.generic_log_calls += 1;
            }
            if self.filter.accepts(&call) {
                self.scan.records.push(call);
            } else {
                self.scan.rejected += 1;
            }
        }
    }

    pub fn finish(mut self) -> FileScan {
        if let ScanState::Opened(acc) = &self.state {
            debug!(
                "{} | {}:{} | Unterminated call dropped: {}",
                self.ctx.repo, self.ctx.path, acc.start_line, acc.text
            );
            self.scan.unterminated = true;
        }
        debug!(
            "{} | {} | logger calls: {}",
            self.ctx.repo,
            self.ctx.path,
            self.scan.records.len()
        );
        self.scan
    }
}

/// Scans lines already in memory.
pub fn scan_lines<I, S>(ctx: &FileContext, filter: &AcceptanceFilter, lines: I) -> FileScan
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut scanner = FileScanner::new(ctx, filter);
    for line in lines {
        scanner.feed(line.as_ref());
    }
    scanner.finish()
}

/// Text lines of a reader, ended by `\n`, `\r\n` or a lone `\r`.
///
/// Each line is decoded on its own; an invalid one yields `InvalidData`.
pub struct SourceLines<R> {
    reader: R,
    buf: Vec<u8>,
    pending: VecDeque<Vec<u8>>,
}

impl<R: BufRead> SourceLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            pending: VecDeque::new(),
        }
    }
}

impl<R: BufRead> Iterator for SourceLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(bytes) = self.pending.pop_front() {
                return Some(
                    String::from_utf8(bytes)
                        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e)),
                );
            }
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {
                    let mut chunk: &[u8] = &self.buf;
                    if let Some(rest) = chunk.strip_suffix(b"\n") {
                        chunk = rest;
                    }
                    if let Some(rest) = chunk.strip_suffix(b"\r") {
                        chunk = rest;
                    }
                    // `\r` never occurs inside a multi-byte UTF-8 sequence.
                    self.pending.extend(chunk.split(|&b| b == b'\r').map(<[u8]>::to_vec));
                }
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Scans a reader line by line. A line that cannot be decoded ends the scan,
/// keeping the records found before it.
pub fn scan_reader<R: BufRead>(
    ctx: &FileContext,
    filter: &AcceptanceFilter,
    reader: R,
) -> FileScan {
    let mut scanner = FileScanner::new(ctx, filter);
    let mut decode_error = None;
    for line in SourceLines::new(reader) {
        match line {
            Ok(line) => scanner.feed(&line),
            Err(e) => {
                warn!("{} | {} | Decode error: {}", ctx.repo, ctx.path, e);
                decode_error = Some(e.to_string());
                break;
            }
        }
    }
    let mut scan = scanner.finish();
    scan.decode_error = decode_error;
    scan
}

/// Opens and scans one source file.
pub fn scan_file(path: &Path, ctx: &FileContext, filter: &AcceptanceFilter) -> Result<FileScan> {
    let file = File::open(path).map_err(|e| ScanError::io(path, e))?;
    Ok(scan_reader(ctx, filter, BufReader::new(file)))
}
