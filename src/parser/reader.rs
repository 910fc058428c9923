//! Sequential reading of DRC trace files.

use crate::parser::event::{tokenize_line, TrafficEvent};
use crate::utils::error::ParseError;
use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Streaming reader over one DRC trace file.
///
/// Owns the open file handle and yields one decoded event per line until
/// a line without a timestamp token is reached (normal end of input).
pub struct TraceReader {
    reader: BufReader<File>,
    line: String,
}

impl TraceReader {
    /// Open a trace file for reading
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ParseError> {
        let path = path.as_ref();
        debug!("Opening trace file: {}", path.display());

        let file = File::open(path)?;
        Ok(Self {
            reader: BufReader::new(file),
            line: String::new(),
        })
    }

    /// Yield the next decoded event, or `None` once the input is exhausted.
    ///
    /// # Errors
    /// Any `ParseError` from the tokenizer; the file is not usable afterwards.
    pub fn next_event(&mut self) -> Result<Option<TrafficEvent>, ParseError> {
        self.line.clear();
        if self.reader.read_line(&mut self.line)? == 0 {
            return Ok(None);
        }
        tokenize_line(&self.line)
    }
}
