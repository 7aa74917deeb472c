use serde_json::Value;

use crate::events::StreamRecord;

/// Record marker the backend puts in front of every JSON payload line.
pub const DEFAULT_RECORD_PREFIX: &str = "data:";

/// Incremental parser for newline-delimited record streams.
///
/// Bytes are buffered undecoded until a full line is available, so UTF-8 code
/// points split across chunk boundaries decode correctly.
#[derive(Debug)]
pub struct RecordLineParser {
    buffer: Vec<u8>,
    prefix: String,
    dropped: usize,
}

impl Default for RecordLineParser {
    fn default() -> Self {
        Self::new(DEFAULT_RECORD_PREFIX)
    }
}

impl RecordLineParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            buffer: Vec::new(),
            prefix: prefix.into(),
            dropped: 0,
        }
    }

    /// Feed arbitrary bytes into the parser and drain complete records.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<StreamRecord> {
        self.buffer.extend_from_slice(bytes);
        let mut records = Vec::new();

        while let Some(newline) = self.buffer.iter().position(|byte| *byte == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline).collect();
            if let Some(record) = self.parse_line(&line[..newline]) {
                records.push(record);
            }
        }

        records
    }

    /// Drain a final line that arrived without a trailing newline.
    pub fn finish(&mut self) -> Option<StreamRecord> {
        if self.buffer.is_empty() {
            return None;
        }
        let line = std::mem::take(&mut self.buffer);
        self.parse_line(&line)
    }

    /// Parse a complete body in one shot.
    pub fn parse_body(input: &str) -> Vec<StreamRecord> {
        let mut parser = Self::default();
        let mut records = parser.feed(input.as_bytes());
        records.extend(parser.finish());
        records
    }

    pub fn is_empty_buffer(&self) -> bool {
        self.buffer.iter().all(u8::is_ascii_whitespace)
    }

    /// Count of prefixed lines dropped as malformed or unknown.
    pub fn dropped_records(&self) -> usize {
        self.dropped
    }

    fn parse_line(&mut self, raw: &[u8]) -> Option<StreamRecord> {
        let line = String::from_utf8_lossy(raw);
        let line = line.strip_suffix('\r').unwrap_or(&line);
        let payload = line.strip_prefix(self.prefix.as_str())?;
        let payload = payload.strip_prefix(' ').unwrap_or(payload).trim_end();
        if payload.is_empty() {
            return None;
        }

        let value = match serde_json::from_str::<Value>(payload) {
            Ok(value) => value,
            Err(error) => {
                self.dropped += 1;
                tracing::warn!(%error, payload, "dropping malformed stream record");
                return None;
            }
        };

        match StreamRecord::from_value(&value) {
            Some(record) => Some(record),
            None => {
                self.dropped += 1;
                tracing::warn!(payload, "dropping stream record with unknown type");
                None
            }
        }
    }
}
