//! Session Journal Parser
//!
//! Decodes one journal file into normalized [`UsageEntry`] values. Journals are JSONL: one
//! record per line, most of which (user turns, tool results, summaries) carry no usage.
//!
//! ## Filtering Rules
//!
//! A line becomes an entry only when all of the following hold:
//!
//! 1. It decodes as a [`JournalRecord`]
//! 2. Its `type` is exactly `"assistant"`
//! 3. It has a timestamp and a `message.usage` object
//! 4. The timestamp parses as RFC 3339 and is not before the requested floor
//!
//! A missing model becomes `"unknown"`, missing counters become zero. Everything that
//! fails is skipped without error, and a file that cannot be opened yields no entries.
//!
//! ## Record Size
//!
//! A single record may be at most [`MAX_RECORD_BYTES`]. Longer records are skipped and
//! reading resumes at the next line.

use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use tracing::{debug, trace};

use crate::models::{JournalRecord, UsageEntry};
use crate::timestamp_parser::TimestampParser;

pub const MAX_RECORD_BYTES: usize = 10 * 1024 * 1024;

/// Entry type that carries token usage.
pub const ASSISTANT_ENTRY_TYPE: &str = "assistant";

/// Model name used when a record does not say which model answered.
pub const UNKNOWN_MODEL: &str = "unknown";

enum RecordRead {
    Line,
    Oversized,
    Eof,
}

pub struct JournalParser;

impl JournalParser {
    pub fn parse_file(path: &Path, since: DateTime<Utc>) -> Vec<UsageEntry> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Skipping unreadable journal");
                return Vec::new();
            }
        };

        let mut reader = BufReader::new(file);
        let mut entries = Vec::new();
        let mut buf = Vec::new();
        let mut line_count = 0usize;

        loop {
            buf.clear();
            match Self::read_record(&mut reader, &mut buf) {
                Ok(RecordRead::Eof) => break,
                Ok(RecordRead::Oversized) => {
                    line_count += 1;
                    debug!(path = %path.display(), line = line_count, "Skipping oversized record");
                    continue;
                }
                Ok(RecordRead::Line) => line_count += 1,
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "Stopped reading journal");
                    break;
                }
            }

            let Ok(line) = std::str::from_utf8(&buf) else {
                trace!(path = %path.display(), line = line_count, "Skipping non UTF-8 record");
                continue;
            };

            if let Some(entry) = Self::parse_line(line, since) {
                entries.push(entry);
            }
        }

        trace!(
            path = %path.display(),
            lines = line_count,
            entries = entries.len(),
            "Parsed journal"
        );
        entries
    }

    /// Decode a single journal line. Returns `None` for anything that is not a usable
    /// assistant turn at or after `since`.
    pub fn parse_line(line: &str, since: DateTime<Utc>) -> Option<UsageEntry> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let record: JournalRecord = match serde_json::from_str(line) {
            Ok(record) => record,
            Err(e) => {
                trace!(error = %e, "Skipping malformed record");
                return None;
            }
        };

        if record.entry_type != ASSISTANT_ENTRY_TYPE {
            return None;
        }

        let message = record.message?;
        let usage = message.usage?;
        let timestamp = TimestampParser::parse(&record.timestamp?).ok()?;

        if timestamp < since {
            return None;
        }

        Some(UsageEntry {
            model: message.model.unwrap_or_else(|| UNKNOWN_MODEL.to_string()),
            timestamp,
            input_tokens: usage.input_tokens.unwrap_or(0),
            output_tokens: usage.output_tokens.unwrap_or(0),
            cache_read_tokens: usage.cache_read_input_tokens.unwrap_or(0),
            cache_create_tokens: usage.cache_creation_input_tokens.unwrap_or(0),
        })
    }

    /// Read one newline-terminated record into `buf`, without the newline.
    fn read_record<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<RecordRead> {
        let limit = MAX_RECORD_BYTES as u64 + 1;
        let read = (&mut *reader).take(limit).read_until(b'\n', buf)?;
        if read == 0 {
            return Ok(RecordRead::Eof);
        }

        if buf.last() == Some(&b'\n') {
            buf.pop();
            return Ok(RecordRead::Line);
        }

        if buf.len() > MAX_RECORD_BYTES {
            Self::skip_rest_of_record(reader)?;
            return Ok(RecordRead::Oversized);
        }

        // last line without a trailing newline
        Ok(RecordRead::Line)
    }

    fn skip_rest_of_record<R: BufRead>(reader: &mut R) -> io::Result<()> {
        loop {
            let available = reader.fill_buf()?;
            if available.is_empty() {
                return Ok(());
            }
            match available.iter().position(|b| *b == b'\n') {
                Some(pos) => {
                    reader.consume(pos + 1);
                    return Ok(());
                }
                None => {
                    let len = available.len();
                    reader.consume(len);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn floor() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_assistant_line() {
        let line = r#"{"type":"assistant","timestamp":"2024-01-01T12:00:00.000Z","message":{"model":"claude-sonnet-4-20250514","usage":{"input_tokens":100,"output_tokens":50,"cache_read_input_tokens":10,"cache_creation_input_tokens":25}}}"#;

        let entry = JournalParser::parse_line(line, floor()).unwrap();
        assert_eq!(entry.model, "claude-sonnet-4-20250514");
        assert_eq!(entry.timestamp, Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap());
        assert_eq!(entry.input_tokens, 100);
        assert_eq!(entry.output_tokens, 50);
        assert_eq!(entry.cache_read_tokens, 10);
        assert_eq!(entry.cache_create_tokens, 25);
    }

    #[test]
    fn test_user_record_with_usage_is_skipped() {
        let line = r#"{"type":"user","timestamp":"2024-01-01T12:00:00Z","message":{"model":"claude-sonnet-4","usage":{"input_tokens":100,"output_tokens":50}}}"#;
        assert!(JournalParser::parse_line(line, floor()).is_none());
    }

    #[test]
    fn test_missing_usage_is_skipped() {
        let line = r#"{"type":"assistant","timestamp":"2024-01-01T12:00:00Z","message":{"model":"mystery-model"}}"#;
        assert!(JournalParser::parse_line(line, floor()).is_none());
    }

    #[test]
    fn test_missing_timestamp_is_skipped() {
        let line = r#"{"type":"assistant","message":{"usage":{"input_tokens":1}}}"#;
        assert!(JournalParser::parse_line(line, floor()).is_none());
    }

    #[test]
    fn test_unparsable_timestamp_is_skipped() {
        let line = r#"{"type":"assistant","timestamp":"yesterday","message":{"usage":{"input_tokens":1}}}"#;
        assert!(JournalParser::parse_line(line, floor()).is_none());
    }

    #[test]
    fn test_defaults_for_missing_model_and_counters() {
        let line = r#"{"type":"assistant","timestamp":"2024-01-01T12:00:00Z","message":{"usage":{"output_tokens":7}}}"#;

        let entry = JournalParser::parse_line(line, floor()).unwrap();
        assert_eq!(entry.model, UNKNOWN_MODEL);
        assert_eq!(entry.input_tokens, 0);
        assert_eq!(entry.output_tokens, 7);
        assert_eq!(entry.cache_read_tokens, 0);
        assert_eq!(entry.cache_create_tokens, 0);
    }

    #[test]
    fn test_floor_is_inclusive() {
        let line = r#"{"type":"assistant","timestamp":"2024-01-01T00:00:00Z","message":{"usage":{"input_tokens":1}}}"#;
        assert!(JournalParser::parse_line(line, floor()).is_some());
        assert!(JournalParser::parse_line(line, floor() + Duration::seconds(1)).is_none());
    }

    #[test]
    fn test_invalid_json_line() {
        assert!(JournalParser::parse_line(r#"{"type": "assistant"#, floor()).is_none());
        assert!(JournalParser::parse_line("   ", floor()).is_none());
    }

    #[test]
    fn test_parse_file_skips_noise() {
        let mut temp_file = NamedTempFile::new().unwrap();
        let content = concat!(
            r#"{"type":"summary","summary":"x"}"#,
            "\n\n",
            "{broken json line}\n",
            r#"{"type":"assistant","timestamp":"2024-01-01T12:00:00Z","message":{"model":"claude-opus-4","usage":{"input_tokens":100}}}"#,
            "\r\n",
            r#"{"type":"assistant","timestamp":"2023-12-31T12:00:00Z","message":{"model":"claude-opus-4","usage":{"input_tokens":999}}}"#,
            "\n",
            r#"{"type":"assistant","timestamp":"2024-01-02T12:00:00Z","message":{"model":"claude-haiku","usage":{"input_tokens":200}}}"#,
        );
        temp_file.write_all(content.as_bytes()).unwrap();

        let entries = JournalParser::parse_file(temp_file.path(), floor());
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].input_tokens, 100);
        assert_eq!(entries[1].model, "claude-haiku");
        assert_eq!(entries[1].input_tokens, 200);
    }

    #[test]
    fn test_oversized_record_does_not_abort_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        let huge = format!(
            r#"{{"type":"assistant","timestamp":"2024-01-01T12:00:00Z","padding":"{}","message":{{"usage":{{"input_tokens":5}}}}}}"#,
            "x".repeat(MAX_RECORD_BYTES)
        );
        writeln!(temp_file, "{}", huge).unwrap();
        writeln!(
            temp_file,
            r#"{{"type":"assistant","timestamp":"2024-01-01T13:00:00Z","message":{{"usage":{{"input_tokens":6}}}}}}"#
        )
        .unwrap();

        let entries = JournalParser::parse_file(temp_file.path(), floor());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].input_tokens, 6);
    }

    #[test]
    fn test_missing_file_yields_nothing() {
        let entries = JournalParser::parse_file(Path::new("/nonexistent/journal.jsonl"), floor());
        assert!(entries.is_empty());
    }
}
