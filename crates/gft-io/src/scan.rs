//! Whitespace token scanner for GeoFEST output files.
//!
//! GeoFEST output is free-form: records are whitespace/newline-delimited
//! token sequences with no markers or labels. The scanner hands out one
//! token at a time and attaches the input label, record index, and field
//! name to every failure so malformed input is reported precisely instead
//! of silently producing garbage values.

use std::collections::VecDeque;
use std::io::BufRead;

use crate::error::{ConvertError, Result};

pub struct TokenScanner<R> {
    reader: R,
    file: String,
    tokens: VecDeque<String>,
}

impl<R: BufRead> TokenScanner<R> {
    /// Create a scanner over `reader`, labelled `file` for error reports.
    pub fn new(reader: R, file: impl Into<String>) -> Self {
        Self {
            reader,
            file: file.into(),
            tokens: VecDeque::new(),
        }
    }

    /// Label this scanner reports in errors.
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<String>> {
        while self.tokens.is_empty() {
            let mut line = String::new();
            let bytes_read = self.reader.read_line(&mut line)?;
            if bytes_read == 0 {
                return Ok(None);
            }
            self.tokens
                .extend(line.split_whitespace().map(str::to_string));
        }
        Ok(self.tokens.pop_front())
    }

    /// Next token, failing with a short-record error if the input ends.
    pub fn require_token(&mut self, record: usize, field: &'static str) -> Result<String> {
        match self.next_token()? {
            Some(token) => Ok(token),
            None => Err(ConvertError::ShortRecord {
                file: self.file.clone(),
                record,
                field,
            }),
        }
    }

    /// Parse the next token as a signed integer, or `None` at end of input.
    ///
    /// Used for the leading field of a record so the caller can tell a clean
    /// end of input apart from a truncated record.
    pub fn next_i64(&mut self, record: usize, field: &'static str) -> Result<Option<i64>> {
        match self.next_token()? {
            None => Ok(None),
            Some(token) => token
                .parse::<i64>()
                .map(Some)
                .map_err(|_| self.malformed(record, field, "an integer", token)),
        }
    }

    /// Parse the next token as a float, or `None` at end of input.
    pub fn next_f64(&mut self, record: usize, field: &'static str) -> Result<Option<f64>> {
        match self.next_token()? {
            None => Ok(None),
            Some(token) => token
                .parse::<f64>()
                .map(Some)
                .map_err(|_| self.malformed(record, field, "a number", token)),
        }
    }

    /// Parse the next token as a floating-point field.
    pub fn require_f64(&mut self, record: usize, field: &'static str) -> Result<f64> {
        let token = self.require_token(record, field)?;
        token
            .parse::<f64>()
            .map_err(|_| self.malformed(record, field, "a number", token))
    }

    /// Parse the next token as a signed integer field.
    pub fn require_i64(&mut self, record: usize, field: &'static str) -> Result<i64> {
        let token = self.require_token(record, field)?;
        token
            .parse::<i64>()
            .map_err(|_| self.malformed(record, field, "an integer", token))
    }

    /// Parse the next token as a non-negative count field.
    pub fn require_count(&mut self, record: usize, field: &'static str) -> Result<usize> {
        let token = self.require_token(record, field)?;
        token
            .parse::<usize>()
            .map_err(|_| self.malformed(record, field, "a non-negative integer", token))
    }

    fn malformed(
        &self,
        record: usize,
        field: &'static str,
        expected: &'static str,
        token: String,
    ) -> ConvertError {
        ConvertError::MalformedRecord {
            file: self.file.clone(),
            record,
            field,
            expected,
            token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scanner(src: &str) -> TokenScanner<&[u8]> {
        TokenScanner::new(src.as_bytes(), "test")
    }

    #[test]
    fn splits_tokens_across_lines_and_whitespace() {
        let mut s = scanner("1 2.5\n  3\t4\n");
        assert_eq!(s.next_token().unwrap(), Some("1".to_string()));
        assert_eq!(s.next_token().unwrap(), Some("2.5".to_string()));
        assert_eq!(s.next_token().unwrap(), Some("3".to_string()));
        assert_eq!(s.next_token().unwrap(), Some("4".to_string()));
        assert_eq!(s.next_token().unwrap(), None);
    }

    #[test]
    fn skips_blank_lines() {
        let mut s = scanner("\n\n  7\n\n");
        assert_eq!(s.require_i64(0, "n").unwrap(), 7);
        assert_eq!(s.next_token().unwrap(), None);
    }

    #[test]
    fn reports_malformed_field_with_context() {
        let mut s = scanner("abc");
        let err = s.require_f64(3, "x").unwrap_err();
        match err {
            ConvertError::MalformedRecord {
                file,
                record,
                field,
                token,
                ..
            } => {
                assert_eq!(file, "test");
                assert_eq!(record, 3);
                assert_eq!(field, "x");
                assert_eq!(token, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn reports_short_record_at_eof() {
        let mut s = scanner("1.0");
        s.require_f64(0, "x").unwrap();
        let err = s.require_f64(0, "y").unwrap_err();
        assert!(matches!(err, ConvertError::ShortRecord { field: "y", .. }));
    }

    #[test]
    fn rejects_negative_count() {
        let mut s = scanner("-3");
        let err = s.require_count(0, "numNodes").unwrap_err();
        assert!(matches!(err, ConvertError::MalformedRecord { .. }));
    }
}
