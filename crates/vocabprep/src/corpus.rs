//! Line splitting, header handling, and pre-tokenization cleanup.

use std::borrow::Cow;

use crate::config::CorpusFormat;
use crate::error::MalformedLine;

/// Stands in for an escaped `""` while lone quotes are stripped.
const QUOTE_SENTINEL: char = '\u{E000}';

/// Sentence punctuation trimmed from both ends of every raw token.
fn is_edge_punctuation(c: char) -> bool {
    matches!(
        c,
        '.' | ',' | ';' | ':' | '!' | '?' | '(' | ')' | '[' | ']' | '{' | '}'
    )
}

/// Lines of a delimited text file, borrowed from the loaded buffer.
///
/// Lines are split on `\n` only, keeping the empty segment that follows a
/// terminal newline; a trailing `\r` is stripped. The header, when the format
/// declares one, is excluded.
#[derive(Debug, Clone)]
pub struct Corpus<'a> {
    lines: Vec<&'a [u8]>,
    first_line_number: usize,
    header: Option<&'a [u8]>,
    delimiter: char,
}

/// One corpus line after decoding and sanitizing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusLine<'a> {
    /// 1-based line number in the source file.
    pub number: usize,
    pub text: Cow<'a, str>,
}

impl<'a> Corpus<'a> {
    pub fn from_bytes(bytes: &'a [u8], format: &CorpusFormat) -> Self {
        let mut lines: Vec<&'a [u8]> = bytes
            .split(|b| *b == b'\n')
            .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
            .collect();
        let mut header = None;
        let mut first_line_number = 1;
        if format.has_header && !lines.is_empty() {
            header = Some(lines.remove(0));
            first_line_number = 2;
        }
        Self {
            lines,
            first_line_number,
            header,
            delimiter: format.delimiter,
        }
    }

    pub fn from_text(text: &'a str, format: &CorpusFormat) -> Self {
        Self::from_bytes(text.as_bytes(), format)
    }

    /// Number of lines excluding the header.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether the last segment is the empty one left by a final newline.
    pub fn ends_with_empty_segment(&self) -> bool {
        self.lines.last().is_some_and(|line| line.is_empty())
    }

    /// The excluded header line, lossily decoded.
    pub fn header(&self) -> Option<Cow<'a, str>> {
        self.header.map(String::from_utf8_lossy)
    }

    /// Decode and sanitize line `index` (0-based, header excluded).
    pub fn line(&self, index: usize) -> Option<Result<CorpusLine<'a>, MalformedLine>> {
        let raw = *self.lines.get(index)?;
        let number = index + self.first_line_number;
        Some(match std::str::from_utf8(raw) {
            Ok(text) => Ok(CorpusLine {
                number,
                text: sanitize_line(text, self.delimiter),
            }),
            Err(err) => Err(MalformedLine {
                line: number,
                reason: format!("invalid utf-8: {err}"),
            }),
        })
    }

    /// Iterate decoded, sanitized lines in order.
    pub fn lines(&self) -> impl Iterator<Item = Result<CorpusLine<'a>, MalformedLine>> + '_ {
        (0..self.lines.len()).filter_map(move |idx| self.line(idx))
    }
}

/// Undo CSV field quoting and drop the field delimiter.
///
/// The delimiter becomes a space. A doubled quote (`""`, the CSV escape for a
/// literal quote) survives as a single `"`; every other quote character is
/// removed. So `"6"" tortilla",x` becomes `6" tortilla x`.
pub fn sanitize_line(line: &str, delimiter: char) -> Cow<'_, str> {
    if !line.contains(delimiter) && !line.contains('"') && !line.contains(QUOTE_SENTINEL) {
        return Cow::Borrowed(line);
    }
    let mut out = line
        .replace(QUOTE_SENTINEL, "")
        .replace(delimiter, " ")
        .replace("\"\"", &QUOTE_SENTINEL.to_string());
    out.retain(|c| c != '"');
    Cow::Owned(out.replace(QUOTE_SENTINEL, "\""))
}

/// Split a sanitized line into raw tokens.
///
/// Splits on whitespace and trims sentence punctuation from both ends of each
/// piece; pieces that were only punctuation disappear. Quotes and apostrophes
/// are kept.
pub fn split_tokens(line: &str) -> impl Iterator<Item = &str> {
    line.split_whitespace()
        .map(|raw| raw.trim_matches(is_edge_punctuation))
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csv_format(has_header: bool) -> CorpusFormat {
        CorpusFormat {
            delimiter: ',',
            has_header,
        }
    }

    #[test]
    fn sanitize_keeps_escaped_quotes() {
        assert_eq!(sanitize_line("\"6\"\" tortilla\"", ','), "6\" tortilla");
        assert_eq!(sanitize_line("\"a,b\",c", ','), "a b c");
        assert_eq!(sanitize_line("\"\"\"\"", ','), "\"\"");
    }

    #[test]
    fn sanitize_borrows_clean_lines() {
        assert!(matches!(sanitize_line("plain text", ','), Cow::Borrowed(_)));
        assert_eq!(sanitize_line("a;b", ';'), "a b");
    }

    #[test]
    fn splits_and_trims_edge_punctuation() {
        let tokens: Vec<&str> = split_tokens("A cat sat. (really) ... 6\" it's").collect();
        assert_eq!(tokens, vec!["A", "cat", "sat", "really", "6\"", "it's"]);
    }

    #[test]
    fn keeps_trailing_empty_segment_and_strips_cr() {
        let corpus = Corpus::from_text("one\r\ntwo\n", &csv_format(false));
        let lines: Vec<String> = corpus
            .lines()
            .map(|l| l.unwrap().text.into_owned())
            .collect();
        assert_eq!(lines, vec!["one", "two", ""]);
        assert!(corpus.ends_with_empty_segment());
        assert!(!Corpus::from_text("one\ntwo", &csv_format(false)).ends_with_empty_segment());
    }

    #[test]
    fn header_is_excluded_and_numbering_follows_the_file() {
        let corpus = Corpus::from_text("description\nfirst\nsecond", &csv_format(true));
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.header().as_deref(), Some("description"));
        let first = corpus.line(0).unwrap().unwrap();
        assert_eq!(first.number, 2);
        assert_eq!(first.text, "first");
    }

    #[test]
    fn invalid_utf8_is_reported_per_line() {
        let bytes = b"good\n\xff\xfe bad\nalso good";
        let corpus = Corpus::from_bytes(bytes, &csv_format(false));
        let results: Vec<_> = corpus.lines().collect();
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        let err = results[1].as_ref().unwrap_err();
        assert_eq!(err.line, 2);
        assert!(results[2].is_ok());
    }
}
