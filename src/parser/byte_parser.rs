//! Low-level byte-by-byte parser for text input.
//!
//! This module provides [ByteParser] for parsing text-based tree formats with
//! support for peeking, consuming, comment skipping, and quote-aware label
//! parsing. Used as the foundation of the Newick parser.

use crate::parser::parsing_error::ParsingError;
use std::fs;
use std::path::Path;

// =#========================================================================#=
// BYTE PARSER
// =#========================================================================#=
/// A byte-by-byte parser with support for peeking, consuming, and labels.
///
/// Labels are collected as bytes and decoded as UTF-8 once complete, so
/// taxon names with non-ASCII characters survive. All structural characters
/// of Newick are ASCII.
///
/// # Features
/// - Owns its input: a string, bytes, or a file read upfront
/// - Whitespace and `[...]` comment skipping
/// - Quote-aware label parsing (single quotes, doubled to escape)
/// - Context extraction for error reporting
///
/// # Example
/// ```
/// use phylgebra::parser::ByteParser;
///
/// let mut parser = ByteParser::for_str("  [comment] 'Wilson''s_Storm-petrel':1.5");
/// parser.skip_comment_and_whitespace().unwrap();
/// let label = parser.parse_label(b",:;()").unwrap();
/// assert_eq!(label.as_deref(), Some("Wilson's_Storm-petrel"));
/// assert!(parser.consume_if(b':'));
/// ```
pub struct ByteParser {
    /// Input being parsed
    input: Vec<u8>,
    /// Offset of the next unread byte
    pos: usize,
}

impl ByteParser {
    /// Creates a new `ByteParser` owning `input`.
    pub fn new(input: Vec<u8>) -> Self {
        Self { input, pos: 0 }
    }

    /// Creates a new `ByteParser` from a byte slice by copying it into a Vec.
    pub fn for_bytes(input: &[u8]) -> Self {
        Self::new(input.to_vec())
    }

    /// Creates a new `ByteParser` from a string by copying it into a Vec.
    pub fn for_str(input: &str) -> Self {
        Self::for_bytes(input.as_bytes())
    }

    /// Creates a new `ByteParser` reading the whole file into memory.
    ///
    /// # Errors
    /// Returns an IO [ParsingError] if the file cannot be read.
    pub fn for_file<P: AsRef<Path>>(path: P) -> Result<Self, ParsingError> {
        Ok(Self::new(fs::read(path)?))
    }

    /// Peeks at the current byte without consuming it, `None` at EOF.
    #[inline(always)]
    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    /// Gets the current byte and advances the position (consumes it).
    #[inline(always)]
    pub fn next_byte(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }

    /// Skips (consumes) all consecutive whitespace characters.
    ///
    /// Whitespace includes: space (' '), tab ('\t'), newline ('\n'), and carriage return ('\r').
    pub fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek() {
            if b == b' ' || b == b'\t' || b == b'\n' || b == b'\r' {
                self.next_byte();
            } else {
                break;
            }
        }
    }

    /// Skips (consumes) a comment enclosed in square brackets `[...]` if present.
    ///
    /// # Returns
    /// * `Ok(true)` - A comment was found and consumed
    /// * `Ok(false)` - No comment at current position
    /// * `Err(ParsingError)` - Comment was opened but never closed
    pub fn skip_comment(&mut self) -> Result<bool, ParsingError> {
        if self.consume_if(b'[') {
            if !self.consume_until(b']') {
                return Err(ParsingError::unclosed_comment(self));
            }
            return Ok(true);
        }

        Ok(false)
    }

    /// Skips (consumes) all consecutive whitespace and comments.
    ///
    /// # Errors
    /// Returns an error if an unclosed comment is encountered.
    pub fn skip_comment_and_whitespace(&mut self) -> Result<(), ParsingError> {
        self.skip_whitespace();

        while self.skip_comment()? {
            self.skip_whitespace();
        }

        Ok(())
    }

    /// Checks if the current byte matches `ch`.
    pub fn peek_is(&self, ch: u8) -> bool {
        self.peek() == Some(ch)
    }

    /// Consumes the current byte if it matches `ch`.
    ///
    /// # Returns
    /// `true` if the byte was matched and consumed, `false` otherwise
    pub fn consume_if(&mut self, ch: u8) -> bool {
        if self.peek_is(ch) {
            self.next_byte();
            true
        } else {
            false
        }
    }

    /// Consumes bytes up to and including `target`.
    ///
    /// # Returns
    /// `true` if the target was found, `false` if EOF was reached first
    pub fn consume_until(&mut self, target: u8) -> bool {
        while let Some(b) = self.next_byte() {
            if b == target {
                return true;
            }
        }
        false
    }

    /// Returns whether the end of data (EOF) has been reached.
    pub fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Returns the current parser position (byte offset) in the input.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns a string from up to `k` bytes from the current position for error context.
    ///
    /// Invalid UTF-8 sequences are replaced with the Unicode replacement character.
    pub fn get_context_as_string(&self, k: usize) -> String {
        let start = self.pos.min(self.input.len());
        let end = self.pos.saturating_add(k).min(self.input.len());
        String::from_utf8_lossy(&self.input[start..end]).into_owned()
    }

    /// Parses a label (quoted or unquoted) ending at any of `delimiters`.
    ///
    /// Skips leading comments and whitespace.
    ///
    /// # Returns
    /// The parsed label, or `None` if it is empty
    ///
    /// # Errors
    /// Returns an error if a quoted label is not closed or the label is not valid UTF-8.
    pub fn parse_label(&mut self, delimiters: &[u8]) -> Result<Option<String>, ParsingError> {
        self.skip_comment_and_whitespace()?;

        let bytes = if self.peek_is(b'\'') {
            self.parse_quoted_label()?
        } else {
            self.parse_unquoted_label(delimiters)
        };

        if bytes.is_empty() {
            return Ok(None);
        }
        String::from_utf8(bytes)
            .map(Some)
            .map_err(|e| ParsingError::invalid_label(self, e.to_string()))
    }

    /// Parses a token of characters that may form a decimal number
    /// (digits, `.`, `+`, `-`, `e`, `E`), without interpreting it.
    pub fn parse_number_token(&mut self) -> String {
        let mut token = String::new();
        while let Some(b) = self.peek() {
            if b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E') {
                token.push(b as char);
                self.next_byte();
            } else {
                break;
            }
        }
        token
    }

    /// Parses a label enclosed in single quotes, where doubled quotes
    /// stand for one (e.g. `'Wilson''s'` becomes `Wilson's`).
    fn parse_quoted_label(&mut self) -> Result<Vec<u8>, ParsingError> {
        self.next_byte(); // consume opening '

        let mut label = Vec::new();
        loop {
            match self.next_byte() {
                Some(b'\'') if self.peek_is(b'\'') => {
                    label.push(b'\'');
                    self.next_byte();
                }
                Some(b'\'') => return Ok(label),
                Some(b) => label.push(b),
                None => return Err(ParsingError::unclosed_quote(self)),
            }
        }
    }

    /// Parses an unquoted label until any of the delimiters is encountered.
    fn parse_unquoted_label(&mut self, delimiters: &[u8]) -> Vec<u8> {
        let mut label = Vec::new();
        while let Some(b) = self.peek() {
            if delimiters.contains(&b) {
                break;
            }
            label.push(b);
            self.next_byte();
        }
        label
    }
}
