//! Byte cursor for input navigation

use crate::error::Pos;

/// Cursor for navigating byte input with position tracking
#[derive(Clone, Debug)]
pub struct Cursor<'a> {
    input: &'a [u8],
    pos: usize,
    line: u32,
    col: u32,
}

impl<'a> Cursor<'a> {
    /// Create cursor from byte slice
    pub const fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    /// Get current byte without consuming
    pub fn current(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    /// Peek at byte ahead without consuming
    pub fn peek(&self, ahead: usize) -> Option<u8> {
        self.input.get(self.pos.saturating_add(ahead)).copied()
    }

    /// Check whether the remaining input starts with `pattern`
    pub fn starts_with(&self, pattern: &[u8]) -> bool {
        self.remaining().starts_with(pattern)
    }

    /// Advance cursor by one byte
    pub fn advance(&mut self) {
        if let Some(b) = self.current() {
            self.pos += 1;
            if b == b'\n' {
                self.line += 1;
                self.col = 1;
            } else if !is_continuation_byte(b) {
                self.col += 1;
            }
        }
    }

    /// Advance cursor by `n` bytes
    pub fn advance_by(&mut self, n: usize) {
        for _ in 0..n {
            self.advance();
        }
    }

    /// Skip whitespace, returning how many bytes were skipped
    pub fn skip_whitespace(&mut self) -> usize {
        let start = self.pos;
        while let Some(b) = self.current() {
            if is_whitespace(b) {
                self.advance();
            } else {
                break;
            }
        }
        self.pos - start
    }

    /// Consume byte if it matches
    pub fn consume(&mut self, expected: u8) -> bool {
        if self.current() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume `pattern` if the remaining input starts with it
    pub fn consume_bytes(&mut self, pattern: &[u8]) -> bool {
        if self.starts_with(pattern) {
            self.advance_by(pattern.len());
            true
        } else {
            false
        }
    }

    /// Advance until just past `pattern`. Returns false when input runs out first.
    pub fn skip_past(&mut self, pattern: &[u8]) -> bool {
        while !self.is_eof() {
            if self.consume_bytes(pattern) {
                return true;
            }
            self.advance();
        }
        false
    }

    /// Get current position
    pub const fn position(&self) -> Pos {
        Pos::new(self.pos, self.line, self.col)
    }

    /// Check if at end of input
    pub const fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Get remaining bytes
    pub fn remaining(&self) -> &'a [u8] {
        self.input.get(self.pos..).unwrap_or_default()
    }

    /// Get current position index
    pub const fn pos(&self) -> usize {
        self.pos
    }

    /// Get slice from start to current position
    pub fn slice_from(&self, start: usize) -> &'a [u8] {
        self.input.get(start..self.pos).unwrap_or_default()
    }
}

pub const fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

const fn is_continuation_byte(b: u8) -> bool {
    b & 0b1100_0000 == 0b1000_0000
}
