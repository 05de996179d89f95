//! Error types for xedit

use std::fmt;
use thiserror::Error;

/// Position in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pos {
    pub offset: usize,
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.offset, self.line, self.col)
    }
}

impl Pos {
    pub const fn new(offset: usize, line: u32, col: u32) -> Self {
        Self { offset, line, col }
    }
}

/// Span representing a range in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

impl Span {
    pub const fn new(start: Pos, end: Pos) -> Self {
        Self { start, end }
    }

    pub const fn at(pos: Pos) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }
}

/// Error kind for detailed categorization
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Expected { expected: String, found: String },
    UnmatchedClosingTag { expected: String, found: String },
    UnexpectedClosingTag { found: String },
    Unterminated { construct: &'static str },
    InvalidAttribute,
    DuplicateAttribute { name: String },
    InvalidName,
    InvalidUtf8,
    MissingRoot,
    MultipleRoots,
    TrailingContent,
    NotAFragment,
    TooDeep { max: u16 },
    TooLarge { max: usize },
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expected { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
            Self::UnmatchedClosingTag { expected, found } => {
                write!(f, "closing tag </{found}> does not match <{expected}>")
            }
            Self::UnexpectedClosingTag { found } => {
                write!(f, "unexpected closing tag </{found}>")
            }
            Self::Unterminated { construct } => write!(f, "unterminated {construct}"),
            Self::InvalidAttribute => write!(f, "invalid attribute syntax"),
            Self::DuplicateAttribute { name } => write!(f, "duplicate attribute: {name}"),
            Self::InvalidName => write!(f, "invalid name"),
            Self::InvalidUtf8 => write!(f, "invalid utf-8"),
            Self::MissingRoot => write!(f, "document has no root element"),
            Self::MultipleRoots => write!(f, "document has more than one root element"),
            Self::TrailingContent => write!(f, "unexpected content after root element"),
            Self::NotAFragment => write!(f, "fragment must be exactly one element"),
            Self::TooDeep { max } => write!(f, "max depth exceeded: {max}"),
            Self::TooLarge { max } => write!(f, "max size exceeded: {max}"),
        }
    }
}

/// Main error type for xedit
#[derive(Error, Clone, Debug, PartialEq)]
#[error("error at {}: {message}", .span.start)]
pub struct Error {
    kind: ErrorKind,
    span: Span,
    message: String,
}

/// The parser is the only source of errors, so the two names are interchangeable.
pub type ParseError = Error;

impl Error {
    pub fn new(kind: ErrorKind, span: Span) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            span,
            message,
        }
    }

    pub fn with_message(kind: ErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Position where parsing failed
    pub fn position(&self) -> Pos {
        self.span.start
    }

    /// The construct the parser expected, when the failure names one
    pub fn expected(&self) -> Option<&str> {
        match &self.kind {
            ErrorKind::Expected { expected, .. } => Some(expected),
            ErrorKind::UnmatchedClosingTag { expected, .. } => Some(expected),
            _ => None,
        }
    }

    /// Create error at specific position
    pub fn at(kind: ErrorKind, pos: Pos) -> Self {
        Self::new(kind, Span::at(pos))
    }
}

/// Result type alias for xedit
pub type Result<T> = std::result::Result<T, Error>;
