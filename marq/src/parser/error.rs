use std::fmt;
use std::ops::Range;

use codespan_reporting::diagnostic::{Diagnostic, Label, Severity};

use crate::lexer::{LexError, TokenKind};

/// A structured parse diagnostic with source location information.
///
/// The library never formats these for terminal display; callers convert
/// them with [`ParseError::to_diagnostic`] and emit them however they like.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Range<usize>,
    pub file_id: usize,
    pub severity: Severity,
    pub notes: Vec<String>,
}

/// What went wrong, as a matchable tag rather than a message string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A tokenization failure surfaced through the parse entry point.
    Lex(LexError),
    /// The grammar required one thing and the source supplied another.
    UnexpectedToken {
        expected: &'static str,
        found: TokenKind,
    },
    /// An argument key repeated within a single tag's argument list.
    DuplicateArgument { name: String },
    /// A `..` with no number in front of it.
    InvalidRange,
    /// The input ended mid-construct.
    UnexpectedEof { expected: &'static str },
    /// Blocks nested beyond the supported depth.
    NestingTooDeep { limit: usize },
}

impl ParseError {
    pub fn error(kind: ParseErrorKind, span: Range<usize>, file_id: usize) -> Self {
        ParseError {
            kind,
            span,
            file_id,
            severity: Severity::Error,
            notes: Vec::new(),
        }
    }

    pub fn warning(kind: ParseErrorKind, span: Range<usize>, file_id: usize) -> Self {
        ParseError {
            kind,
            span,
            file_id,
            severity: Severity::Warning,
            notes: Vec::new(),
        }
    }

    pub fn from_lex(error: LexError, file_id: usize) -> Self {
        let span = error.span().clone();
        ParseError::error(ParseErrorKind::Lex(error), span, file_id)
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Convert to a codespan-reporting Diagnostic for display.
    pub fn to_diagnostic(&self) -> Diagnostic<usize> {
        Diagnostic::new(self.severity)
            .with_message(self.kind.to_string())
            .with_labels(vec![Label::primary(self.file_id, self.span.clone())])
            .with_notes(self.notes.clone())
    }
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::Lex(error) => write!(f, "{}", error),
            ParseErrorKind::UnexpectedToken { expected, found } => {
                write!(f, "expected {}, found {}", expected, found.describe())
            }
            ParseErrorKind::DuplicateArgument { name } => {
                write!(f, "duplicate argument `{}`", name)
            }
            ParseErrorKind::InvalidRange => {
                write!(f, "malformed range: `..` must follow a number")
            }
            ParseErrorKind::UnexpectedEof { expected } => {
                write!(f, "unexpected end of input, expected {}", expected)
            }
            ParseErrorKind::NestingTooDeep { limit } => {
                write!(f, "blocks nested deeper than {} levels", limit)
            }
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for ParseError {}
