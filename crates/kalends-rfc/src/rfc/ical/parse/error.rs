//! Date and date-time parsing error types.

use std::fmt;

/// Result type for temporal parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Error type for temporal parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Kind of error.
    pub kind: ParseErrorKind,
    /// Column where the error occurred (1-based).
    pub column: usize,
    /// Additional context about the error.
    pub context: Option<String>,
}

impl ParseError {
    /// Creates a new parse error.
    #[must_use]
    pub fn new(kind: ParseErrorKind, column: usize) -> Self {
        Self {
            kind,
            column,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Returns whether the input had the right shape but an out-of-range
    /// field, as opposed to not matching the pattern at all.
    #[must_use]
    pub const fn is_field_error(&self) -> bool {
        matches!(
            self.kind,
            ParseErrorKind::InvalidDate | ParseErrorKind::InvalidTime
        )
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at column {}", self.kind, self.column)?;
        if let Some(ref ctx) = self.context {
            write!(f, ": {ctx}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// Kinds of parse errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Input ended before the pattern was complete.
    UnexpectedEof,
    /// A literal in the pattern did not match.
    UnexpectedCharacter,
    /// A numeric field contained something other than ASCII digits.
    InvalidDigits,
    /// Input continued after the pattern was complete.
    TrailingInput,
    /// Calendar fields do not form a valid date.
    InvalidDate,
    /// Clock fields do not form a valid time.
    InvalidTime,
    /// No configured pattern accepted the input.
    NoMatchingPattern,
    /// A pattern string could not be compiled.
    InvalidPattern,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof => write!(f, "unexpected end of input"),
            Self::UnexpectedCharacter => write!(f, "unexpected character"),
            Self::InvalidDigits => write!(f, "invalid digits"),
            Self::TrailingInput => write!(f, "trailing input"),
            Self::InvalidDate => write!(f, "invalid date"),
            Self::InvalidTime => write!(f, "invalid time"),
            Self::NoMatchingPattern => write!(f, "no matching date pattern"),
            Self::InvalidPattern => write!(f, "invalid date pattern"),
        }
    }
}
