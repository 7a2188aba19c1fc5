//! Pattern items for the date format table.
//!
//! A pattern is a flat list of fixed-width numeric fields and literal
//! characters. Patterns are written in the familiar `yyyyMMdd'T'HHmmss`
//! notation and compiled into [`Item`]s.

use std::fmt;

use chrono::format::Parsed;
use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};

use crate::rfc::ical::parse::{ParseError, ParseErrorKind, ParseResult};

/// A single element of a date pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Item {
    /// Four-digit year (`yyyy`).
    Year,
    /// Two-digit month (`MM`).
    Month,
    /// Two-digit day of month (`dd`).
    Day,
    /// Two-digit hour, 24-hour clock (`HH`).
    Hour,
    /// Two-digit minute (`mm`).
    Minute,
    /// Two-digit second (`ss`).
    Second,
    /// A character that must appear verbatim.
    Literal(char),
}

impl Item {
    /// Number of digits for numeric items, `None` for literals.
    #[must_use]
    pub const fn width(self) -> Option<usize> {
        match self {
            Self::Year => Some(4),
            Self::Month | Self::Day | Self::Hour | Self::Minute | Self::Second => Some(2),
            Self::Literal(_) => None,
        }
    }

    /// Returns whether the item reads or writes a clock field.
    #[must_use]
    pub const fn is_time(self) -> bool {
        matches!(self, Self::Hour | Self::Minute | Self::Second)
    }

    const fn pattern_letters(self) -> Option<&'static str> {
        match self {
            Self::Year => Some("yyyy"),
            Self::Month => Some("MM"),
            Self::Day => Some("dd"),
            Self::Hour => Some("HH"),
            Self::Minute => Some("mm"),
            Self::Second => Some("ss"),
            Self::Literal(_) => None,
        }
    }

    fn from_letters(letters: &str) -> Option<Self> {
        match letters {
            "yyyy" => Some(Self::Year),
            "MM" => Some(Self::Month),
            "dd" => Some(Self::Day),
            "HH" => Some(Self::Hour),
            "mm" => Some(Self::Minute),
            "ss" => Some(Self::Second),
            _ => None,
        }
    }

    fn store(self, parsed: &mut Parsed, value: i64, column: usize) -> ParseResult<()> {
        // chrono admits a leap second that the text form cannot carry back out
        if self == Self::Second && value > 59 {
            return Err(ParseError::new(ParseErrorKind::InvalidTime, column)
                .with_context(format!("second {value} out of range")));
        }

        let result = match self {
            Self::Year => parsed.set_year(value),
            Self::Month => parsed.set_month(value),
            Self::Day => parsed.set_day(value),
            Self::Hour => parsed.set_hour(value),
            Self::Minute => parsed.set_minute(value),
            Self::Second => parsed.set_second(value),
            Self::Literal(_) => Ok(()),
        };

        result.map_err(|err| {
            let kind = if self.is_time() {
                ParseErrorKind::InvalidTime
            } else {
                ParseErrorKind::InvalidDate
            };
            ParseError::new(kind, column).with_context(err.to_string())
        })
    }
}

/// ## Summary
/// Compiles a pattern string into items.
///
/// Recognized fields are `yyyy`, `MM`, `dd`, `HH`, `mm` and `ss`. Text between
/// single quotes is literal (`''` is a literal quote); any other non-letter
/// character is literal as well.
///
/// ## Errors
/// Returns [`ParseErrorKind::InvalidPattern`] for unknown letter runs or an
/// unterminated quote.
pub fn compile(pattern: &str) -> ParseResult<Vec<Item>> {
    let mut items = Vec::new();
    let mut chars = pattern.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if c == '\'' {
            compile_quoted(pattern, idx, &mut chars, &mut items)?;
        } else if c.is_ascii_alphabetic() {
            let mut end = idx + c.len_utf8();
            while let Some(&(next_idx, next)) = chars.peek() {
                if next != c {
                    break;
                }
                end = next_idx + next.len_utf8();
                chars.next();
            }
            let letters = &pattern[idx..end];
            let item = Item::from_letters(letters).ok_or_else(|| {
                ParseError::new(ParseErrorKind::InvalidPattern, idx + 1)
                    .with_context(format!("unsupported field '{letters}'"))
            })?;
            items.push(item);
        } else {
            items.push(Item::Literal(c));
        }
    }

    Ok(items)
}

fn compile_quoted(
    pattern: &str,
    start: usize,
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    items: &mut Vec<Item>,
) -> ParseResult<()> {
    // '' outside a quoted run is an escaped quote
    if let Some(&(_, '\'')) = chars.peek() {
        chars.next();
        items.push(Item::Literal('\''));
        return Ok(());
    }

    while let Some((_, c)) = chars.next() {
        if c != '\'' {
            items.push(Item::Literal(c));
            continue;
        }
        if let Some(&(_, '\'')) = chars.peek() {
            chars.next();
            items.push(Item::Literal('\''));
        } else {
            return Ok(());
        }
    }

    Err(ParseError::new(ParseErrorKind::InvalidPattern, start + 1)
        .with_context(format!("unterminated quote in '{pattern}'")))
}

/// ## Summary
/// Reads `input` against `items`, storing numeric fields into `parsed`.
///
/// Every numeric field must consist of exactly its width in ASCII digits;
/// signs and short fields are rejected.
///
/// ## Errors
/// Returns a shape error (`UnexpectedEof`, `InvalidDigits`,
/// `UnexpectedCharacter`, `TrailingInput`) when the input does not follow the
/// pattern, or a field error (`InvalidDate`, `InvalidTime`) when a field is out
/// of range.
pub fn read(items: &[Item], input: &str, parsed: &mut Parsed) -> ParseResult<()> {
    let bytes = input.as_bytes();
    let mut pos = 0;

    for &item in items {
        let column = pos + 1;
        match item {
            Item::Literal(expected) => {
                let found = input[pos..].chars().next().ok_or_else(|| {
                    ParseError::new(ParseErrorKind::UnexpectedEof, column)
                        .with_context(format!("expected '{expected}'"))
                })?;
                if found != expected {
                    return Err(ParseError::new(ParseErrorKind::UnexpectedCharacter, column)
                        .with_context(format!("expected '{expected}', found '{found}'")));
                }
                pos += found.len_utf8();
            }
            numeric => {
                let width = numeric.width().unwrap_or_default();
                let digits = bytes.get(pos..pos + width).ok_or_else(|| {
                    ParseError::new(ParseErrorKind::UnexpectedEof, column)
                        .with_context(format!("expected {width} digits"))
                })?;
                if !digits.iter().all(u8::is_ascii_digit) {
                    return Err(ParseError::new(ParseErrorKind::InvalidDigits, column)
                        .with_context(format!("expected {width} digits")));
                }
                let value = digits
                    .iter()
                    .fold(0_i64, |acc, d| acc * 10 + i64::from(d - b'0'));
                numeric.store(parsed, value, column)?;
                pos += width;
            }
        }
    }

    if pos < input.len() {
        return Err(ParseError::new(ParseErrorKind::TrailingInput, pos + 1)
            .with_context(input[pos..].to_string()));
    }

    Ok(())
}

/// ## Summary
/// Writes `items` for the given calendar date and optional time of day.
///
/// Fields are zero-padded to their fixed width; sub-second precision is
/// dropped.
///
/// ## Errors
/// Returns `fmt::Error` when a clock item is present but `time` is `None`.
pub fn write<W: fmt::Write>(
    items: &[Item],
    out: &mut W,
    date: NaiveDate,
    time: Option<NaiveTime>,
) -> fmt::Result {
    for &item in items {
        match item {
            Item::Year => write!(out, "{:04}", date.year())?,
            Item::Month => write!(out, "{:02}", date.month())?,
            Item::Day => write!(out, "{:02}", date.day())?,
            Item::Hour => write!(out, "{:02}", time.ok_or(fmt::Error)?.hour())?,
            Item::Minute => write!(out, "{:02}", time.ok_or(fmt::Error)?.minute())?,
            Item::Second => write!(out, "{:02}", time.ok_or(fmt::Error)?.second())?,
            Item::Literal(c) => out.write_char(c)?,
        }
    }
    Ok(())
}

/// Renders items back into pattern notation.
pub(crate) fn describe<W: fmt::Write>(items: &[Item], out: &mut W) -> fmt::Result {
    for &item in items {
        match item.pattern_letters() {
            Some(letters) => out.write_str(letters)?,
            None => {
                if let Item::Literal(c) = item {
                    if c == '\'' {
                        out.write_str("''")?;
                    } else if c.is_ascii_alphabetic() {
                        write!(out, "'{c}'")?;
                    } else {
                        out.write_char(c)?;
                    }
                }
            }
        }
    }
    Ok(())
}
