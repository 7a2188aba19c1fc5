//! Field-based DATE and DATE-TIME types.
//!
//! These predate [`TemporalValue`](super::TemporalValue) and keep the raw
//! calendar fields with a form tag. A [`LegacyDate`] is either a plain date or
//! a date-time that is UTC, carries a TZID, or neither.

use std::fmt;

/// DATE value (RFC 5545 §3.3.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Date {
    /// Year (e.g., 2026).
    pub year: u16,
    /// Month (1-12).
    pub month: u8,
    /// Day of month (1-31).
    pub day: u8,
}

impl Date {
    /// Creates a new date.
    #[must_use]
    pub const fn new(year: u16, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}{:02}{:02}", self.year, self.month, self.day)
    }
}

/// Form of DATE-TIME value (RFC 5545 §3.3.5).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DateTimeForm {
    /// No zone; the legacy type treats this as the system zone.
    Floating,

    /// UTC time, indicated by 'Z' suffix.
    Utc,

    /// Local time with TZID reference.
    Zoned {
        /// The timezone identifier.
        tzid: String,
    },
}

/// DATE-TIME value (RFC 5545 §3.3.5).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DateTime {
    /// Calendar date.
    pub date: Date,
    /// Hour (0-23).
    pub hour: u8,
    /// Minute (0-59).
    pub minute: u8,
    /// Second (0-60, allowing for leap seconds).
    pub second: u8,
    /// The form of this DATE-TIME.
    pub form: DateTimeForm,
}

impl DateTime {
    /// Creates a DATE-TIME of the given form.
    #[must_use]
    pub const fn new(date: Date, hour: u8, minute: u8, second: u8, form: DateTimeForm) -> Self {
        Self {
            date,
            hour,
            minute,
            second,
            form,
        }
    }

    /// Creates a UTC DATE-TIME.
    #[must_use]
    pub const fn utc(date: Date, hour: u8, minute: u8, second: u8) -> Self {
        Self::new(date, hour, minute, second, DateTimeForm::Utc)
    }

    /// Creates a DATE-TIME bound to a TZID.
    #[must_use]
    pub fn zoned(date: Date, hour: u8, minute: u8, second: u8, tzid: impl Into<String>) -> Self {
        Self::new(
            date,
            hour,
            minute,
            second,
            DateTimeForm::Zoned { tzid: tzid.into() },
        )
    }

    /// Returns whether this is a UTC time.
    #[must_use]
    pub const fn is_utc(&self) -> bool {
        matches!(self.form, DateTimeForm::Utc)
    }

    /// Returns the timezone ID if this is a zoned time.
    #[must_use]
    pub fn tzid(&self) -> Option<&str> {
        match &self.form {
            DateTimeForm::Zoned { tzid } => Some(tzid),
            _ => None,
        }
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}T{:02}{:02}{:02}",
            self.date, self.hour, self.minute, self.second
        )?;
        if self.is_utc() {
            write!(f, "Z")?;
        }
        Ok(())
    }
}

/// A legacy date: either a plain DATE or a DATE-TIME.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LegacyDate {
    /// Date without time.
    Date(Date),
    /// Date with time and form.
    DateTime(DateTime),
}

impl From<Date> for LegacyDate {
    fn from(date: Date) -> Self {
        Self::Date(date)
    }
}

impl From<DateTime> for LegacyDate {
    fn from(dt: DateTime) -> Self {
        Self::DateTime(dt)
    }
}

impl fmt::Display for LegacyDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date(date) => date.fmt(f),
            Self::DateTime(dt) => dt.fmt(f),
        }
    }
}
