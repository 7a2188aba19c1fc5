//! iCalendar temporal values (RFC 5545 §3.3.4, §3.3.5).
//!
//! RFC 5545 has one DATE form and three DATE-TIME forms:
//!
//! | Form                  | Example                                 | Variant      |
//! |-----------------------|-----------------------------------------|--------------|
//! | DATE                  | `19970714`                              | [`Date`]     |
//! | FORM #1 floating      | `19980118T230000`                       | [`Floating`] |
//! | FORM #2 UTC           | `19980119T070000Z`                      | [`Utc`]      |
//! | FORM #3 local with TZ | `TZID=America/New_York:19980119T020000` | [`Zoned`]    |
//!
//! [`Date`]: TemporalValue::Date
//! [`Floating`]: TemporalValue::Floating
//! [`Utc`]: TemporalValue::Utc
//! [`Zoned`]: TemporalValue::Zoned
//!
//! Floating values have no absolute meaning until a zone is applied, so they
//! are compared on their own fields and only anchored to a zone when they
//! meet an instant-bearing value.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;

use crate::rfc::ical::expand::timezone::{attach_zone, system_zone};
use crate::rfc::ical::format::{DATE_FORMAT, FLOATING_DATE_TIME_FORMAT, UTC_DATE_TIME_FORMAT};

/// A DATE or DATE-TIME value in exactly one of its four forms.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TemporalValue {
    /// Calendar date without time of day.
    Date(NaiveDate),
    /// Local date-time without offset or zone.
    Floating(NaiveDateTime),
    /// Instant fixed to UTC.
    Utc(DateTime<Utc>),
    /// Local date-time in a named zone.
    Zoned(DateTime<Tz>),
}

/// How a value relates to absolute time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Neither offset nor instant: dates and floating date-times.
    Floating,
    /// An instant without offset field.
    Utc,
    /// An instant with a zone offset.
    ZonedOffset,
}

impl TemporalValue {
    /// Returns whether an offset from UTC can be read from the value.
    #[must_use]
    pub const fn supports_offset(&self) -> bool {
        matches!(self, Self::Zoned(_))
    }

    /// Returns whether the value denotes an absolute instant.
    #[must_use]
    pub const fn supports_instant(&self) -> bool {
        matches!(self, Self::Utc(_) | Self::Zoned(_))
    }

    /// Classifies the value from its offset and instant support.
    #[must_use]
    pub const fn classify(&self) -> Classification {
        match (self.supports_offset(), self.supports_instant()) {
            (false, false) => Classification::Floating,
            (false, true) => Classification::Utc,
            (true, _) => Classification::ZonedOffset,
        }
    }

    /// Returns whether the value has neither offset nor instant.
    #[must_use]
    pub const fn is_floating(&self) -> bool {
        matches!(self.classify(), Classification::Floating)
    }

    /// Returns whether the value is an instant without offset field.
    #[must_use]
    pub const fn is_utc(&self) -> bool {
        matches!(self.classify(), Classification::Utc)
    }

    /// Returns whether the value is date-only.
    #[must_use]
    pub const fn is_date(&self) -> bool {
        matches!(self, Self::Date(_))
    }

    /// Returns the zone of a zoned value.
    #[must_use]
    pub fn tz(&self) -> Option<Tz> {
        match self {
            Self::Zoned(dt) => Some(dt.timezone()),
            _ => None,
        }
    }

    /// Calendar date in the value's own representation.
    #[must_use]
    pub fn local_date(&self) -> NaiveDate {
        match self {
            Self::Date(date) => *date,
            Self::Floating(dt) => dt.date(),
            Self::Utc(dt) => dt.date_naive(),
            Self::Zoned(dt) => dt.date_naive(),
        }
    }

    /// The absolute instant, if the value has one.
    #[must_use]
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Date(_) | Self::Floating(_) => None,
            Self::Utc(dt) => Some(*dt),
            Self::Zoned(dt) => Some(dt.with_timezone(&Utc)),
        }
    }

    /// ## Summary
    /// Expresses the value as a zoned date-time.
    ///
    /// Dates are anchored at local midnight and floating values at their local
    /// fields in `zone`; UTC values are converted to `zone`; zoned values keep
    /// their own zone.
    #[must_use]
    pub fn at_zone(&self, zone: Tz) -> DateTime<Tz> {
        match self {
            Self::Date(date) => attach_zone(date.and_time(NaiveTime::MIN), zone),
            Self::Floating(dt) => attach_zone(*dt, zone),
            Self::Utc(dt) => dt.with_timezone(&zone),
            Self::Zoned(dt) => *dt,
        }
    }

    /// Absolute instant, anchoring dates and floating values in `zone`.
    #[must_use]
    pub fn anchored_instant(&self, zone: Tz) -> DateTime<Utc> {
        self.instant()
            .unwrap_or_else(|| self.at_zone(zone).with_timezone(&Utc))
    }

    /// ## Summary
    /// Orders two values, anchoring floating values in `zone` only when they
    /// meet an instant.
    ///
    /// - Either side date-only: calendar dates are compared.
    /// - Both floating: local fields are compared, no zone involved.
    /// - Otherwise: absolute instants are compared.
    #[must_use]
    pub fn compare_in(&self, other: &Self, zone: Tz) -> Ordering {
        match (self, other) {
            (Self::Date(_), _) | (_, Self::Date(_)) => self.local_date().cmp(&other.local_date()),
            (Self::Floating(a), Self::Floating(b)) => a.cmp(b),
            _ => self
                .anchored_instant(zone)
                .cmp(&other.anchored_instant(zone)),
        }
    }

    /// Orders two values, anchoring floating values in the system zone.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        self.compare_in(other, system_zone())
    }

    /// Returns whether `self` is strictly before `other`.
    #[must_use]
    pub fn is_before(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Less
    }

    /// Returns whether `self` is strictly after `other`.
    #[must_use]
    pub fn is_after(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Greater
    }
}

impl From<NaiveDate> for TemporalValue {
    fn from(date: NaiveDate) -> Self {
        Self::Date(date)
    }
}

impl From<NaiveDateTime> for TemporalValue {
    fn from(dt: NaiveDateTime) -> Self {
        Self::Floating(dt)
    }
}

impl From<DateTime<Utc>> for TemporalValue {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::Utc(dt)
    }
}

impl From<DateTime<Tz>> for TemporalValue {
    fn from(dt: DateTime<Tz>) -> Self {
        Self::Zoned(dt)
    }
}

/// Canonical wire text. Zoned values have no wire form of their own and are
/// written as floating text in the system zone.
impl fmt::Display for TemporalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date(date) => DATE_FORMAT.write_fields(f, *date, None),
            Self::Floating(dt) => {
                FLOATING_DATE_TIME_FORMAT.write_fields(f, dt.date(), Some(dt.time()))
            }
            Self::Utc(dt) => {
                UTC_DATE_TIME_FORMAT.write_fields(f, dt.date_naive(), Some(dt.time()))
            }
            Self::Zoned(dt) => {
                let local = dt.with_timezone(&system_zone()).naive_local();
                FLOATING_DATE_TIME_FORMAT.write_fields(f, local.date(), Some(local.time()))
            }
        }
    }
}
