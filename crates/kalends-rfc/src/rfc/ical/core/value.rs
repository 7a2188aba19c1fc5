//! iCalendar property values (RFC 5545 §3.3).

use crate::rfc::ical::adapter::TemporalAdapter;

/// A property value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// TEXT value.
    Text(String),
    /// INTEGER value.
    Integer(i32),
    /// DATE or DATE-TIME value.
    Temporal(TemporalAdapter),
}

impl Value {
    /// Returns the text if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer if this is an integer value.
    #[must_use]
    pub const fn as_integer(&self) -> Option<i32> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the adapter if this is a DATE or DATE-TIME value.
    #[must_use]
    pub const fn as_temporal(&self) -> Option<&TemporalAdapter> {
        match self {
            Self::Temporal(adapter) => Some(adapter),
            _ => None,
        }
    }
}
