//! Message sequencing (RFC 5546 §2.1.5).
//!
//! Of two revisions of the same calendar item, the one with the higher
//! SEQUENCE is authoritative. Equal sequences are decided by DTSTAMP, the
//! later stamp winning. Missing properties take their defaults: sequence 0
//! and a stamp at the Unix epoch.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::error::RfcResult;
use crate::rfc::ical::adapter::TemporalAdapter;
use crate::rfc::ical::core::{Property, PropertyLookup, TemporalValue, Value, names};
use crate::rfc::ical::expand::system_zone;

/// Sort key of one revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RevisionKey {
    pub sequence: u32,
    pub timestamp: DateTime<Utc>,
}

impl RevisionKey {
    /// SEQUENCE of an item that has none.
    pub const DEFAULT_SEQUENCE: u32 = 0;

    /// DTSTAMP of an item that has none.
    pub const DEFAULT_TIMESTAMP: DateTime<Utc> = DateTime::UNIX_EPOCH;

    /// ## Summary
    /// Reads the key of `item`.
    ///
    /// A DTSTAMP without instant (which RFC 5545 does not allow, but clients
    /// send) is anchored in the system zone.
    ///
    /// ## Errors
    /// Returns the error of a DTSTAMP that cannot be parsed or resolved.
    pub fn of<T: PropertyLookup + ?Sized>(item: &T) -> RfcResult<Self> {
        Ok(Self {
            sequence: sequence_of(item),
            timestamp: timestamp_of(item)?.anchored_instant(system_zone()),
        })
    }

    /// Properties carrying this key, usable as an item on their own.
    #[must_use]
    pub fn to_properties(self) -> Vec<Property> {
        let sequence = i32::try_from(self.sequence).unwrap_or(i32::MAX);
        vec![
            Property::integer(names::SEQUENCE, sequence),
            Property::temporal(names::DTSTAMP, TemporalValue::Utc(self.timestamp)),
        ]
    }
}

impl Default for RevisionKey {
    fn default() -> Self {
        Self {
            sequence: Self::DEFAULT_SEQUENCE,
            timestamp: Self::DEFAULT_TIMESTAMP,
        }
    }
}

/// Orders revisions of a calendar item by SEQUENCE, then DTSTAMP.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComponentSequenceComparator;

impl ComponentSequenceComparator {
    /// ## Summary
    /// Orders `a` relative to `b`; `Greater` means `a` is the more recent
    /// revision.
    ///
    /// DTSTAMP is only read when the sequences are equal.
    ///
    /// ## Errors
    /// Returns the error of a DTSTAMP that cannot be parsed or resolved.
    pub fn compare<T: PropertyLookup + ?Sized>(a: &T, b: &T) -> RfcResult<Ordering> {
        let by_sequence = sequence_of(a).cmp(&sequence_of(b));
        if by_sequence != Ordering::Equal {
            return Ok(by_sequence);
        }

        let (stamp_a, stamp_b) = (timestamp_of(a)?, timestamp_of(b)?);
        Ok(stamp_a.compare(&stamp_b))
    }

    /// ## Summary
    /// Returns whether `candidate` replaces `current`.
    ///
    /// ## Errors
    /// Same as [`ComponentSequenceComparator::compare`].
    pub fn supersedes<T: PropertyLookup + ?Sized>(candidate: &T, current: &T) -> RfcResult<bool> {
        Ok(Self::compare(candidate, current)? == Ordering::Greater)
    }

    /// ## Summary
    /// The authoritative revision among `items`, `None` if empty.
    ///
    /// On a tie the revision seen first is kept.
    ///
    /// ## Errors
    /// Same as [`ComponentSequenceComparator::compare`].
    pub fn latest<T: PropertyLookup>(items: &[T]) -> RfcResult<Option<&T>> {
        let mut best: Option<&T> = None;
        for item in items {
            let replace = match best {
                Some(current) => Self::supersedes(item, current)?,
                None => true,
            };
            if replace {
                best = Some(item);
            }
        }
        Ok(best)
    }
}

fn sequence_of<T: PropertyLookup + ?Sized>(item: &T) -> u32 {
    let Some(prop) = item.property(names::SEQUENCE) else {
        return RevisionKey::DEFAULT_SEQUENCE;
    };

    let parsed = match &prop.value {
        Value::Integer(n) => u32::try_from(*n).ok(),
        Value::Text(text) => text.trim().parse::<u32>().ok(),
        Value::Temporal(_) => None,
    };
    parsed.unwrap_or_else(|| {
        tracing::warn!(
            value = ?prop.value,
            "Unusable SEQUENCE, treating as {}",
            RevisionKey::DEFAULT_SEQUENCE
        );
        RevisionKey::DEFAULT_SEQUENCE
    })
}

fn timestamp_of<T: PropertyLookup + ?Sized>(item: &T) -> RfcResult<TemporalValue> {
    let Some(prop) = item.property(names::DTSTAMP) else {
        return Ok(TemporalValue::Utc(RevisionKey::DEFAULT_TIMESTAMP));
    };

    match &prop.value {
        Value::Temporal(adapter) => Ok(adapter.value()?.clone()),
        Value::Text(text) => TemporalAdapter::parse(text)?.into_value(),
        Value::Integer(_) => {
            tracing::warn!(value = ?prop.value, "DTSTAMP is not a date-time, using the epoch");
            Ok(TemporalValue::Utc(RevisionKey::DEFAULT_TIMESTAMP))
        }
    }
}

/// Shorthand for building a revision in tests and tools.
impl From<(u32, DateTime<Utc>)> for RevisionKey {
    fn from((sequence, timestamp): (u32, DateTime<Utc>)) -> Self {
        Self {
            sequence,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::rfc::ical::core::{Component, Parameter};

    fn stamp(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, h, 0, 0).unwrap()
    }

    fn revision(sequence: i32, dtstamp: &str) -> Component {
        Component::event()
            .with_property(Property::text("UID", "rev@example.com"))
            .with_property(Property::integer("SEQUENCE", sequence))
            .with_property(Property::parse_temporal("DTSTAMP", Vec::new(), dtstamp).unwrap())
    }

    #[test]
    fn equal_sequence_later_stamp_wins() {
        let a = revision(2, "20240115T090000Z");
        let b = revision(2, "20240115T100000Z");
        assert_eq!(ComponentSequenceComparator::compare(&a, &b).unwrap(), Ordering::Less);
        assert_eq!(ComponentSequenceComparator::compare(&b, &a).unwrap(), Ordering::Greater);
    }

    #[test]
    fn higher_sequence_wins_regardless_of_stamp() {
        let a = revision(3, "20240115T010000Z");
        let b = revision(2, "20240115T090000Z");
        assert_eq!(ComponentSequenceComparator::compare(&a, &b).unwrap(), Ordering::Greater);

        let five = revision(5, "20200101T000000Z");
        let three = revision(3, "20300101T000000Z");
        assert!(ComponentSequenceComparator::supersedes(&five, &three).unwrap());
    }

    #[test]
    fn empty_items_compare_equal() {
        let a = Component::event();
        let b = Component::todo();
        assert_eq!(ComponentSequenceComparator::compare(&a, &b).unwrap(), Ordering::Equal);
        assert_eq!(RevisionKey::of(&a).unwrap(), RevisionKey::default());
    }

    #[test]
    fn missing_properties_take_defaults() {
        let stamped = Component::event()
            .with_property(Property::temporal("DTSTAMP", TemporalValue::Utc(stamp(9))));
        let bare = Component::event();
        assert_eq!(
            ComponentSequenceComparator::compare(&stamped, &bare).unwrap(),
            Ordering::Greater
        );

        let sequenced = Component::event().with_property(Property::integer("SEQUENCE", 1));
        assert!(ComponentSequenceComparator::supersedes(&sequenced, &stamped).unwrap());
    }

    #[test_log::test]
    fn unusable_sequence_falls_back_to_default() {
        let negative = Component::event().with_property(Property::integer("SEQUENCE", -4));
        let text = Component::event().with_property(Property::text("SEQUENCE", "seven"));
        let numeric_text = Component::event().with_property(Property::text("SEQUENCE", "7"));

        assert_eq!(RevisionKey::of(&negative).unwrap().sequence, 0);
        assert_eq!(RevisionKey::of(&text).unwrap().sequence, 0);
        assert_eq!(RevisionKey::of(&numeric_text).unwrap().sequence, 7);
    }

    #[test]
    fn stamp_errors_propagate() {
        let broken = Component::event().with_property(Property::text("DTSTAMP", "yesterday"));
        let fine = Component::event();
        assert!(ComponentSequenceComparator::compare(&broken, &fine).is_err());

        // sequences differ, DTSTAMP is never read
        let ahead = Component::event()
            .with_property(Property::integer("SEQUENCE", 1))
            .with_property(Property::text("DTSTAMP", "yesterday"));
        assert_eq!(
            ComponentSequenceComparator::compare(&ahead, &fine).unwrap(),
            Ordering::Greater
        );
    }

    #[test]
    fn deferred_stamps_resolve_for_comparison() {
        let zoned = Component::event().with_property(
            Property::parse_temporal(
                "DTSTAMP",
                vec![Parameter::tzid("America/New_York")],
                "20240115T050000",
            )
            .unwrap(),
        );
        // 05:00 New York is 10:00 UTC
        let utc = revision(0, "20240115T093000Z");
        assert_eq!(
            ComponentSequenceComparator::compare(&zoned, &utc).unwrap(),
            Ordering::Greater
        );
        assert_eq!(RevisionKey::of(&zoned).unwrap().timestamp, stamp(10));
    }

    #[test]
    fn latest_picks_authoritative_revision() {
        let revisions = vec![
            revision(1, "20240115T120000Z"),
            revision(2, "20240115T090000Z"),
            revision(2, "20240115T100000Z"),
            revision(0, "20240116T000000Z"),
        ];
        let latest = ComponentSequenceComparator::latest(&revisions).unwrap().unwrap();
        assert_eq!(RevisionKey::of(latest).unwrap(), RevisionKey::from((2, stamp(10))));

        let none: Vec<Component> = Vec::new();
        assert!(ComponentSequenceComparator::latest(&none).unwrap().is_none());
    }

    #[test]
    fn latest_keeps_first_on_tie() {
        let first =
            revision(1, "20240115T090000Z").with_property(Property::text("SUMMARY", "first"));
        let second =
            revision(1, "20240115T090000Z").with_property(Property::text("SUMMARY", "second"));
        let items = [first, second];
        let latest = ComponentSequenceComparator::latest(&items).unwrap().unwrap();
        assert_eq!(latest.get_property("SUMMARY").and_then(Property::as_text), Some("first"));
    }

    #[test]
    fn key_properties_work_as_plain_slices() {
        let newer = RevisionKey::from((4, stamp(8))).to_properties();
        let older = RevisionKey::from((4, stamp(7))).to_properties();
        assert!(
            ComponentSequenceComparator::supersedes(newer.as_slice(), older.as_slice()).unwrap()
        );
        assert_eq!(RevisionKey::of(newer.as_slice()).unwrap(), RevisionKey::from((4, stamp(8))));
    }
}
