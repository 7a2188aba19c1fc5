//! Parse, render and parse again.
//!
//! Dates, floating and UTC values come back unchanged. Zoned values come back
//! floating, with the local fields they have in the system zone.

use chrono::TimeZone;
use chrono_tz::America::New_York;
use chrono_tz::Asia::Kolkata;

use crate::rfc::ical::adapter::TemporalAdapter;
use crate::rfc::ical::core::TemporalValue;
use crate::rfc::ical::expand::system_zone;
use crate::rfc::ical::parse::parse;

fn round_trip(input: &str) -> Result<TemporalValue, String> {
    let first = parse(input).map_err(|e| format!("First parse failed: {e}"))?;
    let text = first.to_string();
    let second = parse(&text).map_err(|e| format!("Second parse failed: {e}\n{text}"))?;

    if first != second {
        return Err(format!("Value mismatch: {first:?} vs {second:?}"));
    }
    if text != input {
        return Err(format!("Text mismatch: {input} vs {text}"));
    }
    Ok(second)
}

#[test]
fn round_trip_date() {
    let value = round_trip("19970714").expect("round trip should succeed");
    assert!(value.is_date());
}

#[test]
fn round_trip_floating() {
    let value = round_trip("19980118T230000").expect("round trip should succeed");
    assert!(value.is_floating());
}

#[test]
fn round_trip_utc() {
    let value = round_trip("19980119T070000Z").expect("round trip should succeed");
    assert!(value.is_utc());
}

#[test]
fn round_trip_leap_day_and_year_end() {
    round_trip("20240229").expect("round trip should succeed");
    round_trip("20241231T235959Z").expect("round trip should succeed");
    round_trip("00010101T000000").expect("round trip should succeed");
}

#[test]
fn round_trip_through_adapter() {
    for input in ["19970714", "19980118T230000", "19980119T070000Z"] {
        let adapter = TemporalAdapter::parse(input).expect("parse should succeed");
        let text = adapter.to_text().expect("text should render");
        let again = TemporalAdapter::parse(&text).expect("reparse should succeed");
        assert_eq!(adapter, again);
    }
}

#[test]
fn zoned_degrades_to_floating_in_system_zone() {
    for zone in [New_York, Kolkata] {
        let zoned = TemporalAdapter::parse_in_zone("19980119T020000", zone)
            .expect("parse should succeed");
        let value = zoned.value().expect("eager value");

        let reparsed = parse(&zoned.to_text().expect("text should render"))
            .expect("reparse should succeed");
        let TemporalValue::Floating(local) = reparsed else {
            panic!("expected a floating value, got {reparsed:?}");
        };
        assert_eq!(local, value.at_zone(system_zone()).naive_local());

        // anchoring the floating text in the system zone gives back the instant
        assert_eq!(
            system_zone().from_local_datetime(&local).earliest().map(|dt| dt.timestamp()),
            value.instant().map(|dt| dt.timestamp())
        );
    }
}
