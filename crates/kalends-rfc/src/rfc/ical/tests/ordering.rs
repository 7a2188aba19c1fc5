//! Ordering across the four forms.

use std::cmp::Ordering;

use chrono_tz::America::New_York;
use chrono_tz::Europe::Berlin;
use chrono_tz::Tz;

use crate::rfc::ical::adapter::TemporalAdapter;
use crate::rfc::ical::core::TemporalValue;
use crate::rfc::ical::parse::parse;

fn value(text: &str) -> TemporalValue {
    parse(text).expect("fixture should parse")
}

fn zoned(text: &str, tz: Tz) -> TemporalValue {
    TemporalAdapter::parse_in_zone(text, tz)
        .and_then(TemporalAdapter::into_value)
        .expect("fixture should parse")
}

fn fixtures() -> Vec<TemporalValue> {
    vec![
        value("20240114"),
        value("20240115"),
        value("20240116"),
        value("20240115T000000"),
        value("20240115T093000"),
        value("20240115T093000Z"),
        value("20240115T235959Z"),
        zoned("20240115T093000", New_York),
        zoned("20240115T093000", Berlin),
        zoned("20240115T233000", New_York),
    ]
}

#[test]
fn exactly_one_relation_holds() {
    let values = fixtures();
    for a in &values {
        for b in &values {
            let relations = [
                TemporalAdapter::is_before(a, b),
                TemporalAdapter::is_after(a, b),
                TemporalAdapter::compare(a, b) == Ordering::Equal,
            ];
            assert_eq!(
                relations.iter().filter(|r| **r).count(),
                1,
                "{a:?} vs {b:?}: {relations:?}"
            );
            assert_eq!(a.compare(b), b.compare(a).reverse(), "{a:?} vs {b:?}");
        }
    }
}

#[test]
fn dates_use_calendar_order() {
    let date = value("20240115");

    // same calendar day in each value's own representation
    assert_eq!(date.compare(&value("20240115T235959Z")), Ordering::Equal);
    assert_eq!(date.compare(&zoned("20240115T233000", New_York)), Ordering::Equal);
    assert_eq!(date.compare(&value("20240115T093000")), Ordering::Equal);

    assert!(date.is_before(&value("20240116T000000Z")));
    assert!(date.is_after(&value("20240114T235959")));
}

#[test]
fn floating_values_ignore_zones() {
    let a = TemporalAdapter::parse("20240115T093000").expect("parse");
    let b = TemporalAdapter::parse("20240115T093000").expect("parse");
    let (va, vb) = (a.value().expect("value"), b.value().expect("value"));

    assert_eq!(TemporalAdapter::compare(va, vb), Ordering::Equal);
    // applying different zones afterwards does not change their ordering
    assert_ne!(
        a.to_local_time_in(New_York).expect("local"),
        b.to_local_time_in(Berlin).expect("local")
    );
    assert_eq!(TemporalAdapter::compare(va, vb), Ordering::Equal);
    assert_eq!(va.compare_in(vb, New_York), va.compare_in(vb, Berlin));
}

#[test]
fn instants_compare_across_zones() {
    let utc = value("20240115T143000Z");
    let new_york = zoned("20240115T093000", New_York);
    let berlin = zoned("20240115T093000", Berlin);

    assert_eq!(utc.compare(&new_york), Ordering::Equal);
    assert!(berlin.is_before(&new_york));
    assert!(new_york.is_after(&berlin));
}

#[test]
fn floating_meets_instant_in_given_zone() {
    let floating = value("20240115T093000");
    let utc = value("20240115T093000Z");

    assert_eq!(floating.compare_in(&utc, Tz::UTC), Ordering::Equal);
    assert_eq!(floating.compare_in(&utc, New_York), Ordering::Greater);
    assert_eq!(floating.compare_in(&utc, Berlin), Ordering::Less);
}
