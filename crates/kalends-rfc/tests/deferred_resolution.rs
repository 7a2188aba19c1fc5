//! Deferred zone resolution shared across threads.
//!
//! These tests use their own resolver instances so they do not depend on
//! aliases registered by other tests in the process.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono_tz::Tz;
use kalends_rfc::error::RfcError;
use kalends_rfc::rfc::ical::core::Parameter;
use kalends_rfc::rfc::ical::expand::{ConversionError, TimeZoneResolver, ZoneRuleResolver};
use kalends_rfc::rfc::ical::{Component, Property, TemporalAdapter, TzId};

/// Resolver that counts lookups before delegating.
struct CountingResolver {
    inner: TimeZoneResolver,
    lookups: AtomicUsize,
}

impl ZoneRuleResolver for CountingResolver {
    fn resolve(&self, tzid: &str) -> Result<Tz, ConversionError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.resolve(tzid)
    }
}

#[test]
fn racing_readers_observe_one_value() {
    let resolver = Arc::new(CountingResolver {
        inner: TimeZoneResolver::new(),
        lookups: AtomicUsize::new(0),
    });
    let adapter = TemporalAdapter::parse_deferred(
        "20240115T093000",
        TzId::with_resolver("Europe/Berlin", resolver.clone()),
    );

    let seen: Vec<usize> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    let value = adapter.value().expect("value should resolve");
                    std::ptr::from_ref(value) as usize
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("reader should not panic"))
            .collect()
    });

    assert!(seen.windows(2).all(|pair| pair[0] == pair[1]));
    assert!(adapter.is_resolved());

    let lookups = resolver.lookups.load(Ordering::SeqCst);
    assert!((1..=8).contains(&lookups), "lookups: {lookups}");

    // resolved; further reads do not consult the resolver
    adapter.value().expect("value should resolve");
    assert_eq!(resolver.lookups.load(Ordering::SeqCst), lookups);
}

#[test]
fn alias_registered_later_is_picked_up() {
    let resolver = Arc::new(TimeZoneResolver::new());
    let item = Component::event().with_property(
        Property::parse_temporal(
            "DTSTART",
            vec![Parameter::tzid("Team Zone")],
            "20240115T093000",
        )
        .expect("floating text parses"),
    );

    // the property built above used the shared resolver; build one bound to ours
    let adapter = TemporalAdapter::parse_deferred(
        "20240115T093000",
        TzId::with_resolver("Team Zone", resolver.clone()),
    );
    assert!(matches!(
        adapter.value(),
        Err(RfcError::ZoneResolutionError(ConversionError::UnknownTimezone(_)))
    ));

    resolver.register_alias("Team Zone", Tz::Asia__Tokyo);
    std::thread::scope(|scope| {
        scope.spawn(|| {
            assert_eq!(
                adapter.value().expect("alias is now known").tz(),
                Some(Tz::Asia__Tokyo)
            );
        });
    });

    let dtstart = item
        .get_property("DTSTART")
        .and_then(Property::as_temporal)
        .expect("DTSTART is temporal");
    assert!(!dtstart.is_resolved());
    TimeZoneResolver::shared().register_alias("Team Zone", Tz::Asia__Tokyo);
    assert_eq!(
        dtstart.value().expect("shared alias is now known").tz(),
        Some(Tz::Asia__Tokyo)
    );
}
