use chrono::{NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};
use chrono_tz::America::New_York;
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use timedraft_engine::{
    build_daily_windows, format_availability, resolve_free_slots, DateRange, DstPolicy, Instant,
    Interval, RangePreset, WeekdaySet,
};

/// Two weeks of 09:00-17:00 windows against a dense, unsorted busy list.
fn bench_two_weeks(c: &mut Criterion) {
    let range = DateRange::new(
        NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
        NaiveDate::from_ymd_opt(2024, 1, 22).unwrap(),
    )
    .unwrap();
    let windows = build_daily_windows(
        &range,
        NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
        WeekdaySet::all(),
        New_York,
        DstPolicy::default(),
    )
    .unwrap();

    let origin = Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap();
    let busy: Vec<Interval> = (0..600i64)
        .rev()
        .map(|i| {
            let start = origin + TimeDelta::minutes(i * 37);
            Interval::new(
                Instant::utc(start),
                Instant::utc(start + TimeDelta::minutes(25)),
            )
            .unwrap()
        })
        .collect();

    c.bench_function("resolve_two_weeks", |b| {
        b.iter(|| resolve_free_slots(black_box(&windows), black_box(&busy), 30))
    });

    let slots = resolve_free_slots(&windows, &busy, 30);
    c.bench_function("format_two_weeks", |b| {
        b.iter(|| format_availability(black_box(&slots), New_York, RangePreset::TwoWeeks))
    });
}

criterion_group!(benches, bench_two_weeks);
criterion_main!(benches);
