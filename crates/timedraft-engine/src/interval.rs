//! Time ranges and the interval arithmetic the resolver is built from.
//!
//! Two boundary rules apply throughout:
//!
//! - [`Interval::overlaps`] is strict: ranges that only touch (`a.end == b.start`)
//!   do not overlap.
//! - [`merge_intervals`] is inclusive: ranges that touch are coalesced, since
//!   back-to-back meetings leave no gap between them.

use chrono::TimeDelta;
use chrono_tz::Tz;

use crate::error::{AvailabilityError, Result};
use crate::instant::Instant;

/// A time range with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    start: Instant,
    end: Instant,
}

impl Interval {
    /// # Errors
    /// Returns [`AvailabilityError::InvalidRange`] if `start` is after `end`.
    pub fn new(start: Instant, end: Instant) -> Result<Self> {
        if start > end {
            return Err(AvailabilityError::InvalidRange(format!(
                "interval start {} is after end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// Build from two RFC 3339 strings, displayed in UTC.
    pub fn parse_rfc3339(start: &str, end: &str) -> Result<Self> {
        Self::new(
            Instant::parse_rfc3339(start, Tz::UTC)?,
            Instant::parse_rfc3339(end, Tz::UTC)?,
        )
    }

    pub(crate) fn ordered(start: Instant, end: Instant) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    pub fn start(&self) -> Instant {
        self.start
    }

    pub fn end(&self) -> Instant {
        self.end
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Whole minutes, truncated.
    pub fn duration_minutes(&self) -> i64 {
        self.duration().num_minutes()
    }

    /// Fractional minutes, not rounded.
    pub fn duration_minutes_exact(&self) -> f64 {
        self.duration().num_milliseconds() as f64 / 60_000.0
    }

    /// `true` when the exact duration is at least `min_minutes`.
    pub fn meets_minimum(&self, min_minutes: u32) -> bool {
        self.duration() >= TimeDelta::minutes(i64::from(min_minutes))
    }

    /// Strict overlap: `self.start < other.end && self.end > other.start`.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// The part of `self` inside `bounds`, or `None` if nothing of positive
    /// length remains. The result is displayed in the zone of `bounds`.
    pub fn clip_to(&self, bounds: &Interval) -> Option<Interval> {
        let start = self.start.max(bounds.start).in_zone(bounds.start.zone());
        let end = self.end.min(bounds.end).in_zone(bounds.end.zone());
        (start < end).then(|| Interval::ordered(start, end))
    }

    pub fn contains(&self, other: &Interval) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn with_zone(self, zone: Tz) -> Self {
        Self {
            start: self.start.in_zone(zone),
            end: self.end.in_zone(zone),
        }
    }
}

/// Sort and coalesce intervals into an ascending, non-overlapping sequence.
///
/// An interval whose start is `<=` the running end is absorbed, so touching
/// intervals merge. Consecutive output intervals satisfy `a.end < b.start`.
pub fn merge_intervals(intervals: &[Interval]) -> Vec<Interval> {
    if intervals.is_empty() {
        return Vec::new();
    }

    let mut sorted = intervals.to_vec();
    sorted.sort_by_key(|iv| iv.start);

    let mut merged: Vec<Interval> = Vec::with_capacity(sorted.len());
    for iv in sorted {
        if let Some(last) = merged.last_mut() {
            if iv.start <= last.end {
                if iv.end > last.end {
                    last.end = iv.end;
                }
                continue;
            }
        }
        merged.push(iv);
    }

    merged
}
