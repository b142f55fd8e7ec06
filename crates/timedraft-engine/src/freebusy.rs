//! Compute free time slots by subtracting busy intervals from daily windows.
//!
//! Per window: keep busy intervals that strictly overlap it, clip them to the
//! window, merge them, then sweep a cursor from the window start emitting the
//! gaps. Gaps shorter than the minimum duration are dropped, and a date with
//! no remaining gaps is left out of the result entirely.

use std::collections::btree_map;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::interval::{merge_intervals, Interval};
use crate::window::DailyWindow;

/// Free slots keyed by calendar date (ascending). Every entry is non-empty,
/// sorted, pairwise disjoint, and each slot meets the minimum duration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FreeSlotMap(BTreeMap<NaiveDate, Vec<Interval>>);

impl FreeSlotMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of dates with free time.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, date: NaiveDate) -> Option<&[Interval]> {
        self.0.get(&date).map(Vec::as_slice)
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, NaiveDate, Vec<Interval>> {
        self.0.iter()
    }

    /// Total slots across all dates.
    pub fn slot_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    /// Set a date's slots, replacing any already recorded for it. Slots are
    /// kept in start order; an empty list removes the date.
    pub fn insert(&mut self, date: NaiveDate, mut slots: Vec<Interval>) {
        if slots.is_empty() {
            self.0.remove(&date);
            return;
        }
        slots.sort_by_key(|slot| slot.start());
        self.0.insert(date, slots);
    }
}

impl<'a> IntoIterator for &'a FreeSlotMap {
    type Item = (&'a NaiveDate, &'a Vec<Interval>);
    type IntoIter = btree_map::Iter<'a, NaiveDate, Vec<Interval>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Clip `busy` to `window`, keeping only intervals that strictly overlap it,
/// then merge. Returns sorted, non-touching busy blocks inside the window.
pub fn busy_within(window: &Interval, busy: &[Interval]) -> Vec<Interval> {
    let clipped: Vec<Interval> = busy
        .iter()
        .filter(|b| b.overlaps(window))
        .filter_map(|b| b.clip_to(window))
        .collect();

    merge_intervals(&clipped)
}

/// Every gap in `window` not covered by `busy`, without a minimum-duration filter.
pub fn free_within(window: &Interval, busy: &[Interval]) -> Vec<Interval> {
    let merged = busy_within(window, busy);

    let mut free = Vec::new();
    let mut cursor = window.start();

    for block in &merged {
        if cursor < block.start() {
            free.push(Interval::ordered(cursor, block.start()));
        }
        cursor = cursor.max(block.end());
    }

    // Trailing free time after the last busy block.
    if cursor < window.end() {
        free.push(Interval::ordered(cursor, window.end()));
    }

    free
}

/// Resolve the free slots of every window against one list of busy intervals.
///
/// `busy` may be unsorted, overlapping or duplicated. Slots shorter than
/// `min_duration_minutes` (compared exactly, not rounded) are dropped;
/// slots of exactly that length are kept.
pub fn resolve_free_slots(
    windows: &[DailyWindow],
    busy: &[Interval],
    min_duration_minutes: u32,
) -> FreeSlotMap {
    let mut map = FreeSlotMap::new();

    for window in windows {
        let slots: Vec<Interval> = free_within(window.as_interval(), busy)
            .into_iter()
            .filter(|slot| slot.meets_minimum(min_duration_minutes))
            .collect();

        debug!(
            date = %window.date(),
            slots = slots.len(),
            "resolved window"
        );
        map.insert(window.date(), slots);
    }

    map
}
