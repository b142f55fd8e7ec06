//! Working-hours windows: one per enabled calendar day in a date range.

use chrono::{Datelike, NaiveDate, NaiveTime};
use chrono_tz::Tz;
use tracing::{debug, warn};

use crate::config::{AvailabilityConfig, WeekdaySet};
use crate::dst::DstPolicy;
use crate::error::{AvailabilityError, Result};
use crate::instant::Instant;
use crate::interval::Interval;
use crate::range::DateRange;

/// The configured working hours instantiated for one calendar date.
///
/// Invariant: `window_start < window_end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyWindow {
    date: NaiveDate,
    window: Interval,
}

impl DailyWindow {
    /// # Errors
    /// [`AvailabilityError::InvalidRange`] if the window has zero length.
    pub fn new(date: NaiveDate, window: Interval) -> Result<Self> {
        if window.start() >= window.end() {
            return Err(AvailabilityError::InvalidRange(format!(
                "window for {} is empty: {} to {}",
                date,
                window.start(),
                window.end()
            )));
        }
        Ok(Self { date, window })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// `YYYY-MM-DD`, the key used in a [`FreeSlotMap`](crate::freebusy::FreeSlotMap).
    pub fn date_key(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn window_start(&self) -> Instant {
        self.window.start()
    }

    pub fn window_end(&self) -> Instant {
        self.window.end()
    }

    pub fn as_interval(&self) -> &Interval {
        &self.window
    }
}

/// Build one window per day of `range` whose weekday is in `days`, with the
/// wall-clock `daily_start`/`daily_end` combined on that day in `tz`.
///
/// # Errors
///
/// - [`AvailabilityError::InvalidTime`] if `daily_start` is not before `daily_end`.
/// - [`AvailabilityError::EmptyWindowSet`] if no day qualifies.
pub fn build_daily_windows(
    range: &DateRange,
    daily_start: NaiveTime,
    daily_end: NaiveTime,
    days: WeekdaySet,
    tz: Tz,
    dst_policy: DstPolicy,
) -> Result<Vec<DailyWindow>> {
    if daily_start >= daily_end {
        return Err(AvailabilityError::InvalidTime(format!(
            "daily start {} must be before daily end {}",
            daily_start, daily_end
        )));
    }

    let mut windows = Vec::new();
    for date in range.days().filter(|d| days.contains(d.weekday())) {
        let start = dst_policy.resolve(tz, date.and_time(daily_start));
        let end = dst_policy.resolve(tz, date.and_time(daily_end));

        match (start, end) {
            (Some(start), Some(end)) if start < end => windows.push(DailyWindow {
                date,
                window: Interval::ordered(start.into(), end.into()),
            }),
            _ => warn!(%date, %tz, "working hours do not resolve to a valid window; skipping day"),
        }
    }

    if windows.is_empty() {
        return Err(AvailabilityError::EmptyWindowSet);
    }

    debug!(
        windows = windows.len(),
        days = range.num_days(),
        "built daily windows"
    );
    Ok(windows)
}

/// [`build_daily_windows`] driven by a validated config.
pub fn windows_for_config(config: &AvailabilityConfig) -> Result<Vec<DailyWindow>> {
    build_daily_windows(
        &config.date_range(),
        config.daily_start(),
        config.daily_end(),
        config.days_of_week(),
        config.source_timezone(),
        config.dst_policy(),
    )
}
