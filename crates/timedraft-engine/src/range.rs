//! Range presets and the inclusive calendar-date ranges they select.
//!
//! No clock is read here: relative presets are resolved against a `today`
//! supplied by the caller, already expressed in the source timezone.

use std::fmt;
use std::str::FromStr;

use chrono::{Days, NaiveDate, NaiveTime};
use chrono_tz::Tz;

use crate::dst::DstPolicy;
use crate::error::{AvailabilityError, Result};
use crate::instant::Instant;
use crate::interval::Interval;

/// Named shorthand for the span of dates to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangePreset {
    /// Today through seven days from today.
    #[default]
    OneWeek,
    /// Today through fourteen days from today.
    TwoWeeks,
    /// Explicit start and end dates.
    Custom,
}

impl RangePreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            RangePreset::OneWeek => "1w",
            RangePreset::TwoWeeks => "2w",
            RangePreset::Custom => "custom",
        }
    }

    /// Days added to `today` for relative presets.
    fn span_days(&self) -> Option<u64> {
        match self {
            RangePreset::OneWeek => Some(7),
            RangePreset::TwoWeeks => Some(14),
            RangePreset::Custom => None,
        }
    }
}

impl FromStr for RangePreset {
    type Err = AvailabilityError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "1w" => Ok(RangePreset::OneWeek),
            "2w" => Ok(RangePreset::TwoWeeks),
            "custom" => Ok(RangePreset::Custom),
            other => Err(AvailabilityError::InvalidPreset(format!(
                "'{}' (expected 1w, 2w or custom)",
                other
            ))),
        }
    }
}

impl fmt::Display for RangePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An inclusive range of calendar dates, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// # Errors
    /// Returns [`AvailabilityError::InvalidRange`] if `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(AvailabilityError::InvalidRange(format!(
                "start date {} is after end date {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// Resolve a preset to concrete dates.
    ///
    /// Custom dates are required for [`RangePreset::Custom`] and ignored otherwise.
    pub fn from_preset(
        preset: RangePreset,
        today: NaiveDate,
        custom_start: Option<&str>,
        custom_end: Option<&str>,
    ) -> Result<Self> {
        match preset.span_days() {
            Some(days) => {
                let end = today.checked_add_days(Days::new(days)).ok_or_else(|| {
                    AvailabilityError::InvalidRange(format!("{} + {} days overflows", today, days))
                })?;
                Self::new(today, end)
            }
            None => {
                let start = parse_date("customStartDate", custom_start)?;
                let end = parse_date("customEndDate", custom_end)?;
                Self::new(start, end)
            }
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Every date in the range, ascending.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take_while(move |d| *d <= self.end)
    }

    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Absolute `[timeMin, timeMax)` bounds of the range in `tz`: local
    /// midnight of the first day up to local midnight after the last day.
    pub fn time_bounds(&self, tz: Tz) -> Result<Interval> {
        let after_end = self.end.succ_opt().ok_or_else(|| {
            AvailabilityError::InvalidRange(format!("no date follows {}", self.end))
        })?;
        let start = local_midnight(self.start, tz)?;
        let end = local_midnight(after_end, tz)?;
        Interval::new(start, end)
    }
}

fn local_midnight(date: NaiveDate, tz: Tz) -> Result<Instant> {
    DstPolicy::ShiftForward
        .resolve(tz, date.and_time(NaiveTime::MIN))
        .map(Instant::from)
        .ok_or_else(|| {
            AvailabilityError::InvalidRange(format!("{} has no local midnight in {}", date, tz))
        })
}

fn parse_date(field: &str, value: Option<&str>) -> Result<NaiveDate> {
    let raw = value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AvailabilityError::InvalidRange(format!("{} is required", field)))?;
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| AvailabilityError::InvalidRange(format!("{} '{}': {}", field, raw, e)))
}
