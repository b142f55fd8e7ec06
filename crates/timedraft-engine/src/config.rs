//! The request payload and its validated, immutable form.
//!
//! [`AvailabilityRequest`] is the loosely-typed payload a front end submits
//! (strings for times, zones and dates). [`AvailabilityConfig::from_request`]
//! validates it in one pass, before any I/O, into the typed configuration the
//! rest of the pipeline consumes.

use chrono::{NaiveDate, NaiveTime, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::dst::DstPolicy;
use crate::error::{AvailabilityError, Result};
use crate::range::{DateRange, RangePreset};

/// Request payload, field names as sent by the UI layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AvailabilityRequest {
    /// `1w`, `2w` or `custom`.
    pub range_preset: String,
    /// `YYYY-MM-DD`; required iff the preset is `custom`.
    pub custom_start_date: Option<String>,
    pub custom_end_date: Option<String>,
    /// `HH:mm`, in the source timezone.
    pub daily_start_time: String,
    pub daily_end_time: String,
    /// Minimum free-slot length in minutes.
    pub min_duration: u32,
    /// 1=Monday through 7=Sunday.
    pub days_of_week: Vec<u8>,
    pub source_timezone: String,
    pub output_timezone: String,
}

impl Default for AvailabilityRequest {
    fn default() -> Self {
        Self {
            range_preset: RangePreset::OneWeek.as_str().to_string(),
            custom_start_date: None,
            custom_end_date: None,
            daily_start_time: "09:00".to_string(),
            daily_end_time: "17:00".to_string(),
            min_duration: 30,
            days_of_week: vec![1, 2, 3, 4, 5, 6, 7],
            source_timezone: "America/New_York".to_string(),
            output_timezone: "America/New_York".to_string(),
        }
    }
}

/// A non-empty set of enabled weekdays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    /// Build from weekday numbers (1=Monday .. 7=Sunday). Duplicates are fine.
    ///
    /// # Errors
    /// [`AvailabilityError::InvalidWeekday`] for a number outside 1..=7, or
    /// `InvalidWeekday(0)` for an empty list.
    pub fn from_numbers(numbers: &[u8]) -> Result<Self> {
        if numbers.is_empty() {
            return Err(AvailabilityError::InvalidWeekday(0));
        }
        let mut bits = 0u8;
        for &n in numbers {
            if !(1..=7).contains(&n) {
                return Err(AvailabilityError::InvalidWeekday(n));
            }
            bits |= 1 << (n - 1);
        }
        Ok(Self(bits))
    }

    pub fn all() -> Self {
        Self(0b111_1111)
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & (1 << day.num_days_from_monday()) != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// Validated configuration for one computation. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct AvailabilityConfig {
    date_range: DateRange,
    daily_start: NaiveTime,
    daily_end: NaiveTime,
    days_of_week: WeekdaySet,
    min_duration_minutes: u32,
    source_timezone: Tz,
    output_timezone: Tz,
    range_preset: RangePreset,
    dst_policy: DstPolicy,
}

impl AvailabilityConfig {
    /// Validate `request`, resolving relative presets against `today`
    /// (a date in the source timezone).
    pub fn from_request(request: &AvailabilityRequest, today: NaiveDate) -> Result<Self> {
        let range_preset: RangePreset = request.range_preset.parse()?;
        let source_timezone = parse_timezone(&request.source_timezone)?;
        let output_timezone = parse_timezone(&request.output_timezone)?;

        let date_range = DateRange::from_preset(
            range_preset,
            today,
            request.custom_start_date.as_deref(),
            request.custom_end_date.as_deref(),
        )?;

        let daily_start = parse_time(&request.daily_start_time)?;
        let daily_end = parse_time(&request.daily_end_time)?;
        if daily_start >= daily_end {
            return Err(AvailabilityError::InvalidTime(format!(
                "daily start {} must be before daily end {}",
                request.daily_start_time, request.daily_end_time
            )));
        }

        Ok(Self {
            date_range,
            daily_start,
            daily_end,
            days_of_week: WeekdaySet::from_numbers(&request.days_of_week)?,
            min_duration_minutes: request.min_duration,
            source_timezone,
            output_timezone,
            range_preset,
            dst_policy: DstPolicy::default(),
        })
    }

    pub fn with_dst_policy(self, dst_policy: DstPolicy) -> Self {
        Self { dst_policy, ..self }
    }

    pub fn date_range(&self) -> DateRange {
        self.date_range
    }

    pub fn daily_start(&self) -> NaiveTime {
        self.daily_start
    }

    pub fn daily_end(&self) -> NaiveTime {
        self.daily_end
    }

    pub fn days_of_week(&self) -> WeekdaySet {
        self.days_of_week
    }

    pub fn min_duration_minutes(&self) -> u32 {
        self.min_duration_minutes
    }

    pub fn source_timezone(&self) -> Tz {
        self.source_timezone
    }

    pub fn output_timezone(&self) -> Tz {
        self.output_timezone
    }

    pub fn range_preset(&self) -> RangePreset {
        self.range_preset
    }

    pub fn dst_policy(&self) -> DstPolicy {
        self.dst_policy
    }
}

/// Parse an IANA timezone string into `Tz`.
pub fn parse_timezone(s: &str) -> Result<Tz> {
    s.trim()
        .parse::<Tz>()
        .map_err(|_| AvailabilityError::InvalidTimezone(format!("'{}'", s)))
}

/// Parse an `HH:mm` time of day.
pub fn parse_time(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M")
        .map_err(|e| AvailabilityError::InvalidTime(format!("'{}': {}", s, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_set_maps_iso_numbers() {
        let set = WeekdaySet::from_numbers(&[1, 5, 5]).unwrap();
        assert!(set.contains(Weekday::Mon));
        assert!(set.contains(Weekday::Fri));
        assert!(!set.contains(Weekday::Sun));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn weekday_set_rejects_out_of_range_and_empty() {
        assert_eq!(
            WeekdaySet::from_numbers(&[0]),
            Err(AvailabilityError::InvalidWeekday(0))
        );
        assert_eq!(
            WeekdaySet::from_numbers(&[8]),
            Err(AvailabilityError::InvalidWeekday(8))
        );
        assert_eq!(
            WeekdaySet::from_numbers(&[]),
            Err(AvailabilityError::InvalidWeekday(0))
        );
    }

    #[test]
    fn all_contains_every_day() {
        assert_eq!(WeekdaySet::all().len(), 7);
        assert!(WeekdaySet::all().contains(Weekday::Sun));
    }

    #[test]
    fn parse_time_requires_hh_mm() {
        assert_eq!(
            parse_time("09:30").unwrap(),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap()
        );
        assert!(matches!(
            parse_time("9am"),
            Err(AvailabilityError::InvalidTime(_))
        ));
    }
}
