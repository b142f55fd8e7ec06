//! Absolute points in time carrying a display timezone.
//!
//! Comparison, ordering and hashing look only at the absolute timestamp, so
//! two instants tagged with different zones are equal when they name the
//! same moment. The zone tag matters only when an instant is rendered.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Sub;

use chrono::{DateTime, TimeDelta, Utc};
use chrono_tz::Tz;

use crate::error::{AvailabilityError, Result};

#[derive(Debug, Clone, Copy)]
pub struct Instant {
    at: DateTime<Utc>,
    zone: Tz,
}

impl Instant {
    pub fn new(at: DateTime<Utc>, zone: Tz) -> Self {
        Self { at, zone }
    }

    /// An instant displayed in UTC, the shape busy intervals arrive in.
    pub fn utc(at: DateTime<Utc>) -> Self {
        Self::new(at, Tz::UTC)
    }

    /// Parse an RFC 3339 timestamp (any offset) and tag it with `zone`.
    pub fn parse_rfc3339(s: &str, zone: Tz) -> Result<Self> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| Self::new(dt.with_timezone(&Utc), zone))
            .map_err(|e| AvailabilityError::InvalidDatetime(format!("'{}': {}", s, e)))
    }

    pub fn at(&self) -> DateTime<Utc> {
        self.at
    }

    pub fn zone(&self) -> Tz {
        self.zone
    }

    /// Wall-clock view in the display zone.
    pub fn local(&self) -> DateTime<Tz> {
        self.at.with_timezone(&self.zone)
    }

    /// Same moment, displayed in another zone.
    pub fn in_zone(self, zone: Tz) -> Self {
        Self { zone, ..self }
    }
}

impl From<DateTime<Tz>> for Instant {
    fn from(dt: DateTime<Tz>) -> Self {
        Self::new(dt.with_timezone(&Utc), dt.timezone())
    }
}

impl PartialEq for Instant {
    fn eq(&self, other: &Self) -> bool {
        self.at == other.at
    }
}

impl Eq for Instant {}

impl PartialOrd for Instant {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Instant {
    fn cmp(&self, other: &Self) -> Ordering {
        self.at.cmp(&other.at)
    }
}

impl Hash for Instant {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.at.hash(state);
    }
}

impl Sub for Instant {
    type Output = TimeDelta;

    fn sub(self, rhs: Self) -> TimeDelta {
        self.at - rhs.at
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.local().to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn equality_ignores_display_zone() {
        let at = Utc.with_ymd_and_hms(2024, 1, 8, 15, 0, 0).unwrap();
        let a = Instant::utc(at);
        let b = Instant::new(at, chrono_tz::America::New_York);
        assert_eq!(a, b);
        assert_eq!(a.cmp(&b), Ordering::Equal);
    }

    #[test]
    fn local_view_follows_zone_tag() {
        let at = Utc.with_ymd_and_hms(2024, 1, 8, 15, 0, 0).unwrap();
        let ny = Instant::utc(at).in_zone(chrono_tz::America::New_York);
        assert_eq!(ny.local().to_rfc3339(), "2024-01-08T10:00:00-05:00");
        assert_eq!(ny.to_string(), "2024-01-08T10:00:00-05:00");
    }

    #[test]
    fn parse_rejects_garbage() {
        let err = Instant::parse_rfc3339("next tuesday", Tz::UTC).unwrap_err();
        assert!(matches!(err, AvailabilityError::InvalidDatetime(_)));
    }

    #[test]
    fn parse_normalizes_offset() {
        let i = Instant::parse_rfc3339("2024-01-08T10:00:00-05:00", Tz::UTC).unwrap();
        assert_eq!(i.at(), Utc.with_ymd_and_hms(2024, 1, 8, 15, 0, 0).unwrap());
    }
}
