//! DST handling for wall-clock window boundaries.

use chrono::{DateTime, LocalResult, NaiveDateTime, TimeDelta, TimeZone};
use chrono_tz::Tz;

/// Longest DST gap searched when shifting forward.
const MAX_GAP_MINUTES: i64 = 180;

/// Policy for a working-hours boundary that falls in a DST gap
/// (e.g., 02:30 on a spring-forward night).
///
/// Ambiguous wall-clock times (fall back) always resolve to the earlier instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DstPolicy {
    /// Move to the first valid local time after the gap.
    #[default]
    ShiftForward,
    /// Drop the day's window.
    Skip,
}

impl DstPolicy {
    /// Resolve a wall-clock datetime in `tz` to an absolute instant.
    ///
    /// Returns `None` when the time is in a gap and the policy is [`DstPolicy::Skip`],
    /// or when no valid time exists within [`MAX_GAP_MINUTES`] after it.
    pub fn resolve(self, tz: Tz, local: NaiveDateTime) -> Option<DateTime<Tz>> {
        match tz.from_local_datetime(&local) {
            LocalResult::Single(dt) => Some(dt),
            LocalResult::Ambiguous(earlier, _) => Some(earlier),
            LocalResult::None => match self {
                DstPolicy::Skip => None,
                DstPolicy::ShiftForward => (1..=MAX_GAP_MINUTES).find_map(|m| {
                    tz.from_local_datetime(&(local + TimeDelta::minutes(m)))
                        .earliest()
                }),
            },
        }
    }
}
