//! Render free slots as reply text.
//!
//! ```text
//! Here are a few times that work for me over the next week (EST):
//!
//! Mon, Jan 8: 9:00 AM–10:00 AM, 10:30 AM–12:00 PM, 1:00 PM–5:00 PM
//! Tue, Jan 9: 9:00 AM–5:00 PM
//!
//! If none of these work, feel free to share a few times that do.
//! ```

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::{OffsetName, Tz};

use crate::freebusy::FreeSlotMap;
use crate::interval::Interval;
use crate::range::RangePreset;

/// Slots shown per date; later slots on a busy-free day are left out.
pub const MAX_BLOCKS_PER_DAY: usize = 10;

/// Returned instead of a slot listing when no date has free time.
pub const NO_FREE_TIME_MESSAGE: &str =
    "I'm fairly booked during this period. Could you share a few times that work for you?";

pub const CLOSING_LINE: &str = "If none of these work, feel free to share a few times that do.";

/// Format a free-slot map for `output_tz`.
///
/// Dates are listed in ascending order, each with at most
/// [`MAX_BLOCKS_PER_DAY`] of its earliest slots. The date label is taken from
/// the first shown slot's start as seen in `output_tz`, so a slot can be
/// labelled with a different calendar day than its source-zone key.
pub fn format_availability(slots: &FreeSlotMap, output_tz: Tz, preset: RangePreset) -> String {
    let first_slot = slots.iter().find_map(|(_, day)| day.first());
    let Some(first_slot) = first_slot else {
        return NO_FREE_TIME_MESSAGE.to_string();
    };

    let abbreviation = timezone_abbreviation(output_tz, first_slot.start().at());
    let mut text = header(preset, &abbreviation);

    for (_, day) in slots {
        let shown: Vec<Interval> = day
            .iter()
            .take(MAX_BLOCKS_PER_DAY)
            .map(|slot| slot.with_zone(output_tz))
            .collect();
        let Some(first) = shown.first() else {
            continue;
        };

        let label = first.start().local().format("%a, %b %-d");
        let ranges = shown
            .iter()
            .map(render_range)
            .collect::<Vec<_>>()
            .join(", ");
        text.push_str(&format!("{}: {}\n", label, ranges));
    }

    text.push('\n');
    text.push_str(CLOSING_LINE);
    text
}

fn header(preset: RangePreset, abbreviation: &str) -> String {
    match preset {
        RangePreset::OneWeek => format!(
            "Here are a few times that work for me over the next week ({}):\n\n",
            abbreviation
        ),
        RangePreset::TwoWeeks => format!(
            "Here are a few times that work for me over the next 2 weeks ({}):\n\n",
            abbreviation
        ),
        RangePreset::Custom => format!(
            "Here are a few times that work for me ({}):\n\n",
            abbreviation
        ),
    }
}

/// `start–end` on a 12-hour clock, in the slot's own display zone.
fn render_range(slot: &Interval) -> String {
    format!(
        "{}–{}",
        slot.start().local().format("%-I:%M %p"),
        slot.end().local().format("%-I:%M %p")
    )
}

/// Render one slot as `start–end` in `tz`, e.g. `9:00 AM–10:30 AM`.
pub fn format_time_slot(slot: &Interval, tz: Tz) -> String {
    render_range(&slot.with_zone(tz))
}

/// Abbreviation of `tz` in effect at `at` (e.g. `EST` vs `EDT`).
///
/// Zones without a lettered abbreviation fall back to the IANA name.
pub fn timezone_abbreviation(tz: Tz, at: DateTime<Utc>) -> String {
    tz.offset_from_utc_datetime(&at.naive_utc())
        .abbreviation()
        .map(str::to_string)
        .unwrap_or_else(|| tz.name().to_string())
}

/// Human-readable duration: `45 minutes`, `1 hour`, `2 hours 30 minutes`.
pub fn format_duration(minutes: i64) -> String {
    if minutes < 60 {
        return format!("{} minutes", minutes);
    }

    let hours = minutes / 60;
    let remaining = minutes % 60;
    let hour_label = if hours == 1 { "hour" } else { "hours" };

    if remaining == 0 {
        format!("{} {}", hours, hour_label)
    } else {
        format!("{} {} {} minutes", hours, hour_label, remaining)
    }
}
