//! # timedraft-engine
//!
//! Working-hours availability for drafting "here is when I'm free" replies.
//!
//! The engine turns a date range, daily working hours and a weekday filter
//! into one window per working day, subtracts the busy intervals reported by
//! a calendar, and renders what is left as human-readable text in the
//! recipient's timezone.
//!
//! ## Modules
//!
//! - [`instant`] — Absolute timestamps tagged with a display timezone
//! - [`interval`] — Time ranges, overlap/clip arithmetic, interval merging
//! - [`dst`] — How wall-clock window boundaries resolve across DST transitions
//! - [`range`] — Range presets (`1w`, `2w`, `custom`) → concrete date ranges
//! - [`window`] — Date range + working hours → one window per working day
//! - [`freebusy`] — Subtract busy intervals from windows → free slots per date
//! - [`format`] — Free slots → reply text
//! - [`config`] — Request payload and its validated, immutable form
//! - [`source`] — Busy-interval source and credential provider contracts
//! - [`pipeline`] — Request → windows → fetch → resolve → text
//! - [`error`] — Error types

pub mod config;
pub mod dst;
pub mod error;
pub mod format;
pub mod freebusy;
pub mod instant;
pub mod interval;
pub mod pipeline;
pub mod range;
pub mod source;
pub mod window;

pub use config::{AvailabilityConfig, AvailabilityRequest, WeekdaySet};
pub use dst::DstPolicy;
pub use error::{AvailabilityError, Result};
pub use format::{
    format_availability, format_duration, format_time_slot, timezone_abbreviation,
    MAX_BLOCKS_PER_DAY, NO_FREE_TIME_MESSAGE,
};
pub use freebusy::{busy_within, free_within, resolve_free_slots, FreeSlotMap};
pub use instant::Instant;
pub use interval::{merge_intervals, Interval};
pub use pipeline::{draft_availability, draft_with_config, AvailabilityReport};
pub use range::{DateRange, RangePreset};
pub use source::{
    fetch_with_refresh, parse_busy_document, BusySource, CredentialProvider, FreeBusyQuery,
    StaticBusySource, StaticCredentials,
};
pub use window::{build_daily_windows, windows_for_config, DailyWindow};
