//! One request, end to end: validate → windows → fetch → resolve → format.
//!
//! Validation and window building run before the busy-interval source is
//! touched, so a bad request never costs a calendar round trip.

use chrono::NaiveDate;
use tracing::debug;

use crate::config::{AvailabilityConfig, AvailabilityRequest};
use crate::error::Result;
use crate::format::format_availability;
use crate::freebusy::{resolve_free_slots, FreeSlotMap};
use crate::source::{fetch_with_refresh, BusySource, CredentialProvider, FreeBusyQuery};
use crate::window::windows_for_config;

/// Outcome of a successful computation.
///
/// An empty `free_slots` is not an error: `text` then holds the
/// "fairly booked" reply.
#[derive(Debug, Clone, PartialEq)]
pub struct AvailabilityReport {
    pub text: String,
    pub free_slots: FreeSlotMap,
}

impl AvailabilityReport {
    pub fn has_free_time(&self) -> bool {
        !self.free_slots.is_empty()
    }
}

/// Compute and draft availability for `request`.
///
/// `today` anchors relative range presets and is a date in the request's
/// source timezone.
///
/// # Errors
///
/// Validation errors and [`EmptyWindowSet`](crate::AvailabilityError::EmptyWindowSet)
/// are raised before any fetch. Source and credential failures propagate as
/// reported; nothing partial is returned.
pub fn draft_availability<S, C>(
    request: &AvailabilityRequest,
    today: NaiveDate,
    source: &S,
    credentials: &mut C,
) -> Result<AvailabilityReport>
where
    S: BusySource + ?Sized,
    C: CredentialProvider + ?Sized,
{
    let config = AvailabilityConfig::from_request(request, today)?;
    draft_with_config(&config, source, credentials)
}

/// [`draft_availability`] for an already-validated config.
pub fn draft_with_config<S, C>(
    config: &AvailabilityConfig,
    source: &S,
    credentials: &mut C,
) -> Result<AvailabilityReport>
where
    S: BusySource + ?Sized,
    C: CredentialProvider + ?Sized,
{
    let windows = windows_for_config(config)?;
    let query = FreeBusyQuery::for_config(config)?;

    debug!(
        time_min = %query.time_min,
        time_max = %query.time_max,
        "fetching busy intervals"
    );
    let busy = fetch_with_refresh(source, credentials, &query)?;

    let free_slots = resolve_free_slots(&windows, &busy, config.min_duration_minutes());
    debug!(
        dates = free_slots.len(),
        slots = free_slots.slot_count(),
        "resolved availability"
    );

    let text = format_availability(
        &free_slots,
        config.output_timezone(),
        config.range_preset(),
    );

    Ok(AvailabilityReport { text, free_slots })
}
