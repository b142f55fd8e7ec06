//! Contracts for the collaborators that supply busy intervals and credentials.
//!
//! The engine itself performs no network I/O. A calendar integration
//! implements [`BusySource`] and [`CredentialProvider`]; [`fetch_with_refresh`]
//! is the one place a rejected credential is refreshed and the fetch retried,
//! exactly once.

use std::collections::BTreeMap;

use chrono_tz::Tz;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::config::AvailabilityConfig;
use crate::error::{AvailabilityError, Result};
use crate::instant::Instant;
use crate::interval::Interval;

/// Calendar id queried by the free/busy request.
pub const PRIMARY_CALENDAR: &str = "primary";

/// A free/busy query over `[time_min, time_max)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreeBusyQuery {
    pub time_min: Instant,
    pub time_max: Instant,
    pub time_zone: Tz,
}

impl FreeBusyQuery {
    /// Query covering every day of the configured range, in the source zone.
    pub fn for_config(config: &AvailabilityConfig) -> Result<Self> {
        let tz = config.source_timezone();
        let bounds = config.date_range().time_bounds(tz)?;
        Ok(Self {
            time_min: bounds.start(),
            time_max: bounds.end(),
            time_zone: tz,
        })
    }

    pub fn bounds(&self) -> Interval {
        Interval::ordered(self.time_min, self.time_max)
    }

    /// JSON body of a free/busy request for the primary calendar.
    pub fn to_request_body(&self) -> serde_json::Value {
        json!({
            "timeMin": self.time_min.to_string(),
            "timeMax": self.time_max.to_string(),
            "timeZone": self.time_zone.name(),
            "items": [{ "id": PRIMARY_CALENDAR }],
        })
    }
}

/// Supplies bearer tokens for the busy-interval source.
pub trait CredentialProvider {
    /// Obtain a token, prompting the user for consent if `interactive`.
    fn token(&mut self, interactive: bool) -> Result<String>;

    /// Forget a token the source rejected so the next call issues a new one.
    fn invalidate(&mut self, token: &str) -> Result<()>;
}

/// Reports busy intervals for a single calendar.
///
/// Implementations return intervals in absolute time, in any order, possibly
/// overlapping. A rejected credential is reported as
/// [`AvailabilityError::Authorization`]; any other failure as
/// [`AvailabilityError::UpstreamFetch`].
pub trait BusySource {
    fn fetch_busy(&self, query: &FreeBusyQuery, token: &str) -> Result<Vec<Interval>>;
}

/// Fetch busy intervals, refreshing the credential and retrying once if the
/// source rejects it. A second rejection is returned to the caller.
pub fn fetch_with_refresh<S, C>(
    source: &S,
    credentials: &mut C,
    query: &FreeBusyQuery,
) -> Result<Vec<Interval>>
where
    S: BusySource + ?Sized,
    C: CredentialProvider + ?Sized,
{
    let token = credentials.token(true)?;
    let busy = match source.fetch_busy(query, &token) {
        Err(AvailabilityError::Authorization(reason)) => {
            info!(%reason, "credential rejected; refreshing and retrying once");
            credentials.invalidate(&token)?;
            let fresh = credentials.token(true)?;
            source.fetch_busy(query, &fresh)?
        }
        other => other?,
    };

    debug!(busy = busy.len(), "fetched busy intervals");
    Ok(busy)
}

/// A source backed by intervals already in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticBusySource {
    intervals: Vec<Interval>,
}

impl StaticBusySource {
    pub fn new(intervals: Vec<Interval>) -> Self {
        Self { intervals }
    }
}

impl BusySource for StaticBusySource {
    /// Intervals overlapping the query bounds. The token is not checked.
    fn fetch_busy(&self, query: &FreeBusyQuery, _token: &str) -> Result<Vec<Interval>> {
        let bounds = query.bounds();
        Ok(self
            .intervals
            .iter()
            .filter(|iv| iv.overlaps(&bounds))
            .copied()
            .collect())
    }
}

/// A provider that always hands out the same token.
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    token: String,
}

impl StaticCredentials {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl CredentialProvider for StaticCredentials {
    fn token(&mut self, _interactive: bool) -> Result<String> {
        Ok(self.token.clone())
    }

    fn invalidate(&mut self, _token: &str) -> Result<()> {
        Ok(())
    }
}

#[derive(Deserialize)]
struct BusyEntry {
    start: String,
    end: String,
}

#[derive(Deserialize)]
struct CalendarBusy {
    #[serde(default)]
    busy: Vec<BusyEntry>,
    #[serde(default)]
    errors: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
struct FreeBusyResponse {
    calendars: BTreeMap<String, CalendarBusy>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: serde_json::Value,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BusyDocument {
    Bare(Vec<BusyEntry>),
    Error(ErrorResponse),
    Response(FreeBusyResponse),
}

/// Parse busy intervals from JSON.
///
/// Accepts either a free/busy API response (`calendars.primary.busy`) or a
/// bare array of `{"start": ..., "end": ...}` RFC 3339 pairs. A response
/// whose `calendars` lacks a primary calendar yields no intervals.
///
/// # Errors
///
/// - [`AvailabilityError::UpstreamFetch`] if the document is an API error
///   body, is not one of the accepted shapes, or the primary calendar
///   reports errors.
/// - [`AvailabilityError::InvalidDatetime`] for an unparseable timestamp.
/// - [`AvailabilityError::InvalidRange`] for an entry that ends before it starts.
pub fn parse_busy_document(json: &str) -> Result<Vec<Interval>> {
    let doc: BusyDocument = serde_json::from_str(json).map_err(|e| {
        AvailabilityError::UpstreamFetch(format!("malformed free/busy document: {}", e))
    })?;

    let entries = match doc {
        BusyDocument::Bare(entries) => entries,
        BusyDocument::Error(response) => {
            return Err(AvailabilityError::UpstreamFetch(format!(
                "calendar service returned an error: {}",
                response.error
            )));
        }
        BusyDocument::Response(mut response) => {
            match response.calendars.remove(PRIMARY_CALENDAR) {
                Some(calendar) if !calendar.errors.is_empty() => {
                    return Err(AvailabilityError::UpstreamFetch(format!(
                        "calendar '{}' reported errors: {}",
                        PRIMARY_CALENDAR,
                        serde_json::Value::from(calendar.errors)
                    )));
                }
                Some(calendar) => calendar.busy,
                None => Vec::new(),
            }
        }
    };

    entries
        .iter()
        .map(|e| Interval::parse_rfc3339(&e.start, &e.end))
        .collect()
}
