//! Tests for the busy-source contracts: credential refresh and document parsing.

use std::cell::{Cell, RefCell};

use chrono::{NaiveDate, TimeZone, Utc};
use timedraft_engine::{
    fetch_with_refresh, parse_busy_document, AvailabilityConfig, AvailabilityError,
    AvailabilityRequest, BusySource, CredentialProvider, FreeBusyQuery, Instant, Interval,
    Result, StaticBusySource, StaticCredentials,
};

// ── Helpers ─────────────────────────────────────────────────────────────────

/// Issues "token-1", "token-2", ... and records invalidations.
#[derive(Default)]
struct CountingCredentials {
    issued: u32,
    invalidated: Vec<String>,
}

impl CredentialProvider for CountingCredentials {
    fn token(&mut self, _interactive: bool) -> Result<String> {
        self.issued += 1;
        Ok(format!("token-{}", self.issued))
    }

    fn invalidate(&mut self, token: &str) -> Result<()> {
        self.invalidated.push(token.to_string());
        Ok(())
    }
}

/// Replays scripted results and records the tokens it was called with.
struct ScriptedSource {
    results: RefCell<Vec<Result<Vec<Interval>>>>,
    tokens: RefCell<Vec<String>>,
}

impl ScriptedSource {
    fn new(mut results: Vec<Result<Vec<Interval>>>) -> Self {
        results.reverse();
        Self {
            results: RefCell::new(results),
            tokens: RefCell::new(Vec::new()),
        }
    }
}

impl BusySource for ScriptedSource {
    fn fetch_busy(&self, _query: &FreeBusyQuery, token: &str) -> Result<Vec<Interval>> {
        self.tokens.borrow_mut().push(token.to_string());
        self.results
            .borrow_mut()
            .pop()
            .expect("source called more often than scripted")
    }
}

fn query() -> FreeBusyQuery {
    let config =
        AvailabilityConfig::from_request(&AvailabilityRequest::default(), day(8)).unwrap();
    FreeBusyQuery::for_config(&config).unwrap()
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
}

fn busy(d: u32, start_hour: u32, end_hour: u32) -> Interval {
    Interval::new(
        Instant::utc(Utc.with_ymd_and_hms(2024, 1, d, start_hour, 0, 0).unwrap()),
        Instant::utc(Utc.with_ymd_and_hms(2024, 1, d, end_hour, 0, 0).unwrap()),
    )
    .unwrap()
}

// ── fetch_with_refresh ──────────────────────────────────────────────────────

#[test]
fn success_uses_single_token() {
    let source = ScriptedSource::new(vec![Ok(vec![busy(8, 15, 16)])]);
    let mut credentials = CountingCredentials::default();

    let result = fetch_with_refresh(&source, &mut credentials, &query()).unwrap();

    assert_eq!(result, vec![busy(8, 15, 16)]);
    assert_eq!(credentials.issued, 1);
    assert!(credentials.invalidated.is_empty());
}

#[test]
fn rejected_token_is_refreshed_and_retried_once() {
    let source = ScriptedSource::new(vec![
        Err(AvailabilityError::Authorization("401".to_string())),
        Ok(vec![busy(8, 15, 16)]),
    ]);
    let mut credentials = CountingCredentials::default();

    let result = fetch_with_refresh(&source, &mut credentials, &query()).unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(credentials.invalidated, vec!["token-1"]);
    assert_eq!(*source.tokens.borrow(), vec!["token-1", "token-2"]);
}

#[test]
fn second_rejection_is_returned() {
    let source = ScriptedSource::new(vec![
        Err(AvailabilityError::Authorization("401".to_string())),
        Err(AvailabilityError::Authorization("401 again".to_string())),
    ]);
    let mut credentials = CountingCredentials::default();

    let err = fetch_with_refresh(&source, &mut credentials, &query()).unwrap_err();

    assert_eq!(err, AvailabilityError::Authorization("401 again".to_string()));
    assert_eq!(source.tokens.borrow().len(), 2);
}

#[test]
fn upstream_failure_is_not_retried() {
    let source = ScriptedSource::new(vec![Err(AvailabilityError::UpstreamFetch(
        "HTTP 500".to_string(),
    ))]);
    let mut credentials = CountingCredentials::default();

    let err = fetch_with_refresh(&source, &mut credentials, &query()).unwrap_err();

    assert!(matches!(err, AvailabilityError::UpstreamFetch(_)));
    assert_eq!(credentials.issued, 1);
}

#[test]
fn consent_failure_stops_before_fetch() {
    struct Denied;
    impl CredentialProvider for Denied {
        fn token(&mut self, _interactive: bool) -> Result<String> {
            Err(AvailabilityError::Authorization("user declined".to_string()))
        }
        fn invalidate(&mut self, _token: &str) -> Result<()> {
            Ok(())
        }
    }

    let called = Cell::new(false);
    struct Watch<'a>(&'a Cell<bool>);
    impl BusySource for Watch<'_> {
        fn fetch_busy(&self, _q: &FreeBusyQuery, _t: &str) -> Result<Vec<Interval>> {
            self.0.set(true);
            Ok(Vec::new())
        }
    }

    let err = fetch_with_refresh(&Watch(&called), &mut Denied, &query()).unwrap_err();
    assert!(matches!(err, AvailabilityError::Authorization(_)));
    assert!(!called.get());
}

// ── StaticBusySource ────────────────────────────────────────────────────────

#[test]
fn static_source_returns_intervals_inside_query() {
    // Default request: one week from Jan 8 in New York.
    let source = StaticBusySource::new(vec![busy(1, 15, 16), busy(8, 15, 16), busy(20, 15, 16)]);
    let mut credentials = StaticCredentials::new("fixed");

    let result = fetch_with_refresh(&source, &mut credentials, &query()).unwrap();

    assert_eq!(result, vec![busy(8, 15, 16)]);
}

#[test]
fn query_body_names_primary_calendar() {
    let body = query().to_request_body();

    assert_eq!(body["timeMin"], "2024-01-08T00:00:00-05:00");
    assert_eq!(body["timeMax"], "2024-01-16T00:00:00-05:00");
    assert_eq!(body["timeZone"], "America/New_York");
    assert_eq!(body["items"][0]["id"], "primary");
}

// ── parse_busy_document ─────────────────────────────────────────────────────

#[test]
fn parses_free_busy_response() {
    let json = r#"{
        "kind": "calendar#freeBusy",
        "timeMin": "2024-01-08T05:00:00Z",
        "timeMax": "2024-01-16T05:00:00Z",
        "calendars": {
            "primary": {
                "busy": [
                    {"start": "2024-01-08T15:00:00Z", "end": "2024-01-08T16:00:00Z"},
                    {"start": "2024-01-09T10:00:00-05:00", "end": "2024-01-09T11:00:00-05:00"}
                ]
            }
        }
    }"#;

    let intervals = parse_busy_document(json).unwrap();

    assert_eq!(intervals, vec![busy(8, 15, 16), busy(9, 15, 16)]);
}

#[test]
fn parses_bare_array() {
    let json = r#"[{"start": "2024-01-08T15:00:00Z", "end": "2024-01-08T16:00:00Z"}]"#;
    assert_eq!(parse_busy_document(json).unwrap(), vec![busy(8, 15, 16)]);
}

#[test]
fn response_without_primary_calendar_is_empty() {
    let json = r#"{"calendars": {"someone@example.com": {"busy": []}}}"#;
    assert!(parse_busy_document(json).unwrap().is_empty());
}

#[test]
fn api_error_body_is_upstream_failure() {
    let json = r#"{"error": {"code": 401, "message": "Request had invalid authentication credentials."}}"#;
    let err = parse_busy_document(json).unwrap_err();
    assert!(
        matches!(err, AvailabilityError::UpstreamFetch(ref msg) if msg.contains("401")),
        "{:?}",
        err
    );
}

#[test]
fn object_without_calendars_is_upstream_failure() {
    let json = r#"{"items": [{"start": "2024-01-08T15:00:00Z", "end": "2024-01-08T16:00:00Z"}]}"#;
    assert!(matches!(
        parse_busy_document(json),
        Err(AvailabilityError::UpstreamFetch(_))
    ));
}

#[test]
fn calendar_errors_are_upstream_failures() {
    let json = r#"{"calendars": {"primary": {"errors": [{"domain": "global", "reason": "notFound"}]}}}"#;
    assert!(matches!(
        parse_busy_document(json),
        Err(AvailabilityError::UpstreamFetch(_))
    ));
}

#[test]
fn malformed_document_is_upstream_failure() {
    assert!(matches!(
        parse_busy_document("<html>502 Bad Gateway</html>"),
        Err(AvailabilityError::UpstreamFetch(_))
    ));
}

#[test]
fn bad_timestamp_is_invalid_datetime() {
    let json = r#"[{"start": "tomorrow", "end": "2024-01-08T16:00:00Z"}]"#;
    assert!(matches!(
        parse_busy_document(json),
        Err(AvailabilityError::InvalidDatetime(_))
    ));
}
