//! `timedraft` CLI — draft an availability reply from free/busy data.
//!
//! ## Usage
//!
//! ```sh
//! # Draft from a free/busy response on stdin, default request (next week, 9-5)
//! timedraft draft < freebusy.json
//!
//! # Explicit request payload and busy file
//! timedraft draft --request request.json --busy freebusy.json
//!
//! # Pin "today" for relative presets
//! timedraft draft --request request.json --busy freebusy.json --today 2024-01-08
//!
//! # Free slots as JSON instead of text
//! timedraft draft --busy freebusy.json --json
//!
//! # List the working windows a request produces
//! timedraft windows --request request.json
//! ```
//!
//! Set `RUST_LOG=timedraft=debug` to trace each stage on stderr.

use std::collections::BTreeMap;
use std::io::{self, Read};
use std::process;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use serde::Serialize;
use timedraft_engine::config::parse_timezone;
use timedraft_engine::{
    draft_with_config, parse_busy_document, windows_for_config, AvailabilityConfig,
    AvailabilityError, AvailabilityRequest, FreeSlotMap, StaticBusySource, StaticCredentials,
};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "timedraft",
    version,
    about = "Draft availability replies from calendar free/busy data"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute free slots and print the drafted reply
    Draft {
        /// Request payload JSON (defaults apply if omitted)
        #[arg(short, long)]
        request: Option<String>,
        /// Free/busy JSON file, or "-" for stdin (reads stdin if omitted)
        #[arg(short, long)]
        busy: Option<String>,
        /// Date treated as today in the source timezone (YYYY-MM-DD)
        #[arg(long)]
        today: Option<NaiveDate>,
        /// Print the free-slot map as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List the working windows a request produces
    Windows {
        /// Request payload JSON (defaults apply if omitted)
        #[arg(short, long)]
        request: Option<String>,
        /// Date treated as today in the source timezone (YYYY-MM-DD)
        #[arg(long)]
        today: Option<NaiveDate>,
    },
}

/// One free slot, rendered in the output timezone.
#[derive(Serialize)]
struct FreeSlotDto {
    start: String,
    end: String,
    duration_minutes: i64,
}

fn main() {
    init_tracing();

    if let Err(err) = run(Cli::parse()) {
        match err.downcast_ref::<AvailabilityError>() {
            Some(domain) => eprintln!("Error: {}", domain.user_message()),
            None => eprintln!("Error: {:#}", err),
        }
        process::exit(1);
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "timedraft=info,timedraft_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Draft {
            request,
            busy,
            today,
            json,
        } => {
            let request = load_request(request.as_deref())?;
            let today = resolve_today(today, &request)?;

            // Reject bad ranges and empty weekday selections before touching input.
            let config = AvailabilityConfig::from_request(&request, today)?;
            windows_for_config(&config)?;

            let busy_json = read_input(busy.as_deref())?;
            let intervals = parse_busy_document(&busy_json)?;
            debug!(busy = intervals.len(), "loaded busy intervals");

            let source = StaticBusySource::new(intervals);
            let mut credentials = StaticCredentials::new("local");
            let report = draft_with_config(&config, &source, &mut credentials)?;

            if json {
                let dto = slots_to_dto(&report.free_slots, config.output_timezone());
                println!("{}", serde_json::to_string_pretty(&dto)?);
            } else {
                println!("{}", report.text);
            }
        }
        Commands::Windows { request, today } => {
            let request = load_request(request.as_deref())?;
            let today = resolve_today(today, &request)?;
            let config = AvailabilityConfig::from_request(&request, today)?;

            for window in windows_for_config(&config)? {
                println!(
                    "{} {} {}",
                    window.date_key(),
                    window.window_start(),
                    window.window_end()
                );
            }
        }
    }

    Ok(())
}

fn load_request(path: Option<&str>) -> Result<AvailabilityRequest> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read request file: {}", path))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse request payload: {}", path))
        }
        None => Ok(AvailabilityRequest::default()),
    }
}

/// `--today`, or the current date in the request's source timezone.
fn resolve_today(today: Option<NaiveDate>, request: &AvailabilityRequest) -> Result<NaiveDate> {
    match today {
        Some(date) => Ok(date),
        None => {
            let tz = parse_timezone(&request.source_timezone)?;
            Ok(Utc::now().with_timezone(&tz).date_naive())
        }
    }
}

fn slots_to_dto(slots: &FreeSlotMap, output_tz: Tz) -> BTreeMap<String, Vec<FreeSlotDto>> {
    slots
        .iter()
        .map(|(date, day)| {
            let rendered = day
                .iter()
                .map(|slot| {
                    let slot = slot.with_zone(output_tz);
                    FreeSlotDto {
                        start: slot.start().to_string(),
                        end: slot.end().to_string(),
                        duration_minutes: slot.duration_minutes(),
                    }
                })
                .collect();
            (date.format("%Y-%m-%d").to_string(), rendered)
        })
        .collect()
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) if path != "-" => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}
