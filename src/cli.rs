//! CLI interface for shiftcover.
//!
//! Every subcommand is non-interactive: arguments in, output out. Pass
//! `--json` for machine-readable output; logs go to stderr either way.
//!
//! Shifts and coverage entries are referenced by full UUID or an
//! unambiguous prefix (e.g. `a3b`).

mod format;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use jiff::{Timestamp, ToSpan};
use jiff::civil::DateTime;
use serde::Serialize;
use uuid::Uuid;

use shiftcover::coverage::summarize;
use shiftcover::model::{RequestType, Shift, WindowSpec};
use shiftcover::record::{Export, ShiftDocument};
use shiftcover::roster::{self, SwapRequest};
use shiftcover::selection::CoverageChoice;
use shiftcover::storage::Storage;
use shiftcover::window::{self, Window};

use crate::config::Config;
use crate::identity;

use format::{format_entry, format_minutes, format_summary, format_window, short_id};

/// shiftcover: find the uncovered parts of a shift.
#[derive(Debug, Parser)]
#[command(name = "shiftcover", after_long_help = WORKFLOW_HELP)]
pub struct Cli {
    /// Print JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    pub command: Command,
}

const WORKFLOW_HELP: &str = r"Workflow: covering half a shift
  1. shiftcover shift add 2026-03-02 --start-time 09:00 --as dana
     → prints a shift ID (e.g. a3b0fc12)
  2. shiftcover request a3b --start-time 09:00 --end-time 21:00
  3. shiftcover cover a3b --from 09:00 --to 15:00 --as sam
  4. shiftcover shift show a3b --slots

Without a store:
  shiftcover summarize shift.json";

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage shifts: add, list, show, delete.
    Shift {
        #[command(subcommand)]
        command: ShiftCommand,
    },

    /// Ask to have a shift, or part of it, covered.
    ///
    /// Omitted fields fall back to the shift's own window. A window smaller
    /// than the shift makes the request partial unless `--type` says otherwise.
    Request {
        /// Shift ID or prefix.
        shift: String,

        /// Full or partial. Inferred from the window when omitted.
        #[arg(long = "type", value_enum)]
        request_type: Option<RequestTypeArg>,

        #[arg(long)]
        start_date: Option<String>,

        #[arg(long)]
        start_time: Option<String>,

        #[arg(long)]
        end_date: Option<String>,

        #[arg(long)]
        end_time: Option<String>,
    },

    /// Take coverage of an open request.
    ///
    /// Without `--from`/`--to` the whole requested window is taken. Times
    /// given as `HH:mm` are placed inside the requested window; use
    /// `YYYY-MM-DD HH:mm` to be explicit.
    Cover {
        /// Shift ID or prefix.
        shift: String,

        /// Who is covering: a user id, or an email address.
        /// When omitted, SHIFTCOVER_USER or the configured default is used.
        #[arg(long = "as")]
        person: Option<String>,

        #[arg(long, requires = "to")]
        from: Option<String>,

        #[arg(long, requires = "from")]
        to: Option<String>,
    },

    /// Cancel a shift's open request and the coverage taken against it.
    Cancel {
        /// Shift ID or prefix.
        shift: String,
    },

    /// Withdraw one coverage entry, reopening the request if needed.
    Withdraw {
        /// Coverage entry ID or prefix.
        coverage: String,
    },

    /// Counts per status and requested/covered time across open requests.
    Stats,

    /// Summarize a shift document without touching the roster.
    ///
    /// Reads `{ "shift": {...}, "coverage": [...] }` in the backend's record
    /// format and prints the coverage summary as JSON.
    Summarize {
        file: PathBuf,
    },

    /// Import a backend export (`{ "shifts": [...], "coverage": [...] }`).
    ///
    /// Records already in the roster are overwritten.
    Import {
        file: PathBuf,
    },
}

#[derive(Debug, Subcommand)]
pub enum ShiftCommand {
    /// Add a shift. Prints the shift ID.
    Add {
        /// Start date, `YYYY-MM-DD`.
        date: String,

        /// Whose shift this is. When omitted, SHIFTCOVER_USER or the
        /// configured default is used.
        #[arg(long = "as")]
        owner: Option<String>,

        /// Defaults to `default-start-time` from the config.
        #[arg(long)]
        start_time: Option<String>,

        /// Defaults to the start date; an end at or before the start rolls
        /// over to the next day.
        #[arg(long)]
        end_date: Option<String>,

        /// Defaults to the start time, making a 24-hour shift.
        #[arg(long)]
        end_time: Option<String>,
    },

    /// List shifts with their derived status.
    List,

    /// Show a shift, its coverage and what is still missing.
    Show {
        /// Shift ID or prefix.
        shift: String,

        /// List the start times a taker may pick inside each gap.
        #[arg(long)]
        slots: bool,
    },

    /// Delete a shift and its coverage.
    Delete {
        /// Shift ID or prefix.
        shift: String,
    },
}

/// CLI-facing request type, mapped to the domain `RequestType`.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RequestTypeArg {
    Full,
    Partial,
}

impl RequestTypeArg {
    fn to_domain(self) -> RequestType {
        match self {
            Self::Full => RequestType::Full,
            Self::Partial => RequestType::Partial,
        }
    }
}

/// Run the CLI, returning an error message on failure.
pub fn run(config: &Config, storage: &Storage) -> Result<(), String> {
    let cli = Cli::parse();
    let json = cli.json;

    match cli.command {
        Command::Shift { command } => match command {
            ShiftCommand::Add {
                date,
                owner,
                start_time,
                end_date,
                end_time,
            } => {
                let owner = identity::resolve_person(owner.as_deref(), config.default_user.as_deref())?;
                let start_time = start_time.unwrap_or_else(|| config.default_start_time.clone());
                let spec = WindowSpec {
                    start_date: Some(date),
                    end_time: Some(end_time.unwrap_or_else(|| start_time.clone())),
                    start_time: Some(start_time),
                    end_date,
                };
                cmd_add(storage, json, &owner, spec)
            }
            ShiftCommand::List => cmd_list(storage, json),
            ShiftCommand::Show { shift, slots } => {
                let shift = resolve_shift(storage, &shift)?;
                cmd_show(storage, json, &shift, slots.then_some(config.slot_minutes))
            }
            ShiftCommand::Delete { shift } => {
                let shift = resolve_shift(storage, &shift)?;
                storage
                    .delete_shift(shift.id)
                    .map_err(|e| format!("failed to delete shift: {e}"))?;
                println!("Deleted {}", short_id(&shift.id));
                Ok(())
            }
        },
        Command::Request {
            shift,
            request_type,
            start_date,
            start_time,
            end_date,
            end_time,
        } => {
            let shift = resolve_shift(storage, &shift)?;
            let request = SwapRequest {
                request_type: request_type.map(RequestTypeArg::to_domain),
                window: WindowSpec {
                    start_date,
                    start_time,
                    end_date,
                    end_time,
                },
            };
            cmd_request(storage, json, &shift, &request)
        }
        Command::Cover {
            shift,
            person,
            from,
            to,
        } => {
            let shift = resolve_shift(storage, &shift)?;
            let person =
                identity::resolve_person(person.as_deref(), config.default_user.as_deref())?;
            cmd_cover(storage, json, &shift, &person, from.as_deref().zip(to.as_deref()))
        }
        Command::Cancel { shift } => {
            let shift = resolve_shift(storage, &shift)?;
            let shift = roster::cancel_request(storage, shift.id).map_err(|e| e.to_string())?;
            if json {
                return print_json(&shift);
            }
            println!("Cancelled request on {}", short_id(&shift.id));
            Ok(())
        }
        Command::Withdraw { coverage } => cmd_withdraw(storage, json, &coverage),
        Command::Stats => cmd_stats(storage, json),
        Command::Summarize { file } => cmd_summarize(&file),
        Command::Import { file } => cmd_import(storage, json, &file),
    }
}

fn cmd_add(storage: &Storage, json: bool, owner: &str, spec: WindowSpec) -> Result<(), String> {
    if window::resolve(&spec).is_none() {
        return Err(format!(
            "shift window does not resolve: expected YYYY-MM-DD and HH:mm, got {}",
            format::format_spec(&spec)
        ));
    }

    let shift = Shift::new(Uuid::new_v4(), owner, spec);
    storage
        .create_shift(&shift)
        .map_err(|e| format!("failed to create shift: {e}"))?;

    if json {
        return print_json(&shift);
    }
    println!("{}", shift.id);
    Ok(())
}

fn cmd_list(storage: &Storage, json: bool) -> Result<(), String> {
    let overview = roster::overview(storage).map_err(|e| format!("failed to list shifts: {e}"))?;

    if json {
        let rows: Vec<_> = overview
            .iter()
            .map(|(shift, summary)| serde_json::json!({ "shift": shift, "summary": summary }))
            .collect();
        return print_json(&rows);
    }

    if overview.is_empty() {
        println!("No shifts");
        return Ok(());
    }

    for (shift, summary) in &overview {
        let window = window::resolve(&shift.window)
            .map_or_else(|| format::format_spec(&shift.window), |w| format_window(&w));
        println!(
            "{}  [{}]  {window}  {}",
            short_id(&shift.id),
            summary.status.as_str(),
            shift.original_user_id
        );
    }

    Ok(())
}

fn cmd_show(
    storage: &Storage,
    json: bool,
    shift: &Shift,
    step_minutes: Option<i64>,
) -> Result<(), String> {
    let entries = storage
        .list_coverage(shift.id)
        .map_err(|e| format!("failed to load coverage: {e}"))?;
    let summary = summarize(shift, &entries);

    if json {
        return print_json(&serde_json::json!({
            "shift": shift,
            "coverage": entries,
            "summary": summary,
        }));
    }

    println!(
        "Shift {}  [{}]  {}",
        short_id(&shift.id),
        summary.status.as_str(),
        shift.original_user_id
    );
    println!("{}", format_summary(&summary, step_minutes));
    if !entries.is_empty() {
        println!("Coverage:");
        for entry in &entries {
            println!("  {}", format_entry(entry));
        }
    }
    Ok(())
}

fn cmd_request(
    storage: &Storage,
    json: bool,
    shift: &Shift,
    request: &SwapRequest,
) -> Result<(), String> {
    let shift = roster::request_swap(storage, shift.id, request, Timestamp::now())
        .map_err(|e| e.to_string())?;

    if json {
        return print_json(&shift);
    }
    let summary = summarize(&shift, &[]);
    let window = summary
        .coverage_window
        .map_or_else(|| "unresolved window".to_string(), |w| format_window(&w));
    println!(
        "Requested {} coverage of {}: {window}",
        summary.request_type.as_str(),
        short_id(&shift.id)
    );
    Ok(())
}

fn cmd_cover(
    storage: &Storage,
    json: bool,
    shift: &Shift,
    person: &str,
    range: Option<(&str, &str)>,
) -> Result<(), String> {
    let choice = match range {
        None => CoverageChoice::Full,
        Some((from, to)) => {
            let entries = storage
                .list_coverage(shift.id)
                .map_err(|e| format!("failed to load coverage: {e}"))?;
            let within = summarize(shift, &entries).coverage_window;
            CoverageChoice::Partial(parse_range(from, to, within.as_ref())?)
        }
    };

    let acceptance = roster::accept_coverage(storage, shift.id, person, choice, Timestamp::now())
        .map_err(|e| e.to_string())?;

    if json {
        return print_json(&acceptance);
    }
    let summary = &acceptance.summary;
    let taken = window::resolve(&acceptance.entry.window)
        .map_or_else(|| format::format_spec(&acceptance.entry.window), |w| format_window(&w));
    println!("{person} covers {taken} ({})", short_id(&acceptance.entry.id));
    if summary.is_fully_covered {
        println!("Shift {} is fully covered", short_id(&shift.id));
    } else {
        println!(
            "Still missing {} across {} gap(s)",
            format_minutes(summary.total_minutes - summary.covered_minutes),
            summary.missing_segments.len()
        );
    }
    Ok(())
}

fn cmd_withdraw(storage: &Storage, json: bool, reference: &str) -> Result<(), String> {
    let id = resolve_coverage(storage, reference)?;
    let summary = roster::withdraw_coverage(storage, id).map_err(|e| e.to_string())?;

    if json {
        return print_json(&serde_json::json!({ "coverage": id, "summary": summary }));
    }
    println!("Withdrew {}", short_id(&id));
    if let Some(summary) = summary {
        println!("{}", format_summary(&summary, None));
    }
    Ok(())
}

fn cmd_stats(storage: &Storage, json: bool) -> Result<(), String> {
    let stats = roster::stats(storage).map_err(|e| format!("failed to compute stats: {e}"))?;

    if json {
        return print_json(&stats);
    }
    println!("Shifts: {}", stats.shifts);
    for (status, count) in &stats.by_status {
        println!("  {:<16} {count}", status.as_str());
    }
    println!("Open requests: {}", stats.open_requests);
    println!(
        "Covered: {} of {} requested",
        format_minutes(stats.covered_minutes),
        format_minutes(stats.requested_minutes)
    );
    if stats.skipped > 0 {
        println!("Skipped coverage entries: {}", stats.skipped);
    }
    Ok(())
}

fn cmd_summarize(file: &Path) -> Result<(), String> {
    let document: ShiftDocument = read_json(file)?;
    let shift = document.shift.into_shift();
    let entries: Vec<_> = document
        .coverage
        .into_iter()
        .map(|record| record.into_coverage())
        .collect();

    print_json(&summarize(&shift, &entries))
}

fn cmd_import(storage: &Storage, json: bool, file: &Path) -> Result<(), String> {
    let export: Export = read_json(file)?;
    let report = roster::import(storage, export)
        .map_err(|e| format!("failed to import {}: {e}", file.display()))?;

    if json {
        return print_json(&report);
    }
    println!(
        "Imported {} shifts and {} coverage entries",
        report.shifts, report.coverage
    );
    if report.unreferenced > 0 {
        println!(
            "Skipped {} coverage entries that name no shift",
            report.unreferenced
        );
    }
    Ok(())
}

/// Parse `YYYY-MM-DD HH:mm`, or `HH:mm` placed inside `within`.
///
/// A bare time lands on the window's start date, or the day after when
/// that would fall before the window starts.
fn parse_instant(raw: &str, within: Option<&Window>) -> Result<DateTime, String> {
    if let Some(at) = window::parse_datetime(raw) {
        return Ok(at);
    }
    let time = window::parse_time(raw)
        .ok_or_else(|| format!("invalid time '{raw}': expected HH:mm or YYYY-MM-DD HH:mm"))?;
    let within = within.ok_or("the requested window does not resolve; give full dates")?;

    let at = within.start.date().to_datetime(time);
    if at >= within.start {
        return Ok(at);
    }
    within
        .start
        .date()
        .tomorrow()
        .map(|date| date.to_datetime(time))
        .map_err(|e| format!("invalid time '{raw}': {e}"))
}

/// Parse `--from`/`--to` into a window. A bare `--to` time at or before
/// the start belongs to the next day, like a shift's own end.
fn parse_range(from: &str, to: &str, within: Option<&Window>) -> Result<Window, String> {
    let start = parse_instant(from, within)?;
    let mut end = parse_instant(to, within)?;
    if end <= start && window::parse_datetime(to).is_none() {
        end = end
            .checked_add(1.day())
            .map_err(|e| format!("invalid time '{to}': {e}"))?;
    }
    Ok(Window::new(start, end))
}

/// Resolve a shift reference (full UUID or unambiguous prefix) to a shift.
fn resolve_shift(storage: &Storage, reference: &str) -> Result<Shift, String> {
    // Try full UUID first.
    if let Ok(id) = reference.parse::<Uuid>() {
        return storage
            .load_shift(id)
            .map_err(|e| format!("shift not found: {e}"));
    }

    let shifts = storage
        .list_shifts()
        .map_err(|e| format!("failed to list shifts: {e}"))?;
    resolve_prefix(&shifts, |s| s.id, reference, "shifts").cloned()
}

/// Resolve a coverage reference (full UUID or unambiguous prefix) to its id.
fn resolve_coverage(storage: &Storage, reference: &str) -> Result<Uuid, String> {
    if let Ok(id) = reference.parse::<Uuid>() {
        return Ok(id);
    }

    let entries = storage
        .list_all_coverage()
        .map_err(|e| format!("failed to list coverage: {e}"))?;
    resolve_prefix(&entries, |e| e.id, reference, "coverage entries").map(|e| e.id)
}

fn resolve_prefix<'a, T>(
    items: &'a [T],
    id: impl Fn(&T) -> Uuid,
    reference: &str,
    noun: &str,
) -> Result<&'a T, String> {
    let matches: Vec<&T> = items
        .iter()
        .filter(|item| id(item).to_string().starts_with(reference))
        .collect();

    match matches.as_slice() {
        [] => Err(format!("no {noun} matching '{reference}'")),
        [only] => Ok(only),
        _ => {
            let ids: Vec<String> = matches.iter().map(|item| short_id(&id(item))).collect();
            Err(format!(
                "'{reference}' is ambiguous: matches {} {noun}: {}",
                matches.len(),
                ids.join(", ")
            ))
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(file: &Path) -> Result<T, String> {
    let contents =
        fs::read_to_string(file).map_err(|e| format!("failed to read {}: {e}", file.display()))?;
    serde_json::from_str(&contents).map_err(|e| format!("invalid JSON in {}: {e}", file.display()))
}

fn print_json(value: &impl Serialize) -> Result<(), String> {
    let out = serde_json::to_string_pretty(value)
        .map_err(|e| format!("failed to serialize output: {e}"))?;
    println!("{out}");
    Ok(())
}
