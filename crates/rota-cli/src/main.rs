//! `rota` CLI — manage staff, events and assignments, and query availability.
//!
//! All state lives in a single JSON data file (`--data`, default `rota.json`).
//! Instants may be given as RFC 3339 or as naive local times, which are read
//! in `--tz` (default `UTC`); output is rendered in the same zone.
//!
//! ## Usage
//!
//! ```sh
//! # Create staff
//! rota staff add --name Alice --email alice@example.com --designation Nurse
//!
//! # Create an event assigned to staff 1 and 2
//! rota event create --title "Ward round" --start 2026-03-16T09:30 --end 2026-03-16T10:30 --assign 1,2
//!
//! # Search events by title, description or assignee designation
//! rota event list --search nurse
//!
//! # Who is free between 09:00 and 11:00 Brisbane time, with free slots
//! rota --tz Australia/Brisbane availability --start 2026-03-16T09:00 --end 2026-03-16T11:00 --slots
//!
//! # Pin an event to completed
//! rota event complete 1
//! ```

mod config;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rota_engine::api::{self, EventQuery};
use rota_engine::model::{EventDraft, EventType, StaffDraft};
use rota_engine::{AvailabilityOptions, InMemoryStore, RotaError};
use serde::Serialize;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use config::Config;

#[derive(Parser)]
#[command(
    name = "rota",
    version,
    about = "Staff rostering and availability CLI"
)]
struct Cli {
    /// JSON data file holding staff, events and assignments
    #[arg(long, global = true, env = "ROTA_DATA", default_value = "rota.json")]
    data: PathBuf,

    /// IANA timezone for naive input and for output (e.g. Australia/Brisbane)
    #[arg(long, global = true, env = "ROTA_TZ", default_value = "UTC")]
    tz: String,

    /// Derive event status as of this instant instead of the current time
    #[arg(long, global = true)]
    now: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage staff members
    Staff {
        #[command(subcommand)]
        command: StaffCommand,
    },
    /// Manage events and their assignments
    Event {
        #[command(subcommand)]
        command: EventCommand,
    },
    /// Show which staff are busy in a window and when they are next free
    Availability {
        /// Window start (inclusive)
        #[arg(long)]
        start: Option<String>,
        /// Window end (exclusive)
        #[arg(long)]
        end: Option<String>,
        /// Include free slots inside the window
        #[arg(long)]
        slots: bool,
    },
    /// List double bookings for a staff member
    Conflicts {
        staff_id: u64,
    },
}

#[derive(Subcommand)]
enum StaffCommand {
    /// Create a staff member
    Add(StaffArgs),
    /// List all staff members
    List,
    /// Replace a staff member's details
    Update {
        id: u64,
        #[command(flatten)]
        fields: StaffArgs,
    },
    /// Delete a staff member and all of their assignments
    Delete { id: u64 },
}

#[derive(Args)]
struct StaffArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    designation: String,
}

#[derive(Subcommand)]
enum EventCommand {
    /// Create an event
    Create(EventArgs),
    /// List events sorted by start time
    List {
        /// Case-insensitive match on title, description or assignee designation
        #[arg(long)]
        search: Option<String>,
        /// Only events overlapping [from, to)
        #[arg(long, requires = "to")]
        from: Option<String>,
        #[arg(long, requires = "from")]
        to: Option<String>,
    },
    /// Show one event with its assignees
    Show { id: u64 },
    /// Replace an event's details and its full assignee list
    Update {
        id: u64,
        #[command(flatten)]
        fields: EventArgs,
    },
    /// Delete an event and its assignments
    Delete { id: u64 },
    /// Mark an event completed (cannot be undone)
    Complete { id: u64 },
    /// Assign a staff member to an event
    Assign {
        id: u64,
        #[arg(long)]
        staff: u64,
    },
    /// Remove a staff member from an event
    Unassign {
        id: u64,
        #[arg(long)]
        staff: u64,
    },
}

#[derive(Args)]
struct EventArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    start: String,
    #[arg(long)]
    end: String,
    /// regular or holiday
    #[arg(long = "type", default_value = "regular")]
    event_type: String,
    /// Comma-separated staff ids
    #[arg(long, value_delimiter = ',')]
    assign: Vec<u64>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            // Bad input exits with 2, everything else with 1.
            let client_error = err
                .chain()
                .find_map(|cause| cause.downcast_ref::<RotaError>())
                .is_some_and(RotaError::is_client_error);
            ExitCode::from(if client_error { 2 } else { 1 })
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::resolve(cli.data, &cli.tz, cli.now.as_deref())?;
    let presenter = config.presenter();
    let mut store = load_store(&config.data_path)?;

    match cli.command {
        Commands::Staff { command } => match command {
            StaffCommand::Add(fields) => {
                let member = store.create_staff(fields.into_draft())?;
                save_store(&config.data_path, &store)?;
                print_json(&presenter.staff(&member))?;
            }
            StaffCommand::List => {
                let views: Vec<_> = store
                    .list_staff()
                    .into_iter()
                    .map(|m| presenter.staff(m))
                    .collect();
                print_json(&views)?;
            }
            StaffCommand::Update { id, fields } => {
                let member = store.update_staff(id, fields.into_draft())?;
                save_store(&config.data_path, &store)?;
                print_json(&presenter.staff(&member))?;
            }
            StaffCommand::Delete { id } => {
                let member = store.delete_staff(id)?;
                save_store(&config.data_path, &store)?;
                print_json(&json!({ "success": true, "deleted": presenter.staff(&member) }))?;
            }
        },
        Commands::Event { command } => match command {
            EventCommand::Create(fields) => {
                let draft = fields.into_draft(&config)?;
                let event = store.create_event(draft)?;
                save_store(&config.data_path, &store)?;
                print_json(&presenter.event(&store, &event, config.now)?)?;
            }
            EventCommand::List { search, from, to } => {
                let range = match (from, to) {
                    (Some(from), Some(to)) => Some(api::parse_window(
                        Some(from.as_str()),
                        Some(to.as_str()),
                        config.timezone,
                    )?),
                    _ => None,
                };
                let query = EventQuery {
                    text: search,
                    range,
                };
                print_json(&api::search_events(&store, &query, config.now, &presenter)?)?;
            }
            EventCommand::Show { id } => {
                let event = store.get_event(id)?;
                print_json(&presenter.event(&store, event, config.now)?)?;
            }
            EventCommand::Update { id, fields } => {
                let draft = fields.into_draft(&config)?;
                let event = store.update_event(id, draft)?;
                save_store(&config.data_path, &store)?;
                print_json(&presenter.event(&store, &event, config.now)?)?;
            }
            EventCommand::Delete { id } => {
                store.delete_event(id)?;
                save_store(&config.data_path, &store)?;
                print_json(&json!({ "message": "Event deleted successfully", "id": id }))?;
            }
            EventCommand::Complete { id } => {
                let event = store.complete_event(id)?;
                save_store(&config.data_path, &store)?;
                print_json(&presenter.event(&store, &event, config.now)?)?;
            }
            EventCommand::Assign { id, staff } => {
                store.assign(id, staff)?;
                save_store(&config.data_path, &store)?;
                let event = store.get_event(id)?;
                print_json(&presenter.event(&store, event, config.now)?)?;
            }
            EventCommand::Unassign { id, staff } => {
                let removed = store.unassign(id, staff)?;
                save_store(&config.data_path, &store)?;
                print_json(&json!({ "success": true, "deletedCount": removed }))?;
            }
        },
        Commands::Availability { start, end, slots } => {
            let entries = api::query_availability(
                &store,
                start.as_deref(),
                end.as_deref(),
                AvailabilityOptions {
                    include_free_slots: slots,
                },
                &presenter,
            )?;
            print_json(&entries)?;
        }
        Commands::Conflicts { staff_id } => {
            print_json(&api::staff_conflicts(&store, staff_id, &presenter)?)?;
        }
    }

    Ok(())
}

impl StaffArgs {
    fn into_draft(self) -> StaffDraft {
        StaffDraft {
            name: self.name,
            email: self.email,
            designation: self.designation,
        }
    }
}

impl EventArgs {
    fn into_draft(self, config: &Config) -> Result<EventDraft> {
        let start = api::parse_param("start", Some(self.start.as_str()), config.timezone)?;
        let end = api::parse_param("end", Some(self.end.as_str()), config.timezone)?;
        let event_type: EventType = self.event_type.parse()?;
        Ok(EventDraft {
            title: self.title,
            description: self.description,
            event_type,
            start,
            end,
            staff_ids: self.assign,
        })
    }
}

/// Load the store from `path`. A missing file is an empty store.
fn load_store(path: &Path) -> Result<InMemoryStore> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "data file not found, starting empty");
        return Ok(InMemoryStore::new());
    }
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read data file: {}", path.display()))?;
    InMemoryStore::from_json(&json)
        .with_context(|| format!("Failed to parse data file: {}", path.display()))
}

/// Write the store to `path` through a sibling temp file and a rename.
fn save_store(path: &Path, store: &InMemoryStore) -> Result<()> {
    let json = store.to_json().context("Failed to serialize store")?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json)
        .with_context(|| format!("Failed to write file: {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("Failed to replace data file: {}", path.display()))?;
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let pretty = serde_json::to_string_pretty(value)?;
    println!("{}", pretty);
    Ok(())
}
