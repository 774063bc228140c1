//! notification-analytics CLI - charts and CSV exports from the event log
//!
//! Usage:
//!   notification-analytics run [--database <db>] [--output-dir <dir>] [--as-of <ts>] [--format text|json]
//!   notification-analytics summary [--as-of <ts>]
//!   notification-analytics recent [--limit 5]
//!   notification-analytics queries [--dialect sqlite|mysql]
//!   notification-analytics list
//!   notification-analytics init
//!
//! Examples:
//!   notification-analytics run --database notifications.db --output-dir analytics_output
//!   notification-analytics summary --as-of "2026-10-19 12:00:00" --format json
//!   notification-analytics queries --dialect mysql

use chrono::{NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand, ValueEnum};
use notification_analytics::config::{Settings, StoreConfig};
use notification_analytics::event::{format_timestamp, parse_timestamp};
use notification_analytics::pipeline::Pipeline;
use notification_analytics::render::{FileRenderer, OutputLocation};
use notification_analytics::report;
use notification_analytics::sql::Dialect;
use notification_analytics::store::{schema, SqliteEventStore};
use notification_analytics::{logging, summary};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

#[derive(Parser)]
#[command(name = "notification-analytics")]
#[command(about = "Turn a notification event log into charts and CSV exports")]
#[command(version)]
struct Cli {
    /// Settings file (defaults to the standard lookup locations)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the summary and write every chart and export
    Run {
        /// SQLite event store (overrides settings)
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Artifact directory (overrides settings)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Reference time, "YYYY-MM-DD HH:MM:SS" or "YYYY-MM-DD" (defaults to now)
        #[arg(long)]
        as_of: Option<String>,

        /// Final report format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Print the summary counters only
    Summary {
        #[arg(short, long)]
        database: Option<PathBuf>,

        #[arg(long)]
        as_of: Option<String>,

        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Print the most recent notifications
    Recent {
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Number of events to show
        #[arg(short, long, default_value_t = 5)]
        limit: u64,
    },

    /// Print every report and export query
    Queries {
        #[arg(short, long, default_value = "sqlite")]
        dialect: DialectArg,

        #[arg(long)]
        as_of: Option<String>,
    },

    /// List the reports and exports a run produces
    List,

    /// Create the event table if it does not exist
    Init {
        #[arg(short, long)]
        database: Option<PathBuf>,
    },
}

#[derive(Clone, ValueEnum)]
enum DialectArg {
    Sqlite,
    Mysql,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Sqlite => Dialect::Sqlite,
            DialectArg::Mysql => Dialect::MySql,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable text
    Text,
    /// Pretty-printed JSON
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    };
    let settings = match settings {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading settings: {}", e);
            return ExitCode::FAILURE;
        }
    };
    logging::init(&settings.logging.filter);

    match cli.command {
        Commands::Run {
            database,
            output_dir,
            as_of,
            format,
        } => cmd_run(&settings, database, output_dir, as_of, format),
        Commands::Summary {
            database,
            as_of,
            format,
        } => cmd_summary(&settings, database, as_of, format),
        Commands::Recent { database, limit } => cmd_recent(&settings, database, limit),
        Commands::Queries { dialect, as_of } => cmd_queries(dialect, as_of),
        Commands::List => cmd_list(),
        Commands::Init { database } => cmd_init(&settings, database),
    }
}

fn store_config(settings: &Settings, database: Option<PathBuf>) -> Result<StoreConfig, String> {
    let config = settings
        .store_config(database.as_deref())
        .map_err(|e| format!("Invalid store settings: {}", e))?;
    info!(store = %config.describe(), "event store");
    Ok(config)
}

fn reference_time(as_of: Option<String>) -> Result<NaiveDateTime, String> {
    let Some(raw) = as_of else {
        return Ok(chrono::Local::now().naive_local());
    };
    parse_timestamp(&raw)
        .or_else(|| {
            NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| format!("Invalid --as-of value '{}'", raw))
}

fn print_json<T: serde::Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_run(
    settings: &Settings,
    database: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    as_of: Option<String>,
    format: OutputFormat,
) -> ExitCode {
    let (config, now) = match store_config(settings, database).and_then(|c| Ok((c, reference_time(as_of)?))) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let output = OutputLocation::new(output_dir.unwrap_or_else(|| settings.output.directory.clone()));
    let pipeline = Pipeline::new(SqliteEventStore::new(config), FileRenderer, output);
    let report = pipeline.run(now);

    let printed = match format {
        OutputFormat::Text => {
            println!("{}", report);
            ExitCode::SUCCESS
        }
        OutputFormat::Json => print_json(&report),
    };

    if report.is_success() {
        printed
    } else {
        ExitCode::FAILURE
    }
}

fn cmd_summary(
    settings: &Settings,
    database: Option<PathBuf>,
    as_of: Option<String>,
    format: OutputFormat,
) -> ExitCode {
    let (config, now) = match store_config(settings, database).and_then(|c| Ok((c, reference_time(as_of)?))) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let store = SqliteEventStore::new(config);
    match summary::compute(&store, now) {
        Ok(stats) => match format {
            OutputFormat::Text => {
                println!("{}", stats);
                ExitCode::SUCCESS
            }
            OutputFormat::Json => print_json(&stats),
        },
        Err(e) => {
            eprintln!("Summary failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_recent(settings: &Settings, database: Option<PathBuf>, limit: u64) -> ExitCode {
    let config = match store_config(settings, database) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let events = match SqliteEventStore::new(config).recent(limit) {
        Ok(events) => events,
        Err(e) => {
            eprintln!("Error reading events: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if events.is_empty() {
        println!("No notifications recorded.");
        return ExitCode::SUCCESS;
    }

    println!("Recent notifications ({}):", events.len());
    for event in &events {
        println!(
            "  [{}] {} {}: {}",
            format_timestamp(&event.received_at),
            event.kind.label(),
            event.title,
            event.body
        );
    }
    ExitCode::SUCCESS
}

fn cmd_queries(dialect: DialectArg, as_of: Option<String>) -> ExitCode {
    let now = match reference_time(as_of) {
        Ok(now) => now,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let dialect = Dialect::from(dialect);

    println!("{}", summary::summary_query(dialect, now));
    for spec in report::reports().iter().chain(report::exports()) {
        println!();
        println!("{}", spec.query(dialect, now));
    }
    ExitCode::SUCCESS
}

fn cmd_list() -> ExitCode {
    println!("Reports:");
    for spec in report::reports() {
        println!("  - {} ({})", spec.name, spec.file_name);
    }
    println!();
    println!("Exports:");
    for spec in report::exports() {
        println!("  - {} ({})", spec.name, spec.file_name);
    }
    ExitCode::SUCCESS
}

fn cmd_init(settings: &Settings, database: Option<PathBuf>) -> ExitCode {
    let config = match store_config(settings, database) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match schema::initialize(config.database_path()) {
        Ok(()) => {
            println!("OK: {} is ready", config.database_path().display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error creating schema: {}", e);
            ExitCode::FAILURE
        }
    }
}
