mod calendar;
mod cmd;
mod jira;
mod output;
mod secret;
mod timesheet;

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tired_engine::zone::{resolve_time_zone_with, SYSTEM_TIMEZONE_FILE};
use tired_engine::CANONICAL_MARKER;

use cmd::submit::SubmitArgs;
use cmd::Context;

#[derive(Parser)]
#[command(
    name = "tired",
    about = "Validate a plain-text timesheet and report its new entries to Jira",
    version,
    propagate_version = true
)]
struct Cli {
    /// Full path to the timesheet file
    #[arg(long, short = 't', global = true, env = "TIRED_TIMESHEET")]
    timesheet: Option<PathBuf>,

    /// IANA time zone of the timesheet (default: $TZ, then /etc/timezone)
    #[arg(long, global = true, env = "TIRED_TIMEZONE")]
    timezone: Option<String>,

    /// Line separating submitted entries from new ones
    #[arg(long, global = true, default_value = CANONICAL_MARKER)]
    marker: String,

    /// Evaluate as if the current time were this RFC 3339 instant
    #[arg(long, global = true, hide = true)]
    now: Option<DateTime<Utc>>,

    /// Log debug messages
    #[arg(long, global = true)]
    debug: bool,

    /// Output as JSON
    #[arg(long, short = 'j', global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and validate the new entries without sending anything
    Check,

    /// Send the new entries to Jira and move the marker below them
    Submit(SubmitArgs),

    /// Show worked time for today, this week and this month
    Report,
}

fn build_context(cli: &Cli) -> anyhow::Result<Context> {
    let timesheet = cli
        .timesheet
        .clone()
        .context("'--timesheet' option is mandatory")?;

    let env_tz = std::env::var("TZ").ok();
    let zone = resolve_time_zone_with(
        cli.timezone.as_deref(),
        env_tz.as_deref(),
        Path::new(SYSTEM_TIMEZONE_FILE),
    )
    .context("can't get time zone")?;

    let now = cli.now.unwrap_or_else(Utc::now);
    tracing::info!(date = %now.to_rfc3339(), timezone = zone.name(), "Current date and time.");

    Ok(Context {
        timesheet,
        zone,
        now,
        marker: cli.marker.clone(),
        json: cli.json,
    })
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = build_context(&cli).and_then(|ctx| match &cli.command {
        Commands::Check => cmd::check::run(&ctx),
        Commands::Submit(args) => cmd::submit::run(&ctx, args),
        Commands::Report => cmd::report::run(&ctx),
    });

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
