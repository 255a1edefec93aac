//! fpbx-callflow: render FreePBX inbound call flows
//!
//! Discovers the schema of a FreePBX database (or loads a JSON snapshot of a
//! previous run), resolves every inbound route and prints the resulting
//! call-flow trees.

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use freepbx_callflow::{
    analyze, Analysis, CallflowError, MysqlOptions, MysqlSource, RenderOptions, ResolverOptions,
    Snapshot, DEFAULT_DATABASE, DEFAULT_DB_USER, DEFAULT_QUERY_TIMEOUT_MS, DEFAULT_SOCKET,
    MAX_RESOLVE_DEPTH,
};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tokio::time::Duration;
use tracing::{info, warn};

mod report;
mod summary;

use report::ReportWriter;
use summary::SchemaSummary;

/// FreePBX call-flow renderer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Render only the inbound route for this DID
    #[arg(long)]
    did: Option<String>,

    /// MySQL socket path
    #[arg(short = 'S', long, default_value = DEFAULT_SOCKET)]
    socket: String,

    /// MySQL host; connects over TCP instead of the socket
    #[arg(short = 'H', long)]
    host: Option<String>,

    /// MySQL port (with --host)
    #[arg(short = 'P', long)]
    port: Option<u16>,

    /// Database user
    #[arg(short = 'u', long, default_value = DEFAULT_DB_USER)]
    db_user: String,

    /// Database password
    #[arg(short = 'p', long, env = "MYSQL_PWD", hide_env_values = true)]
    db_password: Option<String>,

    /// Database name
    #[arg(long, default_value = DEFAULT_DATABASE)]
    database: String,

    /// Per-query timeout in seconds
    #[arg(short, long, default_value_t = DEFAULT_QUERY_TIMEOUT_MS / 1000)]
    timeout: u64,

    /// Maximum resolution depth
    #[arg(long, default_value_t = MAX_RESOLVE_DEPTH)]
    max_depth: usize,

    /// Read collected data from a JSON snapshot instead of the database
    #[arg(long, conflicts_with = "dump")]
    snapshot: Option<PathBuf>,

    /// Write collected data to a JSON snapshot
    #[arg(long)]
    dump: Option<PathBuf>,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print call flows as JSON
    #[arg(long)]
    json: bool,

    /// Print the schema mapping and collection summary
    #[arg(long)]
    schema: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Use ASCII tree connectors
    #[arg(long)]
    ascii: bool,

    /// Truncate lines to this many columns (default: terminal width)
    #[arg(short, long)]
    width: Option<usize>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    setup_logging(args.debug)?;

    let analysis = match load_analysis(&args).await {
        Ok(analysis) => analysis,
        Err(e) => {
            report_load_failure(&args, &e);
            std::process::exit(1);
        }
    };

    if let Some(ref path) = args.dump {
        write_dump(&args, &analysis, path)?;
    }

    let color = !args.no_color && args.output.is_none() && std::io::stdout().is_terminal();

    if args.schema {
        SchemaSummary::new(color).print(&analysis);
    }

    let render = RenderOptions {
        color,
        ascii: args.ascii,
        max_width: line_width(&args),
    };
    let resolver = ResolverOptions {
        max_depth: args.max_depth,
    };

    let writer = ReportWriter::new(render, resolver);
    let text = if args.json {
        writer.json(&analysis, args.did.as_deref())?
    } else {
        writer.text(&analysis, args.did.as_deref())
    };

    match args.output {
        Some(ref path) => {
            std::fs::write(path, text)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            info!("Report written to {}", path.display());
        }
        None => print!("{}", text),
    }

    let degraded = analysis.degraded();
    if !degraded.is_empty() && !args.schema {
        warn!(
            "{} components unavailable, run with --schema for details",
            degraded.len()
        );
    }

    Ok(())
}

/// Set up logging based on debug level
fn setup_logging(debug: bool) -> Result<()> {
    let filter = if debug { "debug" } else { "warn" };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

fn mysql_options(args: &Args) -> MysqlOptions {
    let mut options = MysqlOptions::new()
        .socket(&args.socket)
        .user(&args.db_user)
        .password(args.db_password.clone())
        .database(&args.database)
        .timeout(Duration::from_secs(args.timeout));
    if let Some(ref host) = args.host {
        options = options.host(host, args.port);
    }
    options
}

/// Snapshot or live database, whichever was asked for
async fn load_analysis(args: &Args) -> Result<Analysis, CallflowError> {
    match args.snapshot {
        Some(ref path) => {
            info!("Loading snapshot {}", path.display());
            let snapshot = Snapshot::load(path)?;
            Ok(Analysis::from_collected(snapshot.components))
        }
        None => {
            let source = MysqlSource::new(mysql_options(args));
            info!("Connecting to {}", source.options().target());
            analyze(&source).await
        }
    }
}

fn report_load_failure(args: &Args, e: &CallflowError) {
    let what = match args.snapshot {
        Some(ref path) => format!("Failed to read snapshot {}", path.display()),
        None => format!(
            "Failed to query FreePBX database at {}",
            mysql_options(args).target()
        ),
    };
    if args.no_color {
        eprintln!("{}", what);
        eprintln!("Error: {}", e);
    } else {
        eprintln!("{}", what.red().bold());
        eprintln!("{}: {}", "Error".red().bold(), e);
    }
    if matches!(e, CallflowError::ClientNotFound { .. }) {
        eprintln!("Is the mysql client installed and on PATH?");
    }
}

fn write_dump(args: &Args, analysis: &Analysis, path: &Path) -> Result<()> {
    let source = mysql_options(args).target();
    let snapshot = Snapshot::new(source, analysis.collected.clone())
        .created_at(chrono::Utc::now().to_rfc3339());
    snapshot
        .save(path)
        .with_context(|| format!("Failed to write snapshot to {}", path.display()))?;
    info!("Snapshot written to {}", path.display());
    Ok(())
}

/// Explicit width, else the terminal's when printing to one
fn line_width(args: &Args) -> Option<usize> {
    if args.width.is_some() {
        return args.width;
    }
    if args.output.is_some() || args.json || !std::io::stdout().is_terminal() {
        return None;
    }
    crossterm::terminal::size()
        .ok()
        .map(|(cols, _)| cols as usize)
}
