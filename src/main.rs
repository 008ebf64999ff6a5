/// Version injected at compile time via PROVFLEX_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("PROVFLEX_VERSION") {
    Some(v) => v,
    None => "dev",
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use provflex::commands;
use provflex::config::{Config, OutputFormat};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Composite resource IDs and attribute map diffs for infrastructure providers
#[derive(Parser, Debug)]
#[command(name = "provflex", version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Output format (defaults to the configured one, then json)
    #[arg(short, long, value_enum, global = true)]
    output: Option<OutputFormat>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build and split composite resource IDs
    Id {
        #[command(subcommand)]
        action: IdAction,
    },
    /// List known resource ID layouts
    Layouts,
    /// Diff two attribute maps (JSON or YAML files)
    Diff {
        /// Previous attribute map
        old: PathBuf,
        /// Desired attribute map
        new: PathBuf,
    },
    /// Show or change saved defaults
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the saved configuration
    Show,
    /// Save new defaults
    Set {
        /// Default output format
        #[arg(long, value_enum)]
        default_output: Option<OutputFormat>,
        /// Accept empty ID parts by default
        #[arg(long)]
        allow_empty: Option<bool>,
    },
}

/// Blank-part policy for a single command
#[derive(clap::Args, Debug)]
struct BlankPolicy {
    /// Accept empty parts
    #[arg(long, overrides_with = "no_allow_empty")]
    allow_empty: bool,
    /// Reject empty parts, even when the config accepts them
    #[arg(long, overrides_with = "allow_empty")]
    no_allow_empty: bool,
}

impl BlankPolicy {
    /// `None` when neither flag was given
    fn as_override(&self) -> Option<bool> {
        match (self.allow_empty, self.no_allow_empty) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

#[derive(Subcommand, Debug)]
enum IdAction {
    /// Join parts into an ID
    Compose {
        #[arg(required = true)]
        parts: Vec<String>,
        /// Expected number of parts
        #[arg(short, long)]
        count: Option<usize>,
        #[command(flatten)]
        blanks: BlankPolicy,
    },
    /// Split an ID into its parts
    Decompose {
        id: String,
        /// Expected number of parts
        #[arg(short, long)]
        count: Option<usize>,
        #[command(flatten)]
        blanks: BlankPolicy,
    },
    /// Split an ID using a resource layout
    Parse {
        /// Layout key (see `provflex layouts`)
        layout: String,
        id: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .map_err(|e| anyhow::anyhow!("Failed to open log file {:?}: {}", log_path, e))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("provflex {} started with log level: {:?}", VERSION, level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("provflex").join("provflex.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".provflex").join("provflex.log");
    }
    PathBuf::from("provflex.log")
}

fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level)?;

    let config = Config::load();
    let output = config.effective_output(args.output);

    let result = match args.command {
        Command::Id { action } => match action {
            IdAction::Compose {
                parts,
                count,
                blanks,
            } => {
                let allow_empty = config.effective_allow_empty(blanks.as_override());
                commands::compose_id(&parts, count, allow_empty)
            }
            IdAction::Decompose { id, count, blanks } => {
                let allow_empty = config.effective_allow_empty(blanks.as_override());
                commands::decompose_id(&id, count, allow_empty)
            }
            IdAction::Parse { layout, id } => commands::parse_id(&layout, &id),
        },
        Command::Layouts => Ok(commands::list_layouts()),
        Command::Diff { old, new } => commands::diff_files(&old, &new),
        Command::Config { action } => {
            let path = Config::config_path().context("No config directory on this platform")?;
            match action {
                ConfigAction::Show => commands::show_config(&path),
                ConfigAction::Set {
                    default_output,
                    allow_empty,
                } => commands::set_config(&path, default_output, allow_empty),
            }
        }
    };

    match result {
        Ok(value) => {
            println!("{}", commands::render(&value, output)?);
            Ok(())
        }
        Err(err) => {
            tracing::error!("Command failed: {:#}", err);
            Err(err)
        }
    }
}
