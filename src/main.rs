//! usersdb CLI - manage a local user registry backed by SQLite

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use usersdb::config::{self, UsersdbConfig};
use usersdb::output::{emit_json_error, OutputMode};
use usersdb::storage::{MigrationPolicy, RecordStore};
use usersdb::ui::{self, TerminalSurface};
use usersdb::ListSyncController;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "usersdb")]
#[command(version)]
#[command(about = "Local user registry - add, rename, delete and select users in a SQLite store")]
#[command(long_about = r#"
usersdb keeps a list of named users in a local SQLite database.

Example usage:
  usersdb add "Amine"
  usersdb list
  usersdb update --select 1 "Amine B."
  usersdb delete --select 0
  usersdb shell
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the database file (overrides config)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Declared schema version (overrides config)
    #[arg(long, global = true)]
    schema_version: Option<u32>,

    /// Migration policy: upgrade-only or drop-on-mismatch (overrides config)
    #[arg(long, global = true)]
    migration: Option<MigrationPolicy>,

    /// Print JSON lines instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a config file with the current settings
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },

    /// Show all users
    List,

    /// Add a user
    Add {
        /// Name of the new user
        name: String,
    },

    /// Rename the user at a list position
    Update {
        /// List position (as shown by `list`)
        #[arg(short, long)]
        select: usize,

        /// New name
        name: String,
    },

    /// Delete the user at a list position
    Delete {
        /// List position (as shown by `list`)
        #[arg(short, long)]
        select: usize,
    },

    /// Show statistics about the database
    Stats,

    /// Interactive session keeping a selection between commands
    Shell,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mode = OutputMode::from_json_flag(cli.json);
    if let Err(e) = run(cli, mode) {
        if mode.is_human() {
            ui::error(&format!("{:#}", e));
        } else {
            emit_json_error(&format!("{:#}", e));
        }
        std::process::exit(1);
    }

    Ok(())
}

fn run(cli: Cli, mode: OutputMode) -> anyhow::Result<()> {
    let mut settings = config::load_config(cli.config.as_deref())?.unwrap_or_default();
    if let Some(database) = &cli.database {
        settings.database = Some(database.to_string_lossy().to_string());
    }
    if let Some(version) = cli.schema_version {
        settings.schema_version = Some(version);
    }
    if let Some(policy) = cli.migration {
        settings.migration = Some(policy);
    }

    match cli.command {
        Commands::Init { force } => {
            let path = cli.config.unwrap_or_else(config::default_config_path);
            commands::run_init(&path, &settings, force, mode)
        }
        Commands::List => commands::run_list(&mut controller(&settings, mode)?),
        Commands::Add { name } => commands::run_add(&mut controller(&settings, mode)?, &name),
        Commands::Update { select, name } => {
            commands::run_update(&mut controller(&settings, mode)?, select, &name)
        }
        Commands::Delete { select } => commands::run_delete(&mut controller(&settings, mode)?, select),
        Commands::Stats => commands::run_stats(&open_store(&settings)?, mode),
        Commands::Shell => {
            let stdin = std::io::stdin();
            commands::run_shell(&mut controller(&settings, mode)?, stdin.lock())
        }
    }
}

fn controller(settings: &UsersdbConfig, mode: OutputMode) -> anyhow::Result<commands::Controller> {
    Ok(ListSyncController::new(open_store(settings)?, TerminalSurface::new(mode)))
}

fn open_store(settings: &UsersdbConfig) -> anyhow::Result<RecordStore> {
    let cwd = std::env::current_dir()?;
    let database = settings.database_path(&cwd);
    config::ensure_db_dir(&database)?;

    tracing::debug!(
        "Opening {} (schema v{}, {})",
        database.display(),
        settings.schema_version(),
        settings.migration()
    );
    let store = RecordStore::open_with_policy(&database, settings.schema_version(), settings.migration())?;
    Ok(store)
}
