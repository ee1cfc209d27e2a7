//! Tasklist - in-memory task list with undo/redo

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::fs::File;
use std::io::{self, BufReader, IsTerminal};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use tasklist::session::DEMO_SCRIPT;
use tasklist::{HistoryManager, Session, TaskListConfig, TaskListError};

#[derive(Parser)]
#[command(name = "tasklist")]
#[command(version = "0.1.0")]
#[command(about = "In-memory task list with undo and redo", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Directory holding .tasklist/settings.json (defaults to current directory)
    #[arg(short, long, global = true, default_value = ".")]
    dir: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Maximum number of undo steps to keep
    #[arg(long, global = true, value_name = "N", env = "TASKLIST_MAX_HISTORY")]
    max_history: Option<usize>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive session on stdin
    Shell,

    /// Execute commands from a script file ("-" reads stdin)
    Run {
        /// Script path
        file: PathBuf,
    },

    /// Replay the sample session
    Demo,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose {
        "tasklist=debug,info"
    } else {
        "tasklist=info,warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => fail(&e, !cli.no_color),
    };

    if let Err(e) = run(cli.command, &config) {
        fail(&e, config.color);
    }
    Ok(())
}

/// Report a fatal error on stderr and exit with its code.
fn fail(e: &TaskListError, color: bool) -> ! {
    if color && io::stderr().is_terminal() {
        eprintln!("{} {}", "Error:".red().bold(), e);
    } else {
        eprintln!("Error: {}", e);
    }
    std::process::exit(e.exit_code());
}

/// Settings file with command line overrides applied.
fn load_config(cli: &Cli) -> Result<TaskListConfig, TaskListError> {
    let mut config = TaskListConfig::load(&cli.dir)?;
    if let Some(max) = cli.max_history {
        config.max_history = Some(max);
    }
    if cli.no_color {
        config.color = false;
    }
    config.validate()?;
    Ok(config)
}

fn run(command: Commands, config: &TaskListConfig) -> Result<(), TaskListError> {
    let stdout = io::stdout();
    let color = config.color && stdout.is_terminal();

    match command {
        Commands::Shell => {
            let stdin = io::stdin();
            let prompt = stdin.is_terminal();
            let manager = HistoryManager::with_config(config.manager_config());
            let mut session = Session::new(manager, stdout.lock()).with_color(color);
            if prompt && color {
                println!("{}", "Type 'help' for commands.".dimmed());
            } else if prompt {
                println!("Type 'help' for commands.");
            }
            session.run(stdin.lock(), prompt)?;
        }

        Commands::Run { file } => {
            let manager = HistoryManager::with_config(config.manager_config());
            let mut session = Session::new(manager, stdout.lock()).with_color(color);
            if file.as_os_str() == "-" {
                session.run(io::stdin().lock(), false)?;
            } else {
                session.run(BufReader::new(File::open(&file)?), false)?;
            }
        }

        Commands::Demo => {
            // The sample uses ISO dates regardless of the configured format.
            let mut settings = config.manager_config();
            settings.date_format = tasklist::task::DISPLAY_DATE_FORMAT.to_string();
            let manager = HistoryManager::with_config(settings);
            let mut session = Session::new(manager, stdout.lock()).with_color(color);
            session.run(DEMO_SCRIPT.as_bytes(), false)?;
        }
    }

    Ok(())
}
