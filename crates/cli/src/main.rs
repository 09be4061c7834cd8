mod cmd;
mod output;
mod progress;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vessel_lib::consts::ENVIRONMENT_FILE;

use crate::output::{OutputFormat, print_error};

/// vessel - manage machines through swappable providers
#[derive(Parser)]
#[command(name = "vessel")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Path to the environment file
  #[arg(short, long, global = true, default_value = ENVIRONMENT_FILE)]
  file: PathBuf,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Create and start machines
  Up {
    /// Machines to act on (default: all)
    machines: Vec<String>,
  },

  /// Stop running machines
  Halt {
    /// Machines to act on (default: all)
    machines: Vec<String>,
  },

  /// Destroy machines and everything the provider created for them
  Destroy {
    /// Machines to act on (default: all)
    machines: Vec<String>,
  },

  /// Run an arbitrary provider action
  Run {
    /// Action name, e.g. `up` or `reload`
    action: String,

    /// Machines to act on (default: all)
    machines: Vec<String>,
  },

  /// Show the state of machines
  Status {
    /// Machines to show (default: all)
    machines: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
  },
}

fn main() {
  let cli = Cli::parse();

  // Initialize logging
  let filter = if cli.verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
  };
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  if let Err(e) = run(cli) {
    print_error(&format!("{:#}", e));
    std::process::exit(1);
  }
}

fn run(cli: Cli) -> Result<()> {
  match cli.command {
    Commands::Up { machines } => cmd::cmd_action(&cli.file, "up", &machines),
    Commands::Halt { machines } => cmd::cmd_action(&cli.file, "halt", &machines),
    Commands::Destroy { machines } => cmd::cmd_action(&cli.file, "destroy", &machines),
    Commands::Run { action, machines } => cmd::cmd_action(&cli.file, &action, &machines),
    Commands::Status { machines, output } => cmd::cmd_status(&cli.file, &machines, output),
  }
}
