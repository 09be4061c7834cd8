//! Terminal output for vessel commands.
//!
//! Progress and results go to stdout, failures to stderr. Colors are only
//! used when the stream supports them.

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

use vessel_lib::MachineState;

/// Output format for `vessel status`.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

pub mod symbols {
  pub const DONE: &str = "✓";
  pub const FAILED: &str = "✗";
  pub const NOTE: &str = "•";
  pub const RUNNING: &str = "→";
}

/// An action finished on a machine.
pub fn print_success(message: &str) {
  println!("{} {}", symbols::DONE.if_supports_color(Stream::Stdout, |s| s.green()), message);
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::FAILED.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_info(message: &str) {
  println!("{} {}", symbols::NOTE.if_supports_color(Stream::Stdout, |s| s.blue()), message);
}

/// An action started on a machine.
pub fn print_step(message: &str) {
  println!("{} {}", symbols::RUNNING.if_supports_color(Stream::Stdout, |s| s.cyan()), message);
}

/// One row of `vessel status`: `  <machine>: <state> (<detail>)`.
///
/// The state is colored by how far the machine is from running.
pub fn print_machine_state(machine: &str, state: &str, detail: &str) {
  let colored = match state {
    MachineState::RUNNING => state.if_supports_color(Stream::Stdout, |s| s.green()).to_string(),
    MachineState::POWEROFF => state.if_supports_color(Stream::Stdout, |s| s.yellow()).to_string(),
    _ => state.if_supports_color(Stream::Stdout, |s| s.dimmed()).to_string(),
  };
  println!("  {}: {} ({})", machine.if_supports_color(Stream::Stdout, |s| s.bold()), colored, detail);
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}
