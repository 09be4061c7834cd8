//! Status command implementation.
//!
//! Queries each machine's provider for its current state.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use super::{load_environment, select_machines};
use crate::output::{OutputFormat, print_info, print_json, print_machine_state};

#[derive(Debug, Serialize)]
struct MachineStatus {
  name: String,
  state: String,
  provider: String,
  #[serde(rename = "box")]
  box_name: String,
}

pub fn cmd_status(file: &Path, machines: &[String], output: OutputFormat) -> Result<()> {
  let env = load_environment(file)?;
  let machines = select_machines(&env, machines)?;

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;

  let mut statuses = Vec::with_capacity(machines.len());
  for machine in &machines {
    let state = rt
      .block_on(machine.state())
      .with_context(|| format!("{}: failed to query state", machine.name()))?;
    statuses.push(MachineStatus {
      name: machine.name().to_string(),
      state: state.to_string(),
      provider: machine.provider(),
      box_name: machine.box_ref().to_string(),
    });
  }

  if output.is_json() {
    return print_json(&statuses);
  }

  if statuses.is_empty() {
    print_info(&format!("No machines defined in {}", file.display()));
    return Ok(());
  }

  println!("Current machine states:");
  println!();
  for status in &statuses {
    print_machine_state(&status.name, &status.state, &format!("{}, {}", status.provider, status.box_name));
  }

  Ok(())
}
