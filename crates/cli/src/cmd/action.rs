//! Implementation of `vessel up`, `halt`, `destroy` and `run`.
//!
//! Every lifecycle command is the same operation: resolve the action on
//! each selected machine's provider and run it through the environment's
//! action runner.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use vessel_lib::ActionName;

use super::{load_environment, select_machines};
use crate::output::print_info;

/// Execute an action on the named machines (all machines if none are named).
///
/// Machines are processed in order; the first failure stops the command.
pub fn cmd_action(file: &Path, action: &str, machines: &[String]) -> Result<()> {
  let action: ActionName = action.parse()?;
  let env = load_environment(file)?;
  let machines = select_machines(&env, machines)?;

  if machines.is_empty() {
    print_info(&format!("No machines defined in {}", file.display()));
    return Ok(());
  }

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;

  for machine in machines {
    debug!(machine = machine.name(), action = %action, "dispatching");
    rt.block_on(machine.action(&action))
      .with_context(|| format!("{}: '{}' failed", machine.name(), action))?;
  }

  Ok(())
}
