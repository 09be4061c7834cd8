mod action;
mod status;

pub use action::cmd_action;
pub use status::cmd_status;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use vessel_lib::{Environment, Machine, Runner};

use crate::progress::Progress;

/// Load the environment file with the CLI's runner.
pub(crate) fn load_environment(file: &Path) -> Result<Arc<Environment>> {
  let runner = Runner::new().with_hook(Progress);
  Environment::load(file, runner).with_context(|| format!("Failed to load {}", file.display()))
}

/// Resolve the requested machines, or every configured machine if none were named.
pub(crate) fn select_machines(env: &Arc<Environment>, names: &[String]) -> Result<Vec<Arc<Machine>>> {
  if names.is_empty() {
    return Ok(env.machines()?);
  }
  names
    .iter()
    .map(|name| env.machine(name).map_err(Into::into))
    .collect()
}
