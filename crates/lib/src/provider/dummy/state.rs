//! State persistence for the dummy provider.
//!
//! # Storage Layout
//!
//! ```text
//! <data_dir>/machines/<name>/
//! └── state.json
//! ```
//!
//! # Example State File
//!
//! ```json
//! {
//!   "state": "running",
//!   "box_name": "ubuntu/jammy64",
//!   "updated_at_unix": 1760700000
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::provider::{MachineState, ProviderError};

const STATE_FILENAME: &str = "state.json";

/// What the dummy provider remembers about a machine it has created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DummyRecord {
  pub state: MachineState,
  pub box_name: String,
  pub updated_at_unix: u64,
}

impl DummyRecord {
  pub fn new(state: MachineState, box_name: impl Into<String>) -> Self {
    Self {
      state,
      box_name: box_name.into(),
      updated_at_unix: now_unix(),
    }
  }

  /// Same record with a new state and a fresh timestamp.
  pub fn with_state(mut self, state: MachineState) -> Self {
    self.state = state;
    self.updated_at_unix = now_unix();
    self
  }
}

fn now_unix() -> u64 {
  SystemTime::now()
    .duration_since(UNIX_EPOCH)
    .unwrap_or_default()
    .as_secs()
}

/// Directory holding the dummy provider's files for one machine.
///
/// The name must be a single normal path component so the directory always
/// stays under `<data_dir>/machines`.
pub fn machine_dir(data_dir: &Path, machine: &str) -> Result<PathBuf, ProviderError> {
  let mut components = Path::new(machine).components();
  match (components.next(), components.next()) {
    (Some(Component::Normal(_)), None) => Ok(data_dir.join("machines").join(machine)),
    _ => Err(ProviderError::InvalidMachineName(machine.to_string())),
  }
}

pub fn state_path(data_dir: &Path, machine: &str) -> Result<PathBuf, ProviderError> {
  Ok(machine_dir(data_dir, machine)?.join(STATE_FILENAME))
}

/// Load the record, or `None` if the machine was never created.
pub fn load(data_dir: &Path, machine: &str) -> Result<Option<DummyRecord>, ProviderError> {
  let path = state_path(data_dir, machine)?;

  let content = match fs::read_to_string(&path) {
    Ok(content) => content,
    Err(e) if e.kind() == io::ErrorKind::NotFound => {
      debug!(machine, path = %path.display(), "no dummy state file");
      return Ok(None);
    }
    Err(source) => {
      return Err(ProviderError::ReadState {
        path: path.display().to_string(),
        source,
      });
    }
  };

  let record = serde_json::from_str(&content).map_err(|source| ProviderError::ParseState {
    path: path.display().to_string(),
    source,
  })?;
  Ok(Some(record))
}

/// Write the record atomically: write to a temp file, then rename.
pub fn save(data_dir: &Path, machine: &str, record: &DummyRecord) -> Result<(), ProviderError> {
  let dir = machine_dir(data_dir, machine)?;
  let path = dir.join(STATE_FILENAME);
  let write_err = |source| ProviderError::WriteState {
    path: path.display().to_string(),
    source,
  };

  fs::create_dir_all(&dir).map_err(write_err)?;

  let content = serde_json::to_string_pretty(record).map_err(|e| write_err(io::Error::other(e)))?;
  let temp_path = dir.join("state.json.tmp");
  fs::write(&temp_path, content).map_err(write_err)?;
  fs::rename(&temp_path, &path).map_err(write_err)?;

  debug!(machine, state = %record.state, "dummy state saved");
  Ok(())
}

/// Remove everything stored for the machine. Succeeds if nothing is there.
pub fn remove(data_dir: &Path, machine: &str) -> Result<(), ProviderError> {
  let dir = machine_dir(data_dir, machine)?;

  match fs::remove_dir_all(&dir) {
    Ok(()) => Ok(()),
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
    Err(source) => Err(ProviderError::WriteState {
      path: dir.display().to_string(),
      source,
    }),
  }
}
