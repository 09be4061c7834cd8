//! Environment file parsing.
//!
//! An environment file is TOML listing the machines vessel manages:
//!
//! ```toml
//! [globals]
//! region = "eu-west"
//!
//! [[machine]]
//! name = "web"
//! provider = "dummy"
//! box = { name = "ubuntu/jammy64", version = "20240101.0.0" }
//!
//! [machine.config]
//! memory = 2048
//!
//! [[machine]]
//! name = "db"
//! box = "debian/bookworm64"
//! ```
//!
//! `provider` defaults to `dummy`. `box` may be a bare name or a table.
//! Each machine's `config` table is passed to its provider untouched.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::action::is_identifier;
use crate::machine::{BoxRef, MachineConfig};
use crate::provider::dummy::DummyProvider;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to parse {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: toml::de::Error,
  },

  #[error("machine names must not be empty")]
  EmptyName,

  /// Machine names become directory names, so they must be identifiers.
  #[error("invalid machine name '{0}': expected an identifier such as 'web' or 'db-1'")]
  InvalidName(String),

  #[error("machine '{0}' is defined more than once")]
  DuplicateMachine(String),
}

/// Parsed environment file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
  #[serde(default, rename = "machine")]
  pub machines: Vec<MachineDef>,

  /// Values seeded into every action env.
  #[serde(default)]
  pub globals: serde_json::Map<String, Value>,
}

/// One `[[machine]]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MachineDef {
  pub name: String,

  #[serde(default = "default_provider")]
  pub provider: String,

  #[serde(rename = "box", deserialize_with = "box_ref")]
  pub box_ref: BoxRef,

  #[serde(default)]
  pub config: MachineConfig,
}

fn default_provider() -> String {
  DummyProvider::NAME.to_string()
}

fn box_ref<'de, D>(deserializer: D) -> Result<BoxRef, D::Error>
where
  D: Deserializer<'de>,
{
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum BoxSpec {
    Name(String),
    Full(BoxRef),
  }

  Ok(match BoxSpec::deserialize(deserializer)? {
    BoxSpec::Name(name) => BoxRef::new(name),
    BoxSpec::Full(box_ref) => box_ref,
  })
}

impl EnvironmentConfig {
  /// Read and validate an environment file.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    Self::parse(&content, path)
  }

  /// Parse and validate environment file content. `origin` is only used in
  /// error messages.
  pub fn parse(content: &str, origin: &Path) -> Result<Self, ConfigError> {
    let config: Self = toml::from_str(content).map_err(|source| ConfigError::Parse {
      path: origin.to_path_buf(),
      source,
    })?;
    config.validate()?;
    debug!(path = %origin.display(), machines = config.machines.len(), "loaded environment file");
    Ok(config)
  }

  fn validate(&self) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for def in &self.machines {
      if def.name.trim().is_empty() {
        return Err(ConfigError::EmptyName);
      }
      if !is_identifier(&def.name) {
        return Err(ConfigError::InvalidName(def.name.clone()));
      }
      if !seen.insert(def.name.as_str()) {
        return Err(ConfigError::DuplicateMachine(def.name.clone()));
      }
    }
    Ok(())
  }

  pub fn machine(&self, name: &str) -> Option<&MachineDef> {
    self.machines.iter().find(|def| def.name == name)
  }

  pub fn machine_names(&self) -> impl Iterator<Item = &str> {
    self.machines.iter().map(|def| def.name.as_str())
  }
}
