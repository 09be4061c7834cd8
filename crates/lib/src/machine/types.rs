use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The box a machine is built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxRef {
  /// Box name, e.g. `ubuntu/jammy64`.
  pub name: String,
  /// Pinned version; `None` means whatever the provider considers latest.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub version: Option<String>,
  /// Where to fetch the box from if it is not in the catalog.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub url: Option<String>,
}

impl BoxRef {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      version: None,
      url: None,
    }
  }

  pub fn with_version(mut self, version: impl Into<String>) -> Self {
    self.version = Some(version.into());
    self
  }
}

impl fmt::Display for BoxRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.version {
      Some(version) => write!(f, "{} ({})", self.name, version),
      None => f.write_str(&self.name),
    }
  }
}

/// Per-machine configuration.
///
/// Opaque to vessel itself: it is carried through to the provider and the
/// action runner untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MachineConfig(serde_json::Map<String, Value>);

impl MachineConfig {
  pub fn new(values: serde_json::Map<String, Value>) -> Self {
    Self(values)
  }

  pub fn get(&self, key: &str) -> Option<&Value> {
    self.0.get(key)
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn as_map(&self) -> &serde_json::Map<String, Value> {
    &self.0
  }
}
