//! Provider contract.
//!
//! A provider is the backend that actually performs lifecycle operations for
//! a machine (a hypervisor, a cloud API, a container engine). Every provider
//! implements [`Provider`]: resolve an action name to a [`Callable`], and
//! report the machine's current [`MachineState`].
//!
//! Resolution and execution are separate on purpose. A machine asks its
//! provider for a unit first and only hands it to the action runner when one
//! exists, so rejecting an unsupported action never touches the pipeline.

pub mod dummy;
mod registry;

pub use registry::ProviderRegistry;

use std::fmt;
use std::io;
use std::sync::{Arc, Weak};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::action::{ActionName, Callable};
use crate::machine::Machine;

/// Result of looking up an action on a provider.
#[derive(Clone)]
pub enum ActionLookup {
  /// The provider implements the action; run this unit through the pipeline.
  Executable(Arc<dyn Callable>),
  /// The provider does not implement the action.
  Unsupported,
}

impl ActionLookup {
  pub fn executable(callable: impl Callable + 'static) -> Self {
    ActionLookup::Executable(Arc::new(callable))
  }

  pub fn is_supported(&self) -> bool {
    matches!(self, ActionLookup::Executable(_))
  }
}

impl fmt::Debug for ActionLookup {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ActionLookup::Executable(callable) => f.debug_tuple("Executable").field(&callable.name()).finish(),
      ActionLookup::Unsupported => f.write_str("Unsupported"),
    }
  }
}

/// Backend for a single machine.
///
/// The `Display` implementation is the provider's type descriptor; it is what
/// callers see in `UnimplementedProviderAction` errors.
#[async_trait]
pub trait Provider: fmt::Display + Send + Sync {
  /// Look up the unit implementing `name`.
  ///
  /// Must not fail for unknown actions: those are [`ActionLookup::Unsupported`].
  fn action(&self, name: &ActionName) -> ActionLookup;

  /// Query the machine's current state from the backend.
  async fn state(&self) -> Result<MachineState, ProviderError>;
}

/// Constructs the provider for one machine.
///
/// Called exactly once per machine, with a back-reference to the machine
/// being constructed. The reference cannot be upgraded until construction
/// finishes, so providers should hold on to it and upgrade lazily.
pub type ProviderFactory = dyn Fn(Weak<Machine>) -> Box<dyn Provider> + Send + Sync;

/// Provider-reported machine state.
///
/// The set of states is defined by each provider; common values are
/// `running`, `poweroff` and `not_created`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MachineState(String);

impl MachineState {
  pub const NOT_CREATED: &'static str = "not_created";
  pub const RUNNING: &'static str = "running";
  pub const POWEROFF: &'static str = "poweroff";

  pub fn new(state: impl Into<String>) -> Self {
    Self(state.into())
  }

  pub fn not_created() -> Self {
    Self::new(Self::NOT_CREATED)
  }

  pub fn running() -> Self {
    Self::new(Self::RUNNING)
  }

  pub fn poweroff() -> Self {
    Self::new(Self::POWEROFF)
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for MachineState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl PartialEq<str> for MachineState {
  fn eq(&self, other: &str) -> bool {
    self.0 == other
  }
}

impl PartialEq<&str> for MachineState {
  fn eq(&self, other: &&str) -> bool {
    self.0 == *other
  }
}

/// Errors reported by providers.
#[derive(Debug, Error)]
pub enum ProviderError {
  /// The backend could not be reached to answer the query.
  #[error("backend unreachable: {0}")]
  Unreachable(String),

  /// The machine that owns this provider has been dropped.
  #[error("machine '{0}' is no longer available")]
  Detached(String),

  /// The machine name cannot be used as a directory name.
  #[error("machine name '{0}' is not a plain path component")]
  InvalidMachineName(String),

  /// Failed to read persisted provider state.
  #[error("failed to read provider state {path}: {source}")]
  ReadState {
    path: String,
    #[source]
    source: io::Error,
  },

  /// Failed to write persisted provider state.
  #[error("failed to write provider state {path}: {source}")]
  WriteState {
    path: String,
    #[source]
    source: io::Error,
  },

  /// Persisted provider state is malformed.
  #[error("failed to parse provider state {path}: {source}")]
  ParseState {
    path: String,
    #[source]
    source: serde_json::Error,
  },
}
