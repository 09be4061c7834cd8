use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::provider::ProviderError;

/// Name of a lifecycle action such as `up`, `halt` or `destroy`.
///
/// The vocabulary is open-ended and defined by each provider. The only
/// constraint is that the name is an identifier token: it starts with an
/// ASCII letter and contains only ASCII alphanumerics, `_` and `-`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ActionName(String);

/// Returned when a string is not a valid action identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid action name '{0}': expected an identifier such as 'up' or 'halt'")]
pub struct InvalidActionName(pub String);

impl ActionName {
  /// Parse and validate an action name.
  pub fn new(name: impl Into<String>) -> Result<Self, InvalidActionName> {
    let name = name.into();
    if is_identifier(&name) { Ok(Self(name)) } else { Err(InvalidActionName(name)) }
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

/// ASCII letter followed by ASCII alphanumerics, `_` or `-`.
pub(crate) fn is_identifier(s: &str) -> bool {
  let mut chars = s.chars();
  match chars.next() {
    Some(first) if first.is_ascii_alphabetic() => chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'),
    _ => false,
  }
}

impl fmt::Display for ActionName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl FromStr for ActionName {
  type Err = InvalidActionName;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::new(s)
  }
}

impl TryFrom<String> for ActionName {
  type Error = InvalidActionName;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    Self::new(value)
  }
}

impl From<ActionName> for String {
  fn from(value: ActionName) -> Self {
    value.0
  }
}

impl PartialEq<str> for ActionName {
  fn eq(&self, other: &str) -> bool {
    self.0 == other
  }
}

impl PartialEq<&str> for ActionName {
  fn eq(&self, other: &&str) -> bool {
    self.0 == *other
  }
}

/// Errors raised while an action runs through the pipeline.
///
/// These come from the executed unit, from hooks, or from the runner itself.
/// Machines never reclassify them.
#[derive(Debug, Error)]
pub enum ActionError {
  /// The unit refused to run, e.g. `halt` on a machine that was never created.
  #[error("action '{action}' failed: {message}")]
  Failed { action: ActionName, message: String },

  /// A hook aborted the run.
  #[error("hook '{hook}' aborted action '{action}': {message}")]
  Hook {
    hook: String,
    action: ActionName,
    message: String,
  },

  /// The provider failed while the action was running.
  #[error("provider error: {0}")]
  Provider(#[from] ProviderError),

  /// I/O error during execution.
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}
