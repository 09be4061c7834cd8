use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use crate::action::ActionName;
use crate::machine::Machine;

/// Context bundle handed to the action runner and the executed unit.
///
/// Always carries the machine the action runs against and the requested
/// action name. The value map is how hooks, the runner and the unit pass
/// data to one another; the runner seeds it with its global values.
#[derive(Debug, Clone)]
pub struct ActionEnv {
  machine: Arc<Machine>,
  action: ActionName,
  values: BTreeMap<String, Value>,
  halted: bool,
}

impl ActionEnv {
  pub fn new(machine: Arc<Machine>, action: ActionName) -> Self {
    Self {
      machine,
      action,
      values: BTreeMap::new(),
      halted: false,
    }
  }

  pub fn machine(&self) -> &Arc<Machine> {
    &self.machine
  }

  pub fn action(&self) -> &ActionName {
    &self.action
  }

  pub fn get(&self, key: &str) -> Option<&Value> {
    self.values.get(key)
  }

  pub fn contains(&self, key: &str) -> bool {
    self.values.contains_key(key)
  }

  /// Set a value, returning the previous one.
  pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
    self.values.insert(key.into(), value.into())
  }

  /// Set a value only if the key is not already present.
  pub fn insert_default(&mut self, key: impl Into<String>, value: impl Into<Value>) {
    self.values.entry(key.into()).or_insert_with(|| value.into());
  }

  pub fn values(&self) -> &BTreeMap<String, Value> {
    &self.values
  }

  /// Stop any remaining steps of a [`Sequence`](crate::action::Sequence).
  pub fn halt(&mut self) {
    self.halted = true;
  }

  pub fn is_halted(&self) -> bool {
    self.halted
  }
}
