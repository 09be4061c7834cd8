use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Weak};

use crate::machine::Machine;
use crate::provider::dummy::DummyProvider;
use crate::provider::{Provider, ProviderFactory};

/// Provider factories keyed by the name used in the environment file.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
  factories: BTreeMap<String, Arc<ProviderFactory>>,
}

impl ProviderRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Registry with the providers that ship with vessel.
  pub fn builtin() -> Self {
    let mut registry = Self::new();
    registry.register(DummyProvider::NAME, |machine| Box::new(DummyProvider::new(machine)));
    registry
  }

  /// Register a factory, replacing any existing one with the same name.
  pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
  where
    F: Fn(Weak<Machine>) -> Box<dyn Provider> + Send + Sync + 'static,
  {
    self.factories.insert(name.into(), Arc::new(factory));
  }

  pub fn get(&self, name: &str) -> Option<Arc<ProviderFactory>> {
    self.factories.get(name).cloned()
  }

  pub fn contains(&self, name: &str) -> bool {
    self.factories.contains_key(name)
  }

  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.factories.keys().map(String::as_str)
  }
}

impl fmt::Debug for ProviderRegistry {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_set().entries(self.names()).finish()
  }
}
