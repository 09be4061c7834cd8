//! Shared fakes for library integration tests.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Weak};

use async_trait::async_trait;

use vessel_lib::provider::ProviderFactory;
use vessel_lib::{
  ActionEnv, ActionError, ActionLookup, ActionName, ActionRunner, Callable, Machine, MachineState, Provider,
  ProviderError,
};

/// Provider named `Scripted` that supports a fixed set of actions.
///
/// Each provider instance gets a serial number from the factory so tests can
/// tell instances apart.
pub struct ScriptedProvider {
  pub serial: usize,
  supported: Vec<String>,
  state: Arc<Mutex<MachineState>>,
}

pub fn scripted_factory(supported: &[&str]) -> (Arc<ProviderFactory>, Arc<AtomicUsize>) {
  let supported: Vec<String> = supported.iter().map(|s| s.to_string()).collect();
  let built = Arc::new(AtomicUsize::new(0));
  let counter = built.clone();
  let factory: Arc<ProviderFactory> = Arc::new(move |_: Weak<Machine>| {
    let serial = counter.fetch_add(1, Ordering::SeqCst);
    Box::new(ScriptedProvider {
      serial,
      supported: supported.clone(),
      state: Arc::new(Mutex::new(MachineState::not_created())),
    }) as Box<dyn Provider>
  });
  (factory, built)
}

impl fmt::Display for ScriptedProvider {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Scripted#{}", self.serial)
  }
}

#[async_trait]
impl Provider for ScriptedProvider {
  fn action(&self, name: &ActionName) -> ActionLookup {
    if !self.supported.iter().any(|s| s == name.as_str()) {
      return ActionLookup::Unsupported;
    }
    let next = match name.as_str() {
      "up" => MachineState::running(),
      "halt" => MachineState::poweroff(),
      _ => MachineState::not_created(),
    };
    ActionLookup::executable(Transition {
      state: self.state.clone(),
      next,
    })
  }

  async fn state(&self) -> Result<MachineState, ProviderError> {
    Ok(self.state.lock().unwrap().clone())
  }
}

struct Transition {
  state: Arc<Mutex<MachineState>>,
  next: MachineState,
}

#[async_trait]
impl Callable for Transition {
  fn name(&self) -> &str {
    "scripted.transition"
  }

  async fn call(&self, _env: &mut ActionEnv) -> Result<(), ActionError> {
    *self.state.lock().unwrap() = self.next.clone();
    Ok(())
  }
}

/// Runner that executes the unit and counts invocations.
#[derive(Default)]
pub struct CountingRunner {
  pub calls: AtomicUsize,
}

impl CountingRunner {
  pub fn calls(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl ActionRunner for CountingRunner {
  async fn run(&self, callable: Arc<dyn Callable>, mut env: ActionEnv) -> Result<ActionEnv, ActionError> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    callable.call(&mut env).await?;
    env.insert("outcome", "ok");
    Ok(env)
  }
}

pub fn action(name: &str) -> ActionName {
  ActionName::new(name).unwrap()
}
