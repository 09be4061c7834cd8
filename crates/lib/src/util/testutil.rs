//! Test utilities for vessel-lib.
//!
//! Fake providers and runners for exercising the dispatch path without
//! touching the filesystem.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Weak};

use async_trait::async_trait;

use crate::action::{ActionEnv, ActionError, ActionName, Callable};
use crate::environment::Environment;
use crate::execute::{ActionRunner, Runner};
use crate::machine::Machine;
use crate::provider::{ActionLookup, MachineState, Provider, ProviderError, ProviderFactory};

/// Environment with the default runner and no configured machines.
pub fn bare_environment() -> Arc<Environment> {
  Arc::new(Environment::new(Arc::new(Runner::new())))
}

/// Provider supporting a fixed set of actions over an in-memory state.
///
/// `up` moves the state to `running`, `halt` to `poweroff`, anything else
/// supported to `not_created`.
pub struct StaticProvider {
  supported: Vec<&'static str>,
  state: Arc<Mutex<MachineState>>,
  unreachable: bool,
}

impl StaticProvider {
  pub fn new(supported: &[&'static str]) -> Self {
    Self {
      supported: supported.to_vec(),
      state: Arc::new(Mutex::new(MachineState::not_created())),
      unreachable: false,
    }
  }

  pub fn factory(supported: &[&'static str]) -> Arc<ProviderFactory> {
    let supported = supported.to_vec();
    Arc::new(move |_: Weak<Machine>| Box::new(StaticProvider::new(&supported)) as Box<dyn Provider>)
  }

  pub fn factory_with_state(supported: &[&'static str], state: &'static str) -> Arc<ProviderFactory> {
    let supported = supported.to_vec();
    Arc::new(move |_: Weak<Machine>| {
      let provider = StaticProvider::new(&supported);
      *provider.state.lock().unwrap() = MachineState::new(state);
      Box::new(provider) as Box<dyn Provider>
    })
  }

  pub fn factory_unreachable() -> Arc<ProviderFactory> {
    Arc::new(|_: Weak<Machine>| {
      let mut provider = StaticProvider::new(&[]);
      provider.unreachable = true;
      Box::new(provider) as Box<dyn Provider>
    })
  }

  /// Factory that counts how many providers it has built.
  pub fn counting_factory() -> (Arc<ProviderFactory>, Arc<AtomicUsize>) {
    let built = Arc::new(AtomicUsize::new(0));
    let counter = built.clone();
    let factory: Arc<ProviderFactory> = Arc::new(move |_: Weak<Machine>| {
      counter.fetch_add(1, Ordering::SeqCst);
      Box::new(StaticProvider::new(&["up"])) as Box<dyn Provider>
    });
    (factory, built)
  }

  /// Factory that keeps the back-reference it was handed.
  pub fn capturing_factory() -> (Arc<ProviderFactory>, Arc<Mutex<Option<Weak<Machine>>>>) {
    let slot = Arc::new(Mutex::new(None));
    let captured = slot.clone();
    let factory: Arc<ProviderFactory> = Arc::new(move |machine: Weak<Machine>| {
      *captured.lock().unwrap() = Some(machine);
      Box::new(StaticProvider::new(&[])) as Box<dyn Provider>
    });
    (factory, slot)
  }
}

impl fmt::Display for StaticProvider {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("StaticProvider")
  }
}

#[async_trait]
impl Provider for StaticProvider {
  fn action(&self, name: &ActionName) -> ActionLookup {
    if !self.supported.iter().any(|s| *s == name.as_str()) {
      return ActionLookup::Unsupported;
    }
    let next = match name.as_str() {
      "up" => MachineState::running(),
      "halt" => MachineState::poweroff(),
      _ => MachineState::not_created(),
    };
    ActionLookup::executable(SetState {
      state: self.state.clone(),
      next,
    })
  }

  async fn state(&self) -> Result<MachineState, ProviderError> {
    if self.unreachable {
      return Err(ProviderError::Unreachable("host down".to_string()));
    }
    Ok(self.state.lock().unwrap().clone())
  }
}

struct SetState {
  state: Arc<Mutex<MachineState>>,
  next: MachineState,
}

#[async_trait]
impl Callable for SetState {
  fn name(&self) -> &str {
    "static.set_state"
  }

  async fn call(&self, _env: &mut ActionEnv) -> Result<(), ActionError> {
    *self.state.lock().unwrap() = self.next.clone();
    Ok(())
  }
}

enum Behaviour {
  /// Return the env without calling the unit.
  Succeed,
  /// Call the unit, then return the env.
  Execute,
  /// Fail without calling the unit.
  Fail(&'static str),
}

/// Runner that counts invocations and remembers the machine it was handed.
pub struct RecordingRunner {
  pub calls: AtomicUsize,
  last_machine: Mutex<Option<Weak<Machine>>>,
  behaviour: Behaviour,
}

impl RecordingRunner {
  fn with(behaviour: Behaviour) -> Self {
    Self {
      calls: AtomicUsize::new(0),
      last_machine: Mutex::new(None),
      behaviour,
    }
  }

  pub fn succeeding() -> Self {
    Self::with(Behaviour::Succeed)
  }

  pub fn executing() -> Self {
    Self::with(Behaviour::Execute)
  }

  pub fn failing(message: &'static str) -> Self {
    Self::with(Behaviour::Fail(message))
  }

  pub fn last_machine(&self) -> Option<Arc<Machine>> {
    self.last_machine.lock().unwrap().as_ref().and_then(Weak::upgrade)
  }
}

#[async_trait]
impl ActionRunner for RecordingRunner {
  async fn run(&self, callable: Arc<dyn Callable>, mut env: ActionEnv) -> Result<ActionEnv, ActionError> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    *self.last_machine.lock().unwrap() = Some(Arc::downgrade(env.machine()));

    match self.behaviour {
      Behaviour::Succeed => {}
      Behaviour::Execute => callable.call(&mut env).await?,
      Behaviour::Fail(message) => {
        return Err(ActionError::Failed {
          action: env.action().clone(),
          message: message.to_string(),
        });
      }
    }

    env.insert("runner.marker", "recorded");
    Ok(env)
  }
}
