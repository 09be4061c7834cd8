//! A provider that manages no real resource.
//!
//! The dummy provider records lifecycle transitions in a state file under
//! the environment's data directory. It exists so the whole dispatch path
//! (lookup, runner, hooks, state query) can be driven end to end without a
//! hypervisor. It implements `up`, `halt` and `destroy`; every other action
//! is unsupported.

pub mod state;

use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Weak};

use async_trait::async_trait;
use tracing::info;

use crate::action::{ActionEnv, ActionError, ActionName, Callable};
use crate::machine::Machine;
use crate::provider::{ActionLookup, MachineState, Provider, ProviderError};

use state::DummyRecord;

pub struct DummyProvider {
  machine: Weak<Machine>,
}

impl DummyProvider {
  pub const NAME: &'static str = "dummy";

  pub fn new(machine: Weak<Machine>) -> Self {
    Self { machine }
  }

  fn machine(&self) -> Result<Arc<Machine>, ProviderError> {
    self
      .machine
      .upgrade()
      .ok_or_else(|| ProviderError::Detached(Self::NAME.to_string()))
  }
}

impl fmt::Display for DummyProvider {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("Dummy")
  }
}

#[async_trait]
impl Provider for DummyProvider {
  fn action(&self, name: &ActionName) -> ActionLookup {
    match name.as_str() {
      "up" => ActionLookup::executable(Up),
      "halt" => ActionLookup::executable(Halt),
      "destroy" => ActionLookup::executable(Destroy),
      _ => ActionLookup::Unsupported,
    }
  }

  async fn state(&self) -> Result<MachineState, ProviderError> {
    let machine = self.machine()?;
    let record = state::load(&data_dir(&machine), machine.name())?;
    Ok(record.map_or_else(MachineState::not_created, |r| r.state))
  }
}

fn data_dir(machine: &Machine) -> PathBuf {
  machine.env().data_dir().to_path_buf()
}

struct Up;

#[async_trait]
impl Callable for Up {
  fn name(&self) -> &str {
    "dummy.up"
  }

  async fn call(&self, env: &mut ActionEnv) -> Result<(), ActionError> {
    let machine = env.machine().clone();
    let data_dir = data_dir(&machine);

    let record = match state::load(&data_dir, machine.name())? {
      None => {
        info!(machine = machine.name(), box_name = %machine.box_ref().name, "creating machine");
        DummyRecord::new(MachineState::running(), &machine.box_ref().name)
      }
      Some(record) if record.state == MachineState::RUNNING => {
        info!(machine = machine.name(), "machine already running");
        env.insert("dummy.changed", false);
        return Ok(());
      }
      Some(record) => record.with_state(MachineState::running()),
    };

    state::save(&data_dir, machine.name(), &record)?;
    env.insert("dummy.changed", true);
    Ok(())
  }
}

struct Halt;

#[async_trait]
impl Callable for Halt {
  fn name(&self) -> &str {
    "dummy.halt"
  }

  async fn call(&self, env: &mut ActionEnv) -> Result<(), ActionError> {
    let machine = env.machine().clone();
    let data_dir = data_dir(&machine);

    let Some(record) = state::load(&data_dir, machine.name())? else {
      return Err(ActionError::Failed {
        action: env.action().clone(),
        message: format!("machine '{}' is not created", machine.name()),
      });
    };

    if record.state == MachineState::POWEROFF {
      env.insert("dummy.changed", false);
      return Ok(());
    }

    state::save(&data_dir, machine.name(), &record.with_state(MachineState::poweroff()))?;
    env.insert("dummy.changed", true);
    Ok(())
  }
}

struct Destroy;

#[async_trait]
impl Callable for Destroy {
  fn name(&self) -> &str {
    "dummy.destroy"
  }

  async fn call(&self, env: &mut ActionEnv) -> Result<(), ActionError> {
    let machine = env.machine().clone();
    let data_dir = data_dir(&machine);
    // An unreadable record must not block cleanup.
    let existed = state::machine_dir(&data_dir, machine.name())?.exists();

    state::remove(&data_dir, machine.name())?;
    info!(machine = machine.name(), existed, "machine destroyed");
    env.insert("dummy.changed", existed);
    Ok(())
  }
}
