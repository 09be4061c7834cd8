//! Managed machine handles.
//!
//! A [`Machine`] is the stable identity of one managed resource. It binds a
//! name, a box, its configuration and its environment to exactly one
//! provider, and forwards every lifecycle request to that provider:
//!
//! - [`Machine::action`] resolves the action on the provider and runs the
//!   resulting unit through the environment's action runner
//! - [`Machine::state`] asks the provider directly, bypassing the runner
//!
//! The machine keeps no volatile state of its own. Whether it is running,
//! and anything else that changes, is always queried from the provider.

mod types;

pub use types::{BoxRef, MachineConfig};

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::action::{ActionEnv, ActionError, ActionName};
use crate::environment::Environment;
use crate::provider::{ActionLookup, MachineState, Provider, ProviderError, ProviderFactory};

/// Errors returned by [`Machine`] operations.
#[derive(Debug, Error)]
pub enum MachineError {
  /// The bound provider does not implement the requested action.
  #[error("the {provider} provider does not implement the '{action}' action")]
  UnimplementedProviderAction { action: ActionName, provider: String },

  /// The action runner or the executed unit failed.
  #[error(transparent)]
  Action(#[from] ActionError),

  /// The provider could not report the machine's state.
  #[error(transparent)]
  State(#[from] ProviderError),
}

/// A managed machine bound to one provider for its whole lifetime.
pub struct Machine {
  name: String,
  box_ref: BoxRef,
  config: MachineConfig,
  env: Arc<Environment>,
  provider: Box<dyn Provider>,
}

impl Machine {
  /// Create a machine and its provider.
  ///
  /// `factory` runs exactly once, receiving a back-reference to the machine
  /// under construction. The returned provider stays bound to this machine
  /// for its whole lifetime.
  pub fn new(
    name: impl Into<String>,
    factory: &ProviderFactory,
    config: MachineConfig,
    box_ref: BoxRef,
    env: Arc<Environment>,
  ) -> Arc<Self> {
    let name = name.into();
    debug!(machine = %name, box_name = %box_ref.name, "creating machine");

    Arc::new_cyclic(|me| Self {
      provider: factory(me.clone()),
      name,
      box_ref,
      config,
      env,
    })
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn box_ref(&self) -> &BoxRef {
    &self.box_ref
  }

  pub fn config(&self) -> &MachineConfig {
    &self.config
  }

  pub fn env(&self) -> &Arc<Environment> {
    &self.env
  }

  /// Descriptor of the bound provider, as used in dispatch errors.
  pub fn provider(&self) -> String {
    self.provider.to_string()
  }

  /// Run an action on this machine.
  ///
  /// Fails with [`MachineError::UnimplementedProviderAction`] without touching
  /// the action runner if the provider does not implement `name`. Otherwise
  /// returns whatever the runner returns.
  pub async fn action(self: &Arc<Self>, name: &ActionName) -> Result<ActionEnv, MachineError> {
    let callable = match self.provider.action(name) {
      ActionLookup::Executable(callable) => callable,
      ActionLookup::Unsupported => {
        debug!(machine = %self.name, action = %name, provider = %self.provider, "action not implemented by provider");
        return Err(MachineError::UnimplementedProviderAction {
          action: name.clone(),
          provider: self.provider.to_string(),
        });
      }
    };

    let env = ActionEnv::new(Arc::clone(self), name.clone());
    Ok(self.env.action_runner().run(callable, env).await?)
  }

  /// The machine's current state, as reported by the provider.
  pub async fn state(&self) -> Result<MachineState, MachineError> {
    Ok(self.provider.state().await?)
  }
}

impl fmt::Debug for Machine {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Machine")
      .field("name", &self.name)
      .field("box_ref", &self.box_ref)
      .field("config", &self.config)
      .field("provider", &self.provider.to_string())
      .finish_non_exhaustive()
  }
}
