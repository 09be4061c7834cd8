//! Executable action units.
//!
//! A provider answers an action lookup with a [`Callable`]. Machines never
//! call it themselves: the unit is handed to the environment's
//! [`ActionRunner`](crate::execute::ActionRunner) together with an
//! [`ActionEnv`], so hooks and logging apply the same way to every provider.
//!
//! # Types
//!
//! - [`ActionName`] - Validated action identifier (`up`, `halt`, ...)
//! - [`ActionEnv`] - Context bundle passed through the pipeline
//! - [`Callable`] - A unit of work resolved from a provider
//! - [`Sequence`] - Several callables run in order as one unit

mod env;
mod types;

pub use env::ActionEnv;
pub use types::*;
pub(crate) use types::is_identifier;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

/// A unit of work produced by a provider for one action.
#[async_trait]
pub trait Callable: Send + Sync {
  /// Short label used in logs.
  fn name(&self) -> &str;

  async fn call(&self, env: &mut ActionEnv) -> Result<(), ActionError>;
}

/// Runs a list of callables in order.
///
/// Stops at the first error, or without error as soon as a step calls
/// [`ActionEnv::halt`].
#[derive(Clone, Default)]
pub struct Sequence {
  name: String,
  steps: Vec<Arc<dyn Callable>>,
}

impl Sequence {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      steps: Vec::new(),
    }
  }

  pub fn then(mut self, step: impl Callable + 'static) -> Self {
    self.steps.push(Arc::new(step));
    self
  }

  pub fn len(&self) -> usize {
    self.steps.len()
  }

  pub fn is_empty(&self) -> bool {
    self.steps.is_empty()
  }
}

#[async_trait]
impl Callable for Sequence {
  fn name(&self) -> &str {
    &self.name
  }

  async fn call(&self, env: &mut ActionEnv) -> Result<(), ActionError> {
    for (index, step) in self.steps.iter().enumerate() {
      if env.is_halted() {
        debug!(sequence = %self.name, index, "sequence halted");
        break;
      }
      debug!(sequence = %self.name, step = step.name(), index, "running step");
      step.call(env).await?;
    }
    Ok(())
  }
}
