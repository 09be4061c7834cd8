//! Action execution pipeline.
//!
//! Every resolved action unit is run through an [`ActionRunner`] owned by
//! the environment. The runner is where cross-cutting behaviour lives, so it
//! applies the same way no matter which provider produced the unit:
//! - Global values propagated into every [`ActionEnv`]
//! - [`Hook`]s run before and after the unit
//! - Structured logging of each run

mod hooks;

pub use hooks::Hook;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::action::{ActionEnv, ActionError, Callable};

/// Runs an action unit against its context.
///
/// Returns the env after the run, including anything the unit or hooks put
/// into it. Errors from the unit or hooks are returned as-is.
#[async_trait]
pub trait ActionRunner: Send + Sync {
  async fn run(&self, callable: Arc<dyn Callable>, env: ActionEnv) -> Result<ActionEnv, ActionError>;
}

/// The default action runner.
#[derive(Clone, Default)]
pub struct Runner {
  globals: BTreeMap<String, Value>,
  hooks: Vec<Arc<dyn Hook>>,
}

impl Runner {
  pub fn new() -> Self {
    Self::default()
  }

  /// Value seeded into every env this runner sees.
  ///
  /// Values already present in the env take precedence.
  pub fn with_global(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
    self.globals.insert(key.into(), value.into());
    self
  }

  pub fn with_globals(mut self, globals: impl IntoIterator<Item = (String, Value)>) -> Self {
    self.globals.extend(globals);
    self
  }

  /// Register a hook. `before` runs in registration order, `after` in reverse.
  pub fn with_hook(mut self, hook: impl Hook + 'static) -> Self {
    self.hooks.push(Arc::new(hook));
    self
  }

  pub fn globals(&self) -> &BTreeMap<String, Value> {
    &self.globals
  }

  pub fn hook_count(&self) -> usize {
    self.hooks.len()
  }
}

#[async_trait]
impl ActionRunner for Runner {
  async fn run(&self, callable: Arc<dyn Callable>, mut env: ActionEnv) -> Result<ActionEnv, ActionError> {
    let started = Instant::now();
    let machine = env.machine().name().to_string();
    let action = env.action().clone();

    info!(machine = %machine, action = %action, unit = callable.name(), "running action");

    for (key, value) in &self.globals {
      env.insert_default(key.clone(), value.clone());
    }

    for hook in &self.hooks {
      debug!(machine = %machine, action = %action, hook = hook.name(), "before hook");
      if let Err(e) = hook.before(&mut env).await {
        error!(machine = %machine, action = %action, hook = hook.name(), error = %e, "hook failed");
        return Err(e);
      }
    }

    if let Err(e) = callable.call(&mut env).await {
      error!(machine = %machine, action = %action, error = %e, "action failed");
      return Err(e);
    }

    for hook in self.hooks.iter().rev() {
      debug!(machine = %machine, action = %action, hook = hook.name(), "after hook");
      if let Err(e) = hook.after(&mut env).await {
        error!(machine = %machine, action = %action, hook = hook.name(), error = %e, "hook failed");
        return Err(e);
      }
    }

    info!(
      machine = %machine,
      action = %action,
      elapsed_ms = started.elapsed().as_millis() as u64,
      "action complete"
    );

    Ok(env)
  }
}
