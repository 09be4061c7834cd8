use async_trait::async_trait;

use crate::action::{ActionEnv, ActionError};

/// Behaviour layered around every action the runner executes.
///
/// Returning an error from `before` aborts the run before the unit is
/// called; `after` only runs once the unit has succeeded.
#[async_trait]
pub trait Hook: Send + Sync {
  fn name(&self) -> &str;

  async fn before(&self, _env: &mut ActionEnv) -> Result<(), ActionError> {
    Ok(())
  }

  async fn after(&self, _env: &mut ActionEnv) -> Result<(), ActionError> {
    Ok(())
  }
}
