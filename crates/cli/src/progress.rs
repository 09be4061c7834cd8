//! Terminal progress for actions run from the CLI.

use async_trait::async_trait;

use vessel_lib::{ActionEnv, ActionError, Hook};

use crate::output::{print_step, print_success};

/// Prints a line when an action starts and when it finishes.
pub struct Progress;

#[async_trait]
impl Hook for Progress {
  fn name(&self) -> &str {
    "progress"
  }

  async fn before(&self, env: &mut ActionEnv) -> Result<(), ActionError> {
    print_step(&format!("{}: running '{}'", env.machine().name(), env.action()));
    Ok(())
  }

  async fn after(&self, env: &mut ActionEnv) -> Result<(), ActionError> {
    print_success(&format!("{}: '{}' complete", env.machine().name(), env.action()));
    Ok(())
  }
}
