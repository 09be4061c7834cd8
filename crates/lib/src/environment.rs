//! The environment a set of machines belongs to.
//!
//! An [`Environment`] owns the services its machines share: the action
//! runner every action goes through, the provider registry, the parsed
//! environment file and the data directory. It builds [`Machine`] handles on
//! demand from the configured definitions; it does not keep them, so
//! machines can hold a reference back to their environment without a cycle.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::config::{ConfigError, EnvironmentConfig};
use crate::execute::{ActionRunner, Runner};
use crate::machine::Machine;
use crate::platform::paths;
use crate::provider::ProviderRegistry;

/// Errors building machines from an environment.
#[derive(Debug, Error)]
pub enum EnvironmentError {
  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error("no machine named '{0}' in this environment")]
  UnknownMachine(String),

  #[error("machine '{machine}' uses unknown provider '{provider}'")]
  UnknownProvider { machine: String, provider: String },
}

/// Shared context that machines are built from.
pub struct Environment {
  root_dir: PathBuf,
  data_dir: PathBuf,
  config: EnvironmentConfig,
  providers: ProviderRegistry,
  runner: Arc<dyn ActionRunner>,
}

impl Environment {
  /// Environment with no machines, the built-in providers and the default
  /// data directory.
  pub fn new(runner: Arc<dyn ActionRunner>) -> Self {
    Self {
      root_dir: PathBuf::from("."),
      data_dir: paths::data_dir(),
      config: EnvironmentConfig::default(),
      providers: ProviderRegistry::builtin(),
      runner,
    }
  }

  /// Load an environment file.
  ///
  /// The runner is seeded with the file's `[globals]`, and every machine's
  /// provider must be registered in the built-in registry.
  pub fn load(path: &Path, runner: Runner) -> Result<Arc<Self>, EnvironmentError> {
    let config = EnvironmentConfig::load(path)?;
    let runner = runner.with_globals(config.globals.clone());
    let root_dir = path
      .parent()
      .filter(|p| !p.as_os_str().is_empty())
      .map(Path::to_path_buf)
      .unwrap_or_else(|| PathBuf::from("."));

    let env = Self::new(Arc::new(runner)).with_root_dir(root_dir).with_config(config)?;
    info!(
      path = %path.display(),
      machines = env.config.machines.len(),
      data_dir = %env.data_dir.display(),
      "environment loaded"
    );
    Ok(Arc::new(env))
  }

  /// Replace the machine definitions, checking that every provider is known.
  pub fn with_config(mut self, config: EnvironmentConfig) -> Result<Self, EnvironmentError> {
    for def in &config.machines {
      if !self.providers.contains(&def.provider) {
        return Err(EnvironmentError::UnknownProvider {
          machine: def.name.clone(),
          provider: def.provider.clone(),
        });
      }
    }
    self.config = config;
    Ok(self)
  }

  /// Replace the provider registry. Call before [`with_config`](Self::with_config).
  pub fn with_providers(mut self, providers: ProviderRegistry) -> Self {
    self.providers = providers;
    self
  }

  pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
    self.data_dir = data_dir.into();
    self
  }

  pub fn with_root_dir(mut self, root_dir: impl Into<PathBuf>) -> Self {
    self.root_dir = root_dir.into();
    self
  }

  /// The pipeline every machine action runs through.
  pub fn action_runner(&self) -> &Arc<dyn ActionRunner> {
    &self.runner
  }

  pub fn config(&self) -> &EnvironmentConfig {
    &self.config
  }

  pub fn providers(&self) -> &ProviderRegistry {
    &self.providers
  }

  /// Directory containing the environment file.
  pub fn root_dir(&self) -> &Path {
    &self.root_dir
  }

  pub fn data_dir(&self) -> &Path {
    &self.data_dir
  }

  pub fn machine_names(&self) -> impl Iterator<Item = &str> {
    self.config.machine_names()
  }

  /// Build the machine handle for a configured machine.
  pub fn machine(self: &Arc<Self>, name: &str) -> Result<Arc<Machine>, EnvironmentError> {
    let def = self
      .config
      .machine(name)
      .ok_or_else(|| EnvironmentError::UnknownMachine(name.to_string()))?;
    let factory = self
      .providers
      .get(&def.provider)
      .ok_or_else(|| EnvironmentError::UnknownProvider {
        machine: def.name.clone(),
        provider: def.provider.clone(),
      })?;

    Ok(Machine::new(
      def.name.clone(),
      factory.as_ref(),
      def.config.clone(),
      def.box_ref.clone(),
      Arc::clone(self),
    ))
  }

  /// Build handles for every configured machine, in definition order.
  pub fn machines(self: &Arc<Self>) -> Result<Vec<Arc<Machine>>, EnvironmentError> {
    self.machine_names().map(|name| self.machine(name)).collect()
  }
}

impl fmt::Debug for Environment {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Environment")
      .field("root_dir", &self.root_dir)
      .field("data_dir", &self.data_dir)
      .field("config", &self.config)
      .field("providers", &self.providers)
      .finish_non_exhaustive()
  }
}
