//! vessel-lib: managed machine handles over swappable providers.
//!
//! This crate provides the types vessel is built from:
//! - `Machine`: stable identity of a managed resource, bound to one provider
//! - `Provider`: the backend contract (resolve an action, report state)
//! - `ActionRunner`: the pipeline every resolved action runs through
//! - `Environment`: the shared context machines are built from

pub mod action;
pub mod config;
pub mod consts;
pub mod environment;
pub mod execute;
pub mod machine;
pub mod platform;
pub mod provider;
pub mod util;

pub use action::{ActionEnv, ActionError, ActionName, Callable};
pub use environment::{Environment, EnvironmentError};
pub use execute::{ActionRunner, Hook, Runner};
pub use machine::{BoxRef, Machine, MachineConfig, MachineError};
pub use provider::{ActionLookup, MachineState, Provider, ProviderError, ProviderRegistry};
