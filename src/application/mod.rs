//! Application layer: services, scenarios and cleanup
//!
//! This layer orchestrates domain logic and depends on the CLI client.

pub mod cleanup;
pub mod error;
pub mod scenarios;
pub mod services;

pub use cleanup::ResourceCleanup;
pub use error::{ApplicationError, ApplicationResult};
pub use scenarios::{FunctionalContext, Role, ScenarioError, ScenarioResult};
