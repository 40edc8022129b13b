//! Infrastructure layer: process execution, CLI client and DI container
//!
//! This layer implements the I/O boundary traits and wires up services.

pub mod cli_client;
pub mod di;
pub mod error;
pub mod traits;

pub use cli_client::{CliClient, CmdOptions};
pub use error::{InfraError, InfraResult};
