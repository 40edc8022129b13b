//! Functional-test client for the manila share-type CLI.
//!
//! Runs `manila`/`openstack` commands with keystone credentials, parses their
//! ASCII-table output and waits for eventually-consistent deletions.
//!
//! Layers:
//! - [`domain`]: records, share types, table parser, errors
//! - [`application`]: share type service, deletion waiter, scenarios
//! - [`infrastructure`]: process runner, CLI client, wiring
//! - [`config`]: layered settings

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod util;

pub use application::{ApplicationError, ApplicationResult, FunctionalContext, Role};
pub use config::Settings;
pub use infrastructure::di::ServiceContainer;
