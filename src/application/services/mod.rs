//! Application services
//!
//! Concrete service implementations over the CLI client.
//! Services depend on the `CommandRunner` boundary through `CliClient`
//! but are themselves concrete structs, not traits.

mod share_types;
pub mod waiter;

pub use share_types::{ShareTypeService, SHARE_TYPE_NOT_FOUND_MSG};
pub use waiter::{poll_until, wait_for_resource_deletion, DeletionCheck};
