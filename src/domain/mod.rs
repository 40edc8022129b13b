//! Domain layer: entities, CLI output parsing and errors
//!
//! This layer is independent of external concerns (no process execution, no config loading).

pub mod entities;
pub mod error;
pub mod table;

pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use table::{listing, table, Table};
