//! System orchestration, startup, and shutdown logic.

pub mod inventory_system;
pub mod tracing_setup;

pub use inventory_system::*;
pub use tracing_setup::*;
