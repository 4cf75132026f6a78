//! Session storage for pleadingd
//!
//! Workflow state lives in memory only; a background sweeper drops sessions
//! that have been idle longer than the configured TTL.

mod memory;
mod sweeper;

pub use memory::SessionStore;
pub use sweeper::SessionSweeper;
