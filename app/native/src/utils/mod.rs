//! Small helpers shared across modules.

pub mod command;
pub mod thread;
