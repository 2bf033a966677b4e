//! albumwall - rotates the desktop background through an Imgur album.
//!
//! Global hotkeys submit commands to a priority queue that a single
//! dispatcher thread drains. The library also provides the CLI.

pub mod album;
pub mod app;
pub mod cache;
pub mod cli;
pub mod config;
pub mod dialogs;
pub mod dispatch;
pub mod error;
pub mod hotkey;
pub mod logging;
pub mod platform;
pub mod schema;
pub mod state;

mod utils;

#[cfg(test)]
mod testing;

pub use app::run;
