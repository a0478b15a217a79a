//! # ECL app
//!
//! Application layer for ECL worlds:
//! - **Settings** loaded from `ecl.toml`
//! - **Logging** through a `tracing` fmt subscriber
//! - **Launcher** and the per-frame driver [`App`]

pub mod config;
pub mod demo;
pub mod launcher;
pub mod logging;

pub use config::Settings;
pub use launcher::{App, Launcher, RunStats};
