//! Terminal host for `hemolog-core`.
//!
//! Executes the core's requests over ureq, renders toasts and lists to the
//! terminal, and reads the API key from persisted settings.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod settings;
pub mod terminal;
pub mod transport;

pub use commands::run;
