// src/options/mod.rs

//! Options resolution: turning a description of a command into a
//! ready-to-start `tokio::process::Command`.
//!
//! - [`model`] holds [`CreateOptions`] and its serde mapping.
//! - [`resolve`] validates options and builds the command.
//! - [`loader`] reads options from TOML files.

pub mod loader;
pub mod model;
pub mod resolve;

pub use loader::{load_and_validate, load_from_path};
pub use model::{CreateOptions, OutputMode};
