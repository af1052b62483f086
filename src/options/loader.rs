// src/options/loader.rs

use std::fs;
use std::path::Path;

use crate::errors::Result;
use crate::options::model::CreateOptions;

/// Load options from a TOML file.
///
/// This only performs deserialization; use [`load_and_validate`] to also
/// check that the options can produce a command.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<CreateOptions> {
    let contents = fs::read_to_string(path.as_ref())?;
    let opts: CreateOptions = toml::from_str(&contents)?;
    Ok(opts)
}

/// Load options from a TOML file and run [`CreateOptions::validate`].
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<CreateOptions> {
    let opts = load_from_path(path)?;
    opts.validate()?;
    Ok(opts)
}
