// src/options/model.rs

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Everything needed to build the command for one process.
///
/// Maps directly onto a TOML file:
///
/// ```toml
/// args = ["sh", "-c", "sleep 1"]
/// working_directory = "/tmp"
/// tags = ["nightly", "build"]
/// output = "inherit"
///
/// [environment]
/// RUST_LOG = "debug"
/// ```
///
/// All fields are optional when deserializing; an empty `args` is caught by
/// [`CreateOptions::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOptions {
    /// Program followed by its arguments.
    #[serde(default)]
    pub args: Vec<String>,

    /// Extra environment variables for the child.
    #[serde(default)]
    pub environment: BTreeMap<String, String>,

    /// Start from an empty environment instead of inheriting ours.
    #[serde(default)]
    pub override_environ: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_directory: Option<PathBuf>,

    /// Tags applied at construction. On a [`crate::ProcessInfo`] this holds
    /// the process's ordered tag sequence at snapshot time.
    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub output: OutputMode,
}

/// What the child's stdout/stderr are connected to.
///
/// Output is never captured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Discard output (`/dev/null`).
    #[default]
    Null,
    /// Share the managing program's stdout/stderr.
    Inherit,
}

impl CreateOptions {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Run `cmd` through `sh -c`.
    pub fn from_shell(cmd: impl Into<String>) -> Self {
        Self::new(["sh".to_string(), "-c".to_string(), cmd.into()])
    }

    pub fn program(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }
}
