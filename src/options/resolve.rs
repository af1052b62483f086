// src/options/resolve.rs

//! Validation and resolution of [`CreateOptions`] into a runnable command.

use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::context::Context;
use crate::errors::{ProcessError, Result};
use crate::options::model::{CreateOptions, OutputMode};

impl CreateOptions {
    /// Check the options without touching the OS beyond a `stat` of the
    /// working directory.
    pub fn validate(&self) -> Result<()> {
        ensure_has_program(self)?;
        validate_environment(self)?;
        validate_working_directory(self)?;
        Ok(())
    }

    /// Build a ready-to-start command.
    ///
    /// Fails if the options are invalid or `ctx` is already done. The
    /// returned command has not been spawned.
    pub fn resolve(&self, ctx: &Context) -> Result<Command> {
        if let Some(reason) = ctx.err() {
            return Err(ProcessError::Resolve { reason });
        }

        self.validate()?;

        let mut cmd = Command::new(&self.args[0]);
        cmd.args(&self.args[1..]);

        if self.override_environ {
            cmd.env_clear();
        }
        cmd.envs(&self.environment);

        if let Some(ref dir) = self.working_directory {
            cmd.current_dir(dir);
        }

        cmd.stdin(Stdio::null());
        match self.output {
            OutputMode::Null => {
                cmd.stdout(Stdio::null()).stderr(Stdio::null());
            }
            OutputMode::Inherit => {
                cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
            }
        }

        debug!(args = ?self.args, cwd = ?self.working_directory, "resolved command");

        Ok(cmd)
    }
}

fn ensure_has_program(opts: &CreateOptions) -> Result<()> {
    match opts.program() {
        None => Err(ProcessError::InvalidOptions(
            "args must contain at least the program to run".to_string(),
        )),
        Some(p) if p.trim().is_empty() => Err(ProcessError::InvalidOptions(
            "program name (args[0]) cannot be empty".to_string(),
        )),
        Some(_) => Ok(()),
    }
}

fn validate_environment(opts: &CreateOptions) -> Result<()> {
    for key in opts.environment.keys() {
        if key.is_empty() || key.contains('=') || key.contains('\0') {
            return Err(ProcessError::InvalidOptions(format!(
                "invalid environment variable name '{}'",
                key
            )));
        }
    }
    Ok(())
}

fn validate_working_directory(opts: &CreateOptions) -> Result<()> {
    let Some(ref dir) = opts.working_directory else {
        return Ok(());
    };

    if !dir.is_dir() {
        return Err(ProcessError::InvalidOptions(format!(
            "working directory {:?} does not exist or is not a directory",
            dir
        )));
    }
    Ok(())
}
