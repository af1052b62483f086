// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, ValueEnum};
use nix::sys::signal::Signal;

use crate::errors::Result;
use crate::options::{CreateOptions, OutputMode, load_from_path};

/// Command-line arguments for `procward`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "procward",
    version,
    about = "Start a command, wait for it, and report how it ended.",
    long_about = None
)]
pub struct CliArgs {
    /// TOML file with create options (args, environment, tags, ...).
    ///
    /// Flags below are applied on top of the file.
    #[arg(long, value_name = "PATH")]
    pub options: Option<PathBuf>,

    /// Tag to attach to the process (repeatable).
    #[arg(long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,

    /// Extra environment variable for the child (repeatable).
    #[arg(long = "env", value_name = "KEY=VALUE", value_parser = parse_env_pair)]
    pub env: Vec<(String, String)>,

    /// Working directory for the child.
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Stop waiting after this many seconds.
    #[arg(long, value_name = "SECS", value_parser = parse_timeout)]
    pub timeout: Option<f64>,

    /// Signal to send if the wait times out (e.g. SIGTERM).
    #[arg(long, value_name = "SIGNAL", value_parser = parse_signal)]
    pub signal_on_timeout: Option<Signal>,

    /// Let the child write to our stdout/stderr instead of discarding it.
    #[arg(long)]
    pub inherit_output: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PROCWARD_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Command to run; replaces `args` from the options file if given.
    #[arg(last = true, value_name = "ARGV")]
    pub argv: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl CliArgs {
    /// Merge the options file (if any) with the flags.
    pub fn create_options(&self) -> Result<CreateOptions> {
        let mut opts = match self.options {
            Some(ref path) => load_from_path(path)?,
            None => CreateOptions::default(),
        };

        if !self.argv.is_empty() {
            opts.args = self.argv.clone();
        }
        opts.tags.extend(self.tags.iter().cloned());
        opts.environment.extend(self.env.iter().cloned());
        if let Some(ref dir) = self.cwd {
            opts.working_directory = Some(dir.clone());
        }
        if self.inherit_output {
            opts.output = OutputMode::Inherit;
        }

        opts.validate()?;
        Ok(opts)
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

fn parse_env_pair(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("invalid environment pair: {s} (expected KEY=VALUE)")),
    }
}

fn parse_timeout(s: &str) -> std::result::Result<f64, String> {
    match s.trim().parse::<f64>() {
        Ok(secs) if secs.is_finite() && secs > 0.0 => Ok(secs),
        _ => Err(format!("invalid timeout: {s} (expected a positive number of seconds)")),
    }
}

fn parse_signal(s: &str) -> std::result::Result<Signal, String> {
    let name = s.trim().to_uppercase();
    let name = if name.starts_with("SIG") {
        name
    } else {
        format!("SIG{name}")
    };
    Signal::from_str(&name).map_err(|_| format!("unknown signal: {s}"))
}
