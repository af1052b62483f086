#![allow(dead_code)]

use std::path::PathBuf;

use procward::{CreateOptions, OutputMode};

/// Builder for `CreateOptions` to simplify test setup.
pub struct CreateOptionsBuilder {
    opts: CreateOptions,
}

impl CreateOptionsBuilder {
    /// Start from an explicit argv.
    pub fn new(args: &[&str]) -> Self {
        Self {
            opts: CreateOptions::new(args.iter().copied()),
        }
    }

    /// Start from a shell snippet run through `sh -c`.
    pub fn shell(cmd: &str) -> Self {
        Self {
            opts: CreateOptions::from_shell(cmd),
        }
    }

    /// `sleep <secs>`.
    pub fn sleep(secs: f64) -> Self {
        Self::new(&["sleep", &secs.to_string()])
    }

    pub fn tag(mut self, tag: &str) -> Self {
        self.opts.tags.push(tag.to_string());
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.opts
            .environment
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn override_environ(mut self, val: bool) -> Self {
        self.opts.override_environ = val;
        self
    }

    pub fn working_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.opts.working_directory = Some(dir.into());
        self
    }

    pub fn inherit_output(mut self) -> Self {
        self.opts.output = OutputMode::Inherit;
        self
    }

    pub fn build(self) -> CreateOptions {
        self.opts
    }
}
