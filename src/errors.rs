// src/errors.rs

//! Crate-wide error type and result alias.

use std::io;
use std::process::ExitStatus;
use std::sync::Arc;

use nix::errno::Errno;
use nix::sys::signal::Signal;
use thiserror::Error;

use crate::context::ContextError;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("invalid create options: {0}")]
    InvalidOptions(String),

    #[error("problem building command from options: {reason}")]
    Resolve { reason: ContextError },

    #[error("problem sending signal '{signal}' to '{id}': {source}")]
    Signal {
        signal: Signal,
        id: String,
        #[source]
        source: Errno,
    },

    #[error("cannot register nil trigger")]
    NilTrigger,

    #[error("cannot register trigger for complete process '{id}'")]
    TriggerOnComplete { id: String },

    #[error("context canceled while waiting for process '{id}' to exit: {reason}")]
    WaitCanceled { id: String, reason: ContextError },

    #[error("process '{id}' exited unsuccessfully: {status}")]
    Exit { id: String, status: ExitStatus },

    #[error("problem waiting for process '{id}': {source}")]
    Wait {
        id: String,
        #[source]
        source: Arc<io::Error>,
    },

    #[error("waiter for process '{id}' stopped without reporting an exit")]
    WaiterLost { id: String },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ProcessError {
    /// True when the error means "the caller stopped waiting", as opposed to
    /// the process having finished badly.
    pub fn is_canceled(&self) -> bool {
        matches!(self, ProcessError::WaitCanceled { .. })
    }

    /// Exit status carried by an unsuccessful exit, if any.
    pub fn exit_status(&self) -> Option<ExitStatus> {
        match self {
            ProcessError::Exit { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, ProcessError>;
