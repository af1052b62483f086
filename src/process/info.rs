// src/process/info.rs

use serde::{Deserialize, Serialize};

use crate::options::CreateOptions;

/// Point-in-time snapshot of a process.
///
/// Built on demand and never mutated afterwards. This is the only data
/// handed to triggers and outside observers, so the field set is kept
/// stable for anything that serializes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessInfo {
    pub id: String,
    pub options: CreateOptions,
    pub host: String,
    pub complete: bool,
    pub running: bool,
    /// Only meaningful when `complete` is true.
    pub successful: bool,
    /// OS pid, present only while the process is running.
    pub pid: Option<u32>,
}
