// src/process/os.rs

//! Thin wrappers over the OS calls the process state machine needs.

use nix::errno::Errno;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;

/// What the OS says about a child pid, without reaping it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    Alive,
    Exited { success: bool },
    /// The pid is no longer a child of ours (already reaped).
    Gone,
}

/// Ask the OS whether `pid` has exited.
///
/// Uses `WNOWAIT` so the exit status stays available for the real wait.
#[cfg(any(target_os = "linux", target_os = "android", target_os = "freebsd"))]
pub fn probe(pid: u32) -> Probe {
    use nix::sys::wait::{Id, WaitPidFlag, WaitStatus, waitid};

    let flags = WaitPidFlag::WEXITED | WaitPidFlag::WNOHANG | WaitPidFlag::WNOWAIT;
    match waitid(Id::Pid(Pid::from_raw(pid as i32)), flags) {
        Ok(WaitStatus::StillAlive) => Probe::Alive,
        Ok(WaitStatus::Exited(_, code)) => Probe::Exited { success: code == 0 },
        Ok(WaitStatus::Signaled(..)) => Probe::Exited { success: false },
        Ok(_) => Probe::Alive,
        Err(Errno::ECHILD) | Err(Errno::ESRCH) => Probe::Gone,
        Err(_) => Probe::Alive,
    }
}

/// Fallback without `waitid`: an unreaped zombie still counts as alive.
#[cfg(not(any(target_os = "linux", target_os = "android", target_os = "freebsd")))]
pub fn probe(pid: u32) -> Probe {
    match signal::kill(Pid::from_raw(pid as i32), Option::<Signal>::None) {
        Ok(()) => Probe::Alive,
        Err(Errno::ESRCH) => Probe::Gone,
        Err(_) => Probe::Alive,
    }
}

pub fn send_signal(pid: u32, sig: Signal) -> Result<(), Errno> {
    signal::kill(Pid::from_raw(pid as i32), sig)
}

/// Host name of the managing machine, empty if it can't be read.
pub fn hostname() -> String {
    nix::unistd::gethostname()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_default()
}
