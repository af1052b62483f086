// src/process/basic.rs

//! Unsynchronized process bound to one OS child.

use std::io;
use std::process::ExitStatus;
use std::sync::Arc;

use async_trait::async_trait;
use nix::errno::Errno;
use nix::sys::signal::Signal;
use tokio::process::Child;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::context::Context;
use crate::errors::{ProcessError, Result};
use crate::options::CreateOptions;
use crate::process::info::ProcessInfo;
use crate::process::os::{self, Probe};
use crate::process::tags::TagSet;
use crate::process::trigger::{Trigger, TriggerSequence};
use crate::process::Process;

/// Result of the native wait, as published by the background waiter.
type Outcome = std::result::Result<ExitStatus, Arc<io::Error>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Spawning failed; there never was an OS process.
    FailedStart,
    Running(u32),
    Exited { success: bool },
}

impl State {
    fn complete(self) -> bool {
        matches!(self, State::FailedStart | State::Exited { .. })
    }

    fn running(self) -> bool {
        matches!(self, State::Running(_))
    }
}

/// A process that owns exactly one OS child.
///
/// Not internally synchronized: every mutation needs `&mut self`, and the
/// type is deliberately not `Clone`. To share it between tasks wrap it in a
/// [`crate::ThreadSafeProcess`] (or build it with [`crate::spawn_process`],
/// which does that for you).
///
/// The child is spawned during construction; there is no "created but not
/// started" state. A spawn failure is not an error here: the process simply
/// starts out complete and never running.
#[derive(Debug)]
pub struct BasicProcess {
    id: String,
    host: String,
    opts: CreateOptions,
    pid: Option<u32>,
    /// Held until the first wait hands it to the background waiter.
    child: Option<Child>,
    waiter: Option<watch::Receiver<Option<Outcome>>>,
    /// Exit observed by a wait; set at most once.
    observed: Option<Outcome>,
    tags: TagSet,
    triggers: TriggerSequence,
}

impl BasicProcess {
    /// Resolve `opts` into a command and start it.
    ///
    /// Only option resolution can fail. Must be called from within a Tokio
    /// runtime.
    pub fn start(ctx: &Context, mut opts: CreateOptions) -> Result<Self> {
        let mut cmd = opts.resolve(ctx)?;
        let id = Uuid::new_v4().to_string();

        let (child, pid) = match cmd.spawn() {
            Ok(child) => {
                let pid = child.id();
                info!(id = %id, pid = ?pid, program = ?opts.program(), "started process");
                (Some(child), pid)
            }
            Err(err) => {
                warn!(
                    id = %id,
                    program = ?opts.program(),
                    error = %err,
                    "process failed to start"
                );
                (None, None)
            }
        };

        let initial_tags = std::mem::take(&mut opts.tags);
        let mut process = BasicProcess {
            id,
            host: os::hostname(),
            opts,
            pid,
            child,
            waiter: None,
            observed: None,
            tags: TagSet::default(),
            triggers: TriggerSequence::default(),
        };

        for t in &initial_tags {
            process.tags.tag(t);
        }

        Ok(process)
    }

    fn reaped(&self) -> Option<Outcome> {
        if let Some(ref outcome) = self.observed {
            return Some(outcome.clone());
        }
        self.waiter.as_ref().and_then(|rx| rx.borrow().clone())
    }

    fn state(&self) -> State {
        let Some(pid) = self.pid else {
            return State::FailedStart;
        };

        if let Some(outcome) = self.reaped() {
            return State::Exited {
                success: matches!(outcome, Ok(status) if status.success()),
            };
        }

        match os::probe(pid) {
            Probe::Exited { success } => State::Exited { success },
            // Only the waiter reaps, and it publishes right after. Until then
            // the real status is unknown, so keep reporting the process as
            // running rather than guessing at its success.
            Probe::Alive | Probe::Gone => State::Running(pid),
        }
    }

    /// Pid that may still be signalled: not yet reaped by the waiter.
    fn signalable_pid(&self) -> Option<u32> {
        let pid = self.pid?;
        if self.reaped().is_some() || os::probe(pid) == Probe::Gone {
            return None;
        }
        Some(pid)
    }

    fn snapshot(&self) -> ProcessInfo {
        let state = self.state();

        let mut options = self.opts.clone();
        options.tags = self.tags.ordered().to_vec();

        ProcessInfo {
            id: self.id.clone(),
            options,
            host: self.host.clone(),
            complete: state.complete(),
            running: state.running(),
            successful: matches!(state, State::Exited { success: true }),
            pid: match state {
                State::Running(pid) => Some(pid),
                _ => None,
            },
        }
    }

    /// Hand the child to a background task that performs the native wait
    /// and publishes the outcome. Only ever spawns one waiter.
    fn ensure_waiter(&mut self) -> Option<watch::Receiver<Option<Outcome>>> {
        if self.waiter.is_none() {
            let mut child = self.child.take()?;
            let (tx, rx) = watch::channel(None);
            let id = self.id.clone();

            tokio::spawn(async move {
                let outcome = child.wait().await.map_err(Arc::new);
                debug!(id = %id, outcome = ?outcome, "process reaped");

                // Fails only if the process object is gone; the exit has been
                // reaped either way.
                if tx.send(Some(outcome)).is_err() {
                    debug!(id = %id, "no listener for exit status");
                }
            });

            self.waiter = Some(rx);
        }
        self.waiter.clone()
    }

    /// Record the exit seen by a wait and fire the triggers.
    fn observe_exit(&mut self, outcome: Outcome) -> Result<()> {
        self.observed = Some(outcome.clone());

        let info = self.snapshot();
        let triggers = self.triggers.take();
        info!(
            id = %self.id,
            successful = info.successful,
            triggers = triggers.len(),
            "process exited"
        );
        triggers.run(&info);

        match outcome {
            Ok(status) if status.success() => Ok(()),
            Ok(status) => Err(ProcessError::Exit {
                id: self.id.clone(),
                status,
            }),
            Err(source) => Err(ProcessError::Wait {
                id: self.id.clone(),
                source,
            }),
        }
    }
}

#[async_trait]
impl Process for BasicProcess {
    async fn id(&self) -> String {
        self.id.clone()
    }

    async fn info(&self, _ctx: &Context) -> ProcessInfo {
        self.snapshot()
    }

    async fn running(&self, _ctx: &Context) -> bool {
        self.state().running()
    }

    async fn complete(&self, _ctx: &Context) -> bool {
        self.state().complete()
    }

    async fn signal(&mut self, _ctx: &Context, sig: Signal) -> Result<()> {
        // A reaped pid may already belong to someone else.
        let Some(pid) = self.signalable_pid() else {
            return Err(ProcessError::Signal {
                signal: sig,
                id: self.id.clone(),
                source: Errno::ESRCH,
            });
        };

        os::send_signal(pid, sig).map_err(|source| ProcessError::Signal {
            signal: sig,
            id: self.id.clone(),
            source,
        })?;

        debug!(id = %self.id, pid, signal = %sig, "delivered signal");
        Ok(())
    }

    async fn tag(&mut self, tag: &str) {
        self.tags.tag(tag);
    }

    async fn reset_tags(&mut self) {
        self.tags.reset();
    }

    async fn get_tags(&self) -> Vec<String> {
        self.tags.ordered().to_vec()
    }

    async fn register_trigger(&mut self, trigger: Option<Trigger>) -> Result<()> {
        let Some(trigger) = trigger else {
            return Err(ProcessError::NilTrigger);
        };

        if self.state().complete() {
            return Err(ProcessError::TriggerOnComplete {
                id: self.id.clone(),
            });
        }

        self.triggers.push(trigger);
        Ok(())
    }

    /// Wait protocol.
    ///
    /// Returns immediately if the process never started or a previous wait
    /// already observed its exit. Otherwise races the background waiter
    /// against `ctx`:
    ///
    /// - exit first: triggers run (once, in order) and the exit result is
    ///   returned;
    /// - `ctx` first: [`ProcessError::WaitCanceled`]. The process is left
    ///   alone, the waiter still reaps it, and no trigger fires unless a
    ///   later wait receives the exit.
    async fn wait(&mut self, ctx: &Context) -> Result<()> {
        if self.pid.is_none() || self.observed.is_some() {
            return Ok(());
        }

        let Some(mut rx) = self.ensure_waiter() else {
            return Ok(());
        };

        let published = async move {
            rx.wait_for(Option::is_some)
                .await
                .ok()
                .and_then(|outcome| (*outcome).clone())
        };

        tokio::select! {
            outcome = published => match outcome {
                Some(outcome) => self.observe_exit(outcome),
                None => Err(ProcessError::WaiterLost { id: self.id.clone() }),
            },
            reason = ctx.done() => {
                debug!(id = %self.id, reason = %reason, "stopped waiting for process");
                Err(ProcessError::WaitCanceled { id: self.id.clone(), reason })
            }
        }
    }
}
