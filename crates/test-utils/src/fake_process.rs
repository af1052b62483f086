use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use nix::errno::Errno;
use procward::{
    Context, CreateOptions, Process, ProcessError, ProcessInfo, Result, Signal, Trigger,
};
use tokio::sync::{Barrier, Notify};

/// A `Process` that never touches the OS.
///
/// - `wait` parks until [`FakeProcess::release_handle`] is notified (or the
///   context is done), then completes and runs triggers.
/// - `running` can be made to rendezvous on a barrier, which only returns if
///   enough readers are inside at once.
/// - `signal` records the signal and optionally fails.
pub struct FakeProcess {
    id: String,
    tags: Vec<String>,
    triggers: Vec<Trigger>,
    complete: bool,
    release: Arc<Notify>,
    entered_wait: Arc<Notify>,
    read_barrier: Option<Arc<Barrier>>,
    signal_error: Option<Errno>,
    signals: Arc<Mutex<Vec<Signal>>>,
}

impl FakeProcess {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            tags: Vec::new(),
            triggers: Vec::new(),
            complete: false,
            release: Arc::new(Notify::new()),
            entered_wait: Arc::new(Notify::new()),
            read_barrier: None,
            signal_error: None,
            signals: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_read_barrier(mut self, barrier: Arc<Barrier>) -> Self {
        self.read_barrier = Some(barrier);
        self
    }

    pub fn failing_signals(mut self, errno: Errno) -> Self {
        self.signal_error = Some(errno);
        self
    }

    /// Notify this to let a parked `wait` finish.
    pub fn release_handle(&self) -> Arc<Notify> {
        Arc::clone(&self.release)
    }

    /// Notified once a `wait` has started parking.
    pub fn entered_wait_handle(&self) -> Arc<Notify> {
        Arc::clone(&self.entered_wait)
    }

    pub fn signals_handle(&self) -> Arc<Mutex<Vec<Signal>>> {
        Arc::clone(&self.signals)
    }

    fn snapshot(&self) -> ProcessInfo {
        ProcessInfo {
            id: self.id.clone(),
            options: CreateOptions {
                tags: self.tags.clone(),
                ..CreateOptions::default()
            },
            host: "fake".to_string(),
            complete: self.complete,
            running: !self.complete,
            successful: self.complete,
            pid: None,
        }
    }
}

#[async_trait]
impl Process for FakeProcess {
    async fn id(&self) -> String {
        self.id.clone()
    }

    async fn info(&self, _ctx: &Context) -> ProcessInfo {
        self.snapshot()
    }

    async fn running(&self, _ctx: &Context) -> bool {
        if let Some(ref barrier) = self.read_barrier {
            barrier.wait().await;
        }
        !self.complete
    }

    async fn complete(&self, _ctx: &Context) -> bool {
        self.complete
    }

    async fn signal(&mut self, _ctx: &Context, sig: Signal) -> Result<()> {
        self.signals.lock().unwrap().push(sig);
        match self.signal_error {
            Some(source) => Err(ProcessError::Signal {
                signal: sig,
                id: self.id.clone(),
                source,
            }),
            None => Ok(()),
        }
    }

    async fn tag(&mut self, tag: &str) {
        if !self.tags.iter().any(|t| t == tag) {
            self.tags.push(tag.to_string());
        }
    }

    async fn reset_tags(&mut self) {
        self.tags.clear();
    }

    async fn get_tags(&self) -> Vec<String> {
        self.tags.clone()
    }

    async fn register_trigger(&mut self, trigger: Option<Trigger>) -> Result<()> {
        let trigger = trigger.ok_or(ProcessError::NilTrigger)?;
        if self.complete {
            return Err(ProcessError::TriggerOnComplete {
                id: self.id.clone(),
            });
        }
        self.triggers.push(trigger);
        Ok(())
    }

    async fn wait(&mut self, ctx: &Context) -> Result<()> {
        if self.complete {
            return Ok(());
        }

        self.entered_wait.notify_one();
        let release = Arc::clone(&self.release);

        tokio::select! {
            _ = release.notified() => {
                self.complete = true;
                let info = self.snapshot();
                for trigger in std::mem::take(&mut self.triggers) {
                    trigger.call(&info);
                }
                Ok(())
            }
            reason = ctx.done() => Err(ProcessError::WaitCanceled { id: self.id.clone(), reason }),
        }
    }
}
