// src/process/thread_safe.rs

//! Reader/writer-locked decorator for any [`Process`].

use std::sync::Arc;

use async_trait::async_trait;
use nix::sys::signal::Signal;
use tokio::sync::RwLock;

use crate::context::Context;
use crate::errors::Result;
use crate::process::info::ProcessInfo;
use crate::process::trigger::Trigger;
use crate::process::Process;

/// Makes a [`Process`] safe to share.
///
/// `id`, `info`, `running`, `complete` and `get_tags` take the read lock, so
/// any number of them may run at once. `signal`, `tag`, `reset_tags`,
/// `register_trigger` and `wait` take the write lock. `wait` holds it until
/// it returns, so a signal sent through the same wrapper queues behind an
/// in-flight wait.
///
/// Cloning is cheap and every clone refers to the same process. Guards are
/// dropped on every return path, including a panic in a trigger.
#[derive(Debug)]
pub struct ThreadSafeProcess<P> {
    inner: Arc<RwLock<P>>,
}

impl<P: Process> ThreadSafeProcess<P> {
    pub fn new(process: P) -> Self {
        Self {
            inner: Arc::new(RwLock::new(process)),
        }
    }
}

impl<P> Clone for ThreadSafeProcess<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl<P: Process> Process for ThreadSafeProcess<P> {
    async fn id(&self) -> String {
        self.inner.read().await.id().await
    }

    async fn info(&self, ctx: &Context) -> ProcessInfo {
        self.inner.read().await.info(ctx).await
    }

    async fn running(&self, ctx: &Context) -> bool {
        self.inner.read().await.running(ctx).await
    }

    async fn complete(&self, ctx: &Context) -> bool {
        self.inner.read().await.complete(ctx).await
    }

    async fn signal(&mut self, ctx: &Context, sig: Signal) -> Result<()> {
        self.inner.write().await.signal(ctx, sig).await
    }

    async fn tag(&mut self, tag: &str) {
        self.inner.write().await.tag(tag).await
    }

    async fn reset_tags(&mut self) {
        self.inner.write().await.reset_tags().await
    }

    async fn get_tags(&self) -> Vec<String> {
        self.inner.read().await.get_tags().await
    }

    async fn register_trigger(&mut self, trigger: Option<Trigger>) -> Result<()> {
        self.inner.write().await.register_trigger(trigger).await
    }

    async fn wait(&mut self, ctx: &Context) -> Result<()> {
        let mut guard = self.inner.write().await;
        guard.wait(ctx).await
    }
}
