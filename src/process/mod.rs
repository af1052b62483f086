// src/process/mod.rs

//! Process abstraction.
//!
//! - [`Process`] is the capability every managed process exposes.
//! - [`basic`] binds one OS child process to that capability. It is not
//!   synchronized and must not be shared without a wrapper.
//! - [`thread_safe`] is the reader/writer-locked decorator that makes any
//!   [`Process`] safe to share between tasks.
//! - [`info`], [`trigger`] and [`tags`] are the shared value types.

pub mod basic;
pub mod info;
pub mod os;
pub mod tags;
pub mod thread_safe;
pub mod trigger;

pub use basic::BasicProcess;
pub use info::ProcessInfo;
pub use nix::sys::signal::Signal;
pub use tags::TagSet;
pub use thread_safe::ThreadSafeProcess;
pub use trigger::{Trigger, TriggerSequence};

use async_trait::async_trait;

use crate::context::Context;
use crate::errors::Result;

/// A single managed OS child process.
///
/// Reads take `&self` and mutations take `&mut self`. Implementations that
/// are meant to be shared ([`ThreadSafeProcess`]) are cheap to clone, so each
/// consumer owns its own handle.
#[async_trait]
pub trait Process: Send + Sync {
    /// Identifier assigned at construction; never changes.
    async fn id(&self) -> String;

    async fn info(&self, ctx: &Context) -> ProcessInfo;

    async fn running(&self, ctx: &Context) -> bool;

    async fn complete(&self, ctx: &Context) -> bool;

    /// Deliver `sig`. Does not change running/complete state by itself;
    /// that only happens once a wait observes the exit.
    async fn signal(&mut self, ctx: &Context, sig: Signal) -> Result<()>;

    /// Add a tag; no-op if present.
    async fn tag(&mut self, tag: &str);

    async fn reset_tags(&mut self);

    /// Tags in the order they were added.
    async fn get_tags(&self) -> Vec<String>;

    /// Register a completion trigger. `None` is rejected, as is registering
    /// on a process that has already completed.
    async fn register_trigger(&mut self, trigger: Option<Trigger>) -> Result<()>;

    /// Block until the process exits or `ctx` is done.
    async fn wait(&mut self, ctx: &Context) -> Result<()>;
}
