// src/process/trigger.rs

//! Completion callbacks.

use std::fmt;
use std::sync::Arc;

use crate::process::info::ProcessInfo;

/// A one-shot callback run with the final [`ProcessInfo`] when a wait
/// observes the process exiting on its own.
#[derive(Clone)]
pub struct Trigger(Arc<dyn Fn(&ProcessInfo) + Send + Sync>);

impl Trigger {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&ProcessInfo) + Send + Sync + 'static,
    {
        Trigger(Arc::new(f))
    }

    pub fn call(&self, info: &ProcessInfo) {
        (self.0)(info)
    }
}

impl fmt::Debug for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Trigger").finish_non_exhaustive()
    }
}

/// Triggers in registration order.
#[derive(Debug, Clone, Default)]
pub struct TriggerSequence {
    triggers: Vec<Trigger>,
}

impl TriggerSequence {
    pub fn push(&mut self, trigger: Trigger) {
        self.triggers.push(trigger);
    }

    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }

    /// Run every trigger, first registered first.
    pub fn run(&self, info: &ProcessInfo) {
        for trigger in &self.triggers {
            trigger.call(info);
        }
    }

    /// Remove and return all triggers, leaving the sequence empty.
    pub fn take(&mut self) -> TriggerSequence {
        std::mem::take(self)
    }
}
