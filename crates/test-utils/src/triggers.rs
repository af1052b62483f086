use std::sync::{Arc, Mutex};

use procward::{ProcessInfo, Trigger};

/// Records every trigger invocation under a label, in call order.
#[derive(Clone, Default)]
pub struct TriggerLog {
    calls: Arc<Mutex<Vec<(String, ProcessInfo)>>>,
}

impl TriggerLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A trigger that appends `(label, info)` to this log.
    pub fn trigger(&self, label: &str) -> Trigger {
        let calls = Arc::clone(&self.calls);
        let label = label.to_string();
        Trigger::new(move |info: &ProcessInfo| {
            calls.lock().unwrap().push((label.clone(), info.clone()));
        })
    }

    pub fn labels(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(label, _)| label.clone())
            .collect()
    }

    pub fn infos(&self) -> Vec<ProcessInfo> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, info)| info.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
