// src/process/tags.rs

use std::collections::HashSet;

/// Tag membership set plus the ordered sequence reported to the outside.
///
/// A tag is in `members` iff it appears exactly once in `order`.
#[derive(Debug, Clone, Default)]
pub struct TagSet {
    members: HashSet<String>,
    order: Vec<String>,
}

impl TagSet {
    /// Add `tag`; no-op if already present.
    pub fn tag(&mut self, tag: &str) {
        if self.members.contains(tag) {
            return;
        }
        self.members.insert(tag.to_string());
        self.order.push(tag.to_string());
    }

    pub fn reset(&mut self) {
        self.members.clear();
        self.order.clear();
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.members.contains(tag)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Tags in insertion order.
    pub fn ordered(&self) -> &[String] {
        &self.order
    }

    pub fn is_consistent(&self) -> bool {
        self.members.len() == self.order.len() && self.order.iter().all(|t| self.members.contains(t))
    }
}
