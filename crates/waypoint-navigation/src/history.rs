//! Session history
//!
//! Browser-style entry stack rooted at the public base path. Pushing while
//! positioned in the middle of the stack drops the forward entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Location relative to the base, including query and fragment
    pub full_path: String,
    pub visited_at: DateTime<Utc>,
}

impl HistoryEntry {
    fn new(full_path: &str) -> Self {
        Self {
            full_path: full_path.to_string(),
            visited_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct History {
    /// Normalized base, no trailing slash (empty for `/`)
    base: String,
    entries: Vec<HistoryEntry>,
    position: usize,
}

impl History {
    pub fn new(base: &str) -> Self {
        Self {
            base: normalize_base(base),
            entries: Vec::new(),
            position: 0,
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Absolute href for a location, with the base prepended
    pub fn href(&self, full_path: &str) -> String {
        format!("{}{}", self.base, full_path)
    }

    /// Current location, relative to the base
    pub fn location(&self) -> Option<&str> {
        self.entries
            .get(self.position)
            .map(|entry| entry.full_path.as_str())
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn can_go_back(&self) -> bool {
        self.peek(-1).is_some()
    }

    pub fn can_go_forward(&self) -> bool {
        self.peek(1).is_some()
    }

    pub fn push(&mut self, full_path: &str) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.position + 1);
        }
        self.entries.push(HistoryEntry::new(full_path));
        self.position = self.entries.len() - 1;
    }

    pub fn replace(&mut self, full_path: &str) {
        match self.entries.get_mut(self.position) {
            Some(entry) => *entry = HistoryEntry::new(full_path),
            None => self.push(full_path),
        }
    }

    /// Entry `delta` steps away from the current one
    pub fn peek(&self, delta: isize) -> Option<&HistoryEntry> {
        let index = self.offset(delta)?;
        self.entries.get(index)
    }

    /// Move `delta` steps; returns false when out of range
    pub fn go(&mut self, delta: isize) -> bool {
        match self.offset(delta) {
            Some(index) if index < self.entries.len() => {
                self.position = index;
                true
            }
            _ => false,
        }
    }

    fn offset(&self, delta: isize) -> Option<usize> {
        if self.entries.is_empty() {
            return None;
        }
        self.position.checked_add_signed(delta)
    }
}

fn normalize_base(base: &str) -> String {
    let base = base.trim();
    if base.is_empty() || base == "/" {
        return String::new();
    }

    let base = base.trim_end_matches('/');
    if base.starts_with('/') {
        base.to_string()
    } else {
        format!("/{}", base)
    }
}
