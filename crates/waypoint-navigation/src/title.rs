//! Displayed document title

use parking_lot::RwLock;

/// The title shown for the current page
#[derive(Debug)]
pub struct DocumentTitle {
    current: RwLock<String>,
}

impl DocumentTitle {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            current: RwLock::new(initial.into()),
        }
    }

    pub fn set(&self, title: impl Into<String>) {
        *self.current.write() = title.into();
    }

    pub fn get(&self) -> String {
        self.current.read().clone()
    }
}

impl Default for DocumentTitle {
    fn default() -> Self {
        Self::new(String::new())
    }
}
