//! Navigation history.
//!
//! The page never owns the browser history; it writes to it through the
//! [`HistoryBackend`] trait. [`MemoryHistory`] is a stack-based backend with
//! browser semantics (push truncates forward entries) used headless and in
//! tests.

use crate::logging::docs_log;

/// Direction of a history movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDirection {
    /// A new entry was added or a forward step was taken
    Forward,
    /// A back step was taken
    Back,
    /// The current entry was overwritten
    Replace,
}

/// Write access to the hosting history stack.
pub trait HistoryBackend {
    /// Add a new entry and make it current.
    fn push(&mut self, url: &str);

    /// Overwrite the current entry.
    fn replace(&mut self, url: &str);

    /// Step back one entry.
    ///
    /// Returns the new current URL when the step takes effect synchronously.
    /// Backends whose back step is asynchronous (a browser, which later
    /// delivers a pop event) return `None`.
    fn back(&mut self) -> Option<String>;
}

/// In-memory history stack.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<String>,
    current: usize,
}

impl MemoryHistory {
    /// Create a history with a single entry.
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            entries: vec![initial.into()],
            current: 0,
        }
    }

    /// The current entry.
    pub fn current(&self) -> &str {
        &self.entries[self.current]
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`; a history has at least one entry.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Position of the current entry.
    pub fn position(&self) -> usize {
        self.current
    }

    /// Check if can go back
    pub fn can_go_back(&self) -> bool {
        self.current > 0
    }

    /// Check if can go forward
    pub fn can_go_forward(&self) -> bool {
        self.current < self.entries.len() - 1
    }

    /// Step back, reporting the movement.
    pub fn step_back(&mut self) -> Option<NavigationDirection> {
        if self.can_go_back() {
            self.current -= 1;
            Some(NavigationDirection::Back)
        } else {
            None
        }
    }

    /// Step forward, reporting the movement.
    pub fn step_forward(&mut self) -> Option<NavigationDirection> {
        if self.can_go_forward() {
            self.current += 1;
            Some(NavigationDirection::Forward)
        } else {
            None
        }
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("/")
    }
}

impl HistoryBackend for MemoryHistory {
    fn push(&mut self, url: &str) {
        // Remove forward history when pushing
        self.entries.truncate(self.current + 1);
        self.entries.push(url.to_string());
        self.current += 1;
        docs_log!(trace, "History push '{}' (depth {})", url, self.current);
    }

    fn replace(&mut self, url: &str) {
        self.entries[self.current] = url.to_string();
        docs_log!(trace, "History replace '{}'", url);
    }

    fn back(&mut self) -> Option<String> {
        if self.step_back().is_none() {
            docs_log!(debug, "History back at oldest entry, staying on '{}'", self.current());
        }
        Some(self.current().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_back_forward() {
        let mut history = MemoryHistory::default();
        history.push("/a/1/index.html");
        history.push("/a/1/b.html");
        assert_eq!(history.current(), "/a/1/b.html");

        assert_eq!(history.back().as_deref(), Some("/a/1/index.html"));
        assert_eq!(history.step_forward(), Some(NavigationDirection::Forward));
        assert_eq!(history.current(), "/a/1/b.html");
    }

    #[test]
    fn test_push_truncates_forward_entries() {
        let mut history = MemoryHistory::default();
        history.push("/a");
        history.push("/b");
        history.back();
        history.push("/c");
        assert_eq!(history.entries(), ["/", "/a", "/c"]);
        assert!(!history.can_go_forward());
    }

    #[test]
    fn test_replace() {
        let mut history = MemoryHistory::default();
        history.push("/users");
        history.replace("/posts");

        assert_eq!(history.current(), "/posts");
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_back_at_start_stays() {
        let mut history = MemoryHistory::new("/start");
        assert_eq!(history.back().as_deref(), Some("/start"));
        assert_eq!(history.position(), 0);
    }
}
