//! Watch table for extra input sources.
//!
//! Records which file descriptors the editor should poll besides the
//! terminal, and the name of the function to call when one is readable.
//! The polling itself is done by the host's event loop.

/// A registered descriptor and its callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEntry {
    pub fd: i32,
    pub handler: String,
}

/// Descriptor → handler registry, unique by descriptor, in insertion
/// order.
#[derive(Debug, Default)]
pub struct WatchTable {
    entries: Vec<WatchEntry>,
}

impl WatchTable {
    /// Create a new empty watch table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a handler for `fd`, replacing any existing one in place.
    pub fn set(&mut self, fd: i32, handler: &str) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.fd == fd) {
            tracing::debug!("Replaced handler for fd {}: {}", fd, handler);
            entry.handler = handler.to_string();
        } else {
            tracing::debug!("Added handler for fd {}: {}", fd, handler);
            self.entries.push(WatchEntry {
                fd,
                handler: handler.to_string(),
            });
        }
    }

    /// Remove the handler for `fd`.
    ///
    /// Returns `true` if a handler was removed.
    pub fn remove(&mut self, fd: i32) -> bool {
        match self.entries.iter().position(|e| e.fd == fd) {
            Some(pos) => {
                self.entries.remove(pos);
                tracing::debug!("Removed handler for fd {}", fd);
                true
            }
            None => false,
        }
    }

    /// The handler for `fd`, if any.
    pub fn get(&self, fd: i32) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.fd == fd)
            .map(|e| e.handler.as_str())
    }

    /// All entries, in insertion order.
    pub fn entries(&self) -> &[WatchEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parse a descriptor argument: a whole non-negative decimal number.
pub fn parse_fd(arg: &str) -> Option<i32> {
    if arg.is_empty() || !arg.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    arg.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces_in_place() {
        let mut table = WatchTable::new();
        table.set(5, "handler1");
        table.set(7, "other");
        table.set(5, "handler2");

        assert_eq!(table.len(), 2);
        assert_eq!(table.get(5), Some("handler2"));
        assert_eq!(table.entries()[0].fd, 5);
        assert_eq!(table.entries()[1].fd, 7);
    }

    #[test]
    fn test_remove() {
        let mut table = WatchTable::new();
        table.set(3, "a");
        table.set(4, "b");

        assert!(table.remove(3));
        assert!(!table.remove(3));
        assert_eq!(table.entries(), &[WatchEntry { fd: 4, handler: "b".to_string() }]);
        assert!(table.remove(4));
        assert!(table.is_empty());
    }

    #[test]
    fn test_parse_fd() {
        assert_eq!(parse_fd("0"), Some(0));
        assert_eq!(parse_fd("12"), Some(12));
        assert_eq!(parse_fd("-1"), None);
        assert_eq!(parse_fd("3x"), None);
        assert_eq!(parse_fd(""), None);
        assert_eq!(parse_fd("99999999999"), None);
    }
}
