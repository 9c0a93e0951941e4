//! Completion support collaborator.

/// Loads completion support on demand.
#[cfg_attr(test, mockall::automock)]
pub trait CompletionLoader {
    /// Make completion available, loading it if needed. Returns `false`
    /// when it cannot be loaded.
    fn require(&mut self) -> bool;
}

/// Completion support that is always present.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinCompletion;

impl CompletionLoader for BuiltinCompletion {
    fn require(&mut self) -> bool {
        true
    }
}
