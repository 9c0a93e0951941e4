//! The registry context.
//!
//! [`Zle`] bundles everything the command surface works on: the widget
//! registry, the watch table, the completion loader and the output
//! sinks. Every command is a method on it, so independent instances never
//! share state.

use std::io::{self, Write};

use zle_core::{WidgetFlags, ZleError, ZleResult};

use crate::completion::{BuiltinCompletion, CompletionLoader};
use crate::registry::Registry;
use crate::watch::WatchTable;
use crate::widget::{NativeFn, WidgetId};

/// Widget registry plus the state of the `zle` command.
pub struct Zle {
    pub(crate) registry: Registry,
    pub(crate) watches: WatchTable,
    pub(crate) completion: Box<dyn CompletionLoader + Send>,
    /// Completion widgets created with `zle -C`.
    pub(crate) completion_widgets: usize,
    pub(crate) out: Box<dyn Write + Send>,
    pub(crate) err: Box<dyn Write + Send>,
}

impl Zle {
    /// Create a registry writing to the process's stdout and stderr.
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            watches: WatchTable::new(),
            completion: Box::new(BuiltinCompletion),
            completion_widgets: 0,
            out: Box::new(io::stdout()),
            err: Box::new(io::stderr()),
        }
    }

    /// Replace the listing and diagnostic sinks.
    pub fn with_output(
        mut self,
        out: impl Write + Send + 'static,
        err: impl Write + Send + 'static,
    ) -> Self {
        self.out = Box::new(out);
        self.err = Box::new(err);
        self
    }

    /// Replace how completion support is loaded.
    pub fn with_completion_loader(mut self, loader: impl CompletionLoader + Send + 'static) -> Self {
        self.completion = Box::new(loader);
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn watches(&self) -> &WatchTable {
        &self.watches
    }

    /// Number of completion widgets created so far.
    pub fn completion_widgets(&self) -> usize {
        self.completion_widgets
    }

    /// Install a native widget; see [`Registry::add_function`].
    pub fn add_function(
        &mut self,
        name: &str,
        func: NativeFn,
        flags: WidgetFlags,
    ) -> ZleResult<WidgetId> {
        self.registry.add_function(name, func, flags)
    }

    /// Remove a native widget; see [`Registry::delete_function`].
    pub fn delete_function(&mut self, widget: WidgetId) {
        self.registry.delete_function(widget);
    }

    /// Unbind every user-defined widget. Called once when the editor is
    /// unloaded.
    pub fn teardown(&mut self) {
        self.registry.teardown();
    }

    /// Report a failed command on the diagnostic sink.
    pub(crate) fn warn(&mut self, name: &str, error: &ZleError) {
        tracing::debug!("{}: {}", name, error);
        if let Err(e) = writeln!(self.err, "{name}: {error}") {
            tracing::warn!("Failed to write diagnostic: {}", e);
        }
    }

    /// Write one line of command output.
    pub(crate) fn print(&mut self, line: &str) {
        if let Err(e) = writeln!(self.out, "{line}") {
            tracing::warn!("Failed to write output: {}", e);
        }
    }
}

impl Default for Zle {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Zle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Zle")
            .field("registry", &self.registry)
            .field("watches", &self.watches)
            .field("completion_widgets", &self.completion_widgets)
            .finish()
    }
}
