//! Widgets.
//!
//! Each widget is attached to one or more thingies, and each thingy names
//! zero or one widgets. The widget keeps a non-owning anchor into the ring
//! of thingies bound to it; the ring itself is threaded through the
//! thingies' `samew` links.

use slab::Slab;
use zle_core::WidgetFlags;

use crate::thingy::ThingyId;

/// Host-provided widget implementation. Receives the widget's arguments
/// and returns its exit code.
pub type NativeFn = fn(&[String]) -> i32;

/// Stable handle to a widget in the [`WidgetTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WidgetId(pub(crate) usize);

/// How a widget is implemented.
#[derive(Clone)]
pub enum WidgetKind {
    /// Built into the editor or provided by a host module.
    Native(NativeFn),

    /// Runs the named shell function.
    User { function: String },

    /// Completion widget built on an existing native completion widget,
    /// driven by a shell function.
    Completion {
        func: NativeFn,
        widget: String,
        driver: String,
    },
}

impl WidgetKind {
    pub fn is_native(&self) -> bool {
        matches!(self, WidgetKind::Native(_))
    }
}

impl std::fmt::Debug for WidgetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WidgetKind::Native(_) => f.write_str("Native"),
            WidgetKind::User { function } => {
                f.debug_struct("User").field("function", function).finish()
            }
            WidgetKind::Completion { widget, driver, .. } => f
                .debug_struct("Completion")
                .field("widget", widget)
                .field("driver", driver)
                .finish(),
        }
    }
}

/// An invocable action shared by every name aliasing it.
#[derive(Debug, Clone)]
pub struct Widget {
    pub kind: WidgetKind,
    pub flags: WidgetFlags,
    /// One member of the alias ring. `None` only before the first bind.
    pub(crate) first: Option<ThingyId>,
}

impl Widget {
    /// A widget bound to no names yet.
    pub fn new(kind: WidgetKind, flags: WidgetFlags) -> Self {
        Self {
            kind,
            flags,
            first: None,
        }
    }

    /// A widget that runs a shell function.
    pub fn user(function: impl Into<String>) -> Self {
        Self::new(
            WidgetKind::User {
                function: function.into(),
            },
            WidgetFlags::empty(),
        )
    }

    pub fn is_completion(&self) -> bool {
        self.flags.contains(WidgetFlags::IS_COMPLETION)
    }
}

/// Widget storage. Widgets are owned here and freed by the binder when
/// their last alias goes away.
#[derive(Debug, Default)]
pub struct WidgetTable {
    widgets: Slab<Widget>,
}

impl WidgetTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, widget: Widget) -> WidgetId {
        WidgetId(self.widgets.insert(widget))
    }

    pub(crate) fn remove(&mut self, id: WidgetId) -> Widget {
        self.widgets.remove(id.0)
    }

    /// Get a live widget.
    pub fn get(&self, id: WidgetId) -> Option<&Widget> {
        self.widgets.get(id.0)
    }

    pub(crate) fn get_mut(&mut self, id: WidgetId) -> &mut Widget {
        &mut self.widgets[id.0]
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.widgets.contains(id.0)
    }

    /// Number of live widgets.
    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }
}
