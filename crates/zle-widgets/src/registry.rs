//! Widget Registry
//!
//! Owns the thingy table and the widgets, and binds one to the other.
//!
//! ## Ownership
//!
//! - The thingy table owns the records; a record dies when its reference
//!   count reaches zero.
//! - The registry owns the widgets; a widget dies when it is unbound from
//!   its last name, and only then.
//! - Binding a name to a widget consumes one reference on the record;
//!   unbinding it releases that reference again.

use zle_core::{WidgetFlags, ZleError, ZleResult};

use crate::thingy::{ThingyFlags, ThingyId, ThingyTable, Visibility};
use crate::widget::{NativeFn, Widget, WidgetId, WidgetKind, WidgetTable};

/// Leading character of canonical widget names.
pub const CANONICAL_PREFIX: char = '.';

/// Thingy table plus the widgets bound into it.
#[derive(Debug, Default)]
pub struct Registry {
    thingies: ThingyTable,
    widgets: WidgetTable,
}

impl Registry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The thingy table.
    pub fn thingies(&self) -> &ThingyTable {
        &self.thingies
    }

    /// The thingy table, for taking and releasing references.
    pub fn thingies_mut(&mut self) -> &mut ThingyTable {
        &mut self.thingies
    }

    /// The widget table.
    pub fn widgets(&self) -> &WidgetTable {
        &self.widgets
    }

    /// The widget a record names, if any.
    pub fn widget_of(&self, thingy: ThingyId) -> Option<&Widget> {
        self.thingies
            .widget(thingy)
            .and_then(|id| self.widgets.get(id))
    }

    /// The widget currently bound to `name`.
    pub fn widget_named(&self, name: &str) -> Option<WidgetId> {
        self.thingies
            .lookup(name)
            .and_then(|t| self.thingies.widget(t))
    }

    /// Every name bound to `widget`, starting at its ring anchor.
    pub fn aliases(&self, widget: WidgetId) -> Vec<ThingyId> {
        let Some(first) = self.widgets.get(widget).and_then(|w| w.first) else {
            return Vec::new();
        };
        let mut ring = vec![first];
        let mut p = self.thingies.get(first).samew;
        while p != first {
            ring.push(p);
            p = self.thingies.get(p).samew;
        }
        ring
    }

    /// Store a widget that is not bound to any name yet.
    pub fn create_widget(&mut self, widget: Widget) -> WidgetId {
        self.widgets.insert(widget)
    }

    /// Drop a widget whose first bind was refused. It must not be bound.
    pub fn discard_widget(&mut self, widget: WidgetId) {
        debug_assert!(
            self.widgets.get(widget).is_some_and(|w| w.first.is_none()),
            "discarding a bound widget"
        );
        self.widgets.remove(widget);
    }

    /// Bind `widget` to `thingy`.
    ///
    /// The caller must hold a reference on `thingy`; it is consumed on
    /// every path. Binding a protected record fails without touching it.
    pub fn bind_widget(&mut self, widget: WidgetId, thingy: ThingyId) -> ZleResult<()> {
        if self.thingies.is_protected(thingy) {
            let name = self.thingies.name(thingy).to_string();
            self.thingies.release(thingy);
            return Err(ZleError::Protected(name));
        }
        if self.thingies.is_enabled(thingy) {
            if self.thingies.widget(thingy) == Some(widget) {
                // Already bound: the record keeps the reference it has.
                self.thingies.release(thingy);
                return Ok(());
            }
            self.unbind_widget(thingy, true)?;
        }

        match self.widgets.get_mut(widget).first {
            Some(first) => {
                let next = self.thingies.get(first).samew;
                self.thingies.get_mut(thingy).samew = next;
                self.thingies.get_mut(first).samew = thingy;
            }
            None => {
                self.widgets.get_mut(widget).first = Some(thingy);
                self.thingies.get_mut(thingy).samew = thingy;
            }
        }
        let record = self.thingies.get_mut(thingy);
        record.widget = Some(widget);
        record.flags.remove(ThingyFlags::DISABLED);
        tracing::debug!("Bound widget to '{}'", record.name);
        Ok(())
    }

    /// Unbind whatever widget `thingy` names, releasing the reference the
    /// binding held. The widget is freed if this was its last name.
    ///
    /// Protected records are only unbound with `override_protection`, and
    /// lose their protection when they are. A record that names nothing is
    /// left alone and counts as success.
    pub fn unbind_widget(&mut self, thingy: ThingyId, override_protection: bool) -> ZleResult<()> {
        if !self.thingies.is_enabled(thingy) {
            return Ok(());
        }
        if !override_protection && self.thingies.is_protected(thingy) {
            return Err(ZleError::Protected(self.thingies.name(thingy).to_string()));
        }
        let Some(widget) = self.thingies.widget(thingy) else {
            unreachable!("enabled thingy without a widget");
        };

        let next = self.thingies.get(thingy).samew;
        if next == thingy {
            self.free_widget(widget);
        } else {
            let Some(mut p) = self.widgets.get_mut(widget).first else {
                unreachable!("bound widget without a ring anchor");
            };
            while self.thingies.get(p).samew != thingy {
                p = self.thingies.get(p).samew;
            }
            self.widgets.get_mut(widget).first = Some(p);
            self.thingies.get_mut(p).samew = next;
        }

        let record = self.thingies.get_mut(thingy);
        record.flags.remove(ThingyFlags::IMMORTAL);
        record.flags.insert(ThingyFlags::DISABLED);
        record.widget = None;
        record.samew = thingy;
        tracing::debug!("Unbound widget from '{}'", record.name);
        self.thingies.release(thingy);
        Ok(())
    }

    fn free_widget(&mut self, widget: WidgetId) {
        let freed = self.widgets.remove(widget);
        tracing::debug!("Freed widget {:?}", freed.kind);
    }

    /// Add a native widget under `name`.
    ///
    /// The widget is bound to the canonical name `.name`, which is
    /// protected, and to `name` as an ordinary alias. Fails when `name`
    /// itself is canonical or when a native widget already owns `.name`.
    pub fn add_function(
        &mut self,
        name: &str,
        func: NativeFn,
        flags: WidgetFlags,
    ) -> ZleResult<WidgetId> {
        if name.starts_with(CANONICAL_PREFIX) {
            return Err(ZleError::CanonicalName(name.to_string()));
        }
        let canonical = format!("{CANONICAL_PREFIX}{name}");
        if let Some(t) = self.thingies.lookup(&canonical) {
            if self.thingies.is_protected(t) {
                return Err(ZleError::AlreadyRegistered(name.to_string()));
            }
        }

        let widget = self.create_widget(Widget::new(WidgetKind::Native(func), flags));
        let t = self.thingies.resolve(&canonical);
        self.bind_widget(widget, t)?;
        self.thingies.get_mut(t).flags.insert(ThingyFlags::IMMORTAL);
        let t = self.thingies.resolve(name);
        if let Err(e) = self.bind_widget(widget, t) {
            tracing::warn!("Native widget '{}' kept only its canonical name: {}", name, e);
        }
        tracing::info!("Registered native widget: {}", name);
        Ok(widget)
    }

    /// Remove a native widget, unbinding every name it has, canonical
    /// ones included.
    pub fn delete_function(&mut self, widget: WidgetId) {
        let Some(mut p) = self.widgets.get(widget).and_then(|w| w.first) else {
            return;
        };
        loop {
            let n = self.thingies.get(p).samew;
            // Override never fails.
            let _ = self.unbind_widget(p, true);
            if n == p {
                return;
            }
            p = n;
        }
    }

    /// Unbind every name of every non-native widget.
    ///
    /// Native widgets belong to their host and survive, together with all
    /// of their aliases.
    pub fn teardown(&mut self) {
        let doomed: Vec<ThingyId> = self
            .thingies
            .ids(Visibility::Enabled)
            .into_iter()
            .filter(|&t| self.widget_of(t).is_some_and(|w| !w.kind.is_native()))
            .collect();
        tracing::info!("Tearing down {} widget names", doomed.len());
        for t in doomed {
            let _ = self.unbind_widget(t, true);
        }
    }

    /// Panics if a ring, anchor or record flag is inconsistent.
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        use std::collections::HashSet;

        let mut bound = HashSet::new();
        for t in self.thingies.ids(Visibility::All) {
            let record = self.thingies.get(t);
            assert!(record.rc > 0, "live record '{}' has no references", record.name);
            let Some(w) = record.widget else {
                assert!(!self.thingies.is_enabled(t));
                assert!(!self.thingies.is_protected(t));
                assert_eq!(record.samew, t);
                continue;
            };
            assert!(self.thingies.is_enabled(t));
            assert!(self.widgets.contains(w), "'{}' names a freed widget", record.name);
            bound.insert(w);

            let ring = self.aliases(w);
            assert!(ring.contains(&t), "'{}' missing from its ring", record.name);
            let unique: HashSet<_> = ring.iter().collect();
            assert_eq!(unique.len(), ring.len(), "ring visits a member twice");
            for member in ring {
                assert_eq!(self.thingies.widget(member), Some(w));
            }
        }
        assert_eq!(bound.len(), self.widgets.len(), "unreachable widget");
    }
}
