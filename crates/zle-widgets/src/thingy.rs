//! Thingy table.
//!
//! From the user's point of view a thingy is just a name. Internally every
//! name currently referenced anywhere has one [`Thingy`] record in the
//! table. Each record is reference counted and removed from the table the
//! moment its count drops to zero. Being the name of a widget counts as a
//! reference.
//!
//! A record that does not name a widget is *disabled*. Looking only at the
//! enabled records makes the table look like a table of widgets.
//!
//! ## Storage
//!
//! ```text
//! by_name: "accept-line" ─┐
//!          ".accept-line" ─┼──► Slab<Thingy>  (stable ThingyId indices)
//!          "my-widget"   ─┘        │ samew
//!                                  ▼
//!                           alias ring of the same widget
//! ```

use bitflags::bitflags;
use slab::Slab;
use std::collections::HashMap;

use crate::widget::WidgetId;

/// Stable handle to a record in the [`ThingyTable`].
///
/// A handle stays valid for as long as the reference it was obtained with
/// has not been released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ThingyId(pub(crate) usize);

bitflags! {
    /// Per-record state.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub(crate) struct ThingyFlags: u8 {
        /// The record does not name a widget.
        const DISABLED = 1 << 0;
        /// Canonical binding, may not be unbound without override.
        const IMMORTAL = 1 << 1;
    }
}

/// A named, reference-counted record.
#[derive(Debug)]
pub(crate) struct Thingy {
    pub(crate) name: String,
    pub(crate) rc: usize,
    pub(crate) flags: ThingyFlags,
    /// Valid only while enabled.
    pub(crate) widget: Option<WidgetId>,
    /// Next record bound to the same widget; points to itself when the
    /// record is the only alias or is disabled.
    pub(crate) samew: ThingyId,
}

/// Which records an iteration should visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Every live record, including names that only track a reference.
    All,
    /// Only records that currently name a widget.
    Enabled,
}

/// Name → record store with reference-counted lifetime.
#[derive(Debug, Default)]
pub struct ThingyTable {
    by_name: HashMap<String, ThingyId>,
    thingies: Slab<Thingy>,
}

impl ThingyTable {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Turn a name into a record, creating it if necessary, and take a
    /// reference to it.
    pub fn resolve(&mut self, name: &str) -> ThingyId {
        let id = match self.by_name.get(name) {
            Some(&id) => id,
            None => self.create(name),
        };
        self.retain(id)
    }

    /// Take a reference to an existing record.
    pub fn resolve_existing(&mut self, name: &str) -> Option<ThingyId> {
        let id = self.lookup(name)?;
        Some(self.retain(id))
    }

    /// Find a record without taking a reference.
    pub fn lookup(&self, name: &str) -> Option<ThingyId> {
        self.by_name.get(name).copied()
    }

    /// Take another reference to a live record.
    pub fn retain(&mut self, id: ThingyId) -> ThingyId {
        self.get_mut(id).rc += 1;
        id
    }

    /// Drop a reference. The record is removed from the table and freed
    /// when this was the last one.
    pub fn release(&mut self, id: ThingyId) {
        let thingy = self.get_mut(id);
        debug_assert!(thingy.rc > 0, "release of unreferenced thingy");
        thingy.rc -= 1;
        if thingy.rc == 0 {
            let thingy = self.thingies.remove(id.0);
            self.by_name.remove(&thingy.name);
            tracing::debug!("Freed thingy '{}'", thingy.name);
        }
    }

    /// Drop a reference if one is held.
    pub fn release_opt(&mut self, id: Option<ThingyId>) {
        if let Some(id) = id {
            self.release(id);
        }
    }

    /// The record's name.
    pub fn name(&self, id: ThingyId) -> &str {
        &self.get(id).name
    }

    /// Number of outstanding references to the record.
    pub fn refcount(&self, id: ThingyId) -> usize {
        self.get(id).rc
    }

    /// Whether the record currently names a widget.
    pub fn is_enabled(&self, id: ThingyId) -> bool {
        !self.get(id).flags.contains(ThingyFlags::DISABLED)
    }

    /// Whether the record is a protected canonical binding.
    pub fn is_protected(&self, id: ThingyId) -> bool {
        self.get(id).flags.contains(ThingyFlags::IMMORTAL)
    }

    /// The widget named by the record, if it is enabled.
    pub fn widget(&self, id: ThingyId) -> Option<WidgetId> {
        self.get(id).widget
    }

    /// Whether `id` refers to a live record.
    pub fn contains(&self, id: ThingyId) -> bool {
        self.thingies.contains(id.0)
    }

    /// Snapshot of the records matching `visibility`, in no particular
    /// order.
    pub fn ids(&self, visibility: Visibility) -> Vec<ThingyId> {
        self.thingies
            .iter()
            .filter(|(_, t)| {
                visibility == Visibility::All || !t.flags.contains(ThingyFlags::DISABLED)
            })
            .map(|(key, _)| ThingyId(key))
            .collect()
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.thingies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thingies.is_empty()
    }

    pub(crate) fn get(&self, id: ThingyId) -> &Thingy {
        &self.thingies[id.0]
    }

    pub(crate) fn get_mut(&mut self, id: ThingyId) -> &mut Thingy {
        &mut self.thingies[id.0]
    }

    /// Insert a disabled record with no references.
    fn create(&mut self, name: &str) -> ThingyId {
        let entry = self.thingies.vacant_entry();
        let id = ThingyId(entry.key());
        entry.insert(Thingy {
            name: name.to_string(),
            rc: 0,
            flags: ThingyFlags::DISABLED,
            widget: None,
            samew: id,
        });
        self.by_name.insert(name.to_string(), id);
        id
    }
}
