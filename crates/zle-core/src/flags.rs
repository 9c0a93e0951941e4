//! Widget capability flags and the repeat-count modifier.

use bitflags::bitflags;

bitflags! {
    /// Capabilities of a widget, independent of how it is implemented.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct WidgetFlags: u32 {
        /// Completion should start menu completion.
        const MENU_COMPLETE = 1 << 0;
        /// Keep an auto-removable suffix after running.
        const KEEP_SUFFIX = 1 << 1;
        /// The widget drives interactive completion and can be wrapped.
        const IS_COMPLETION = 1 << 2;
        /// The widget moves between lines.
        const LINE_MOVE = 1 << 3;
        /// The widget keeps the last cursor column.
        const LAST_COLUMN = 1 << 4;
        /// Running the widget does not count as a command.
        const NOT_COMMAND = 1 << 5;
    }
}

bitflags! {
    /// State bits of the repeat-count modifier.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ModifierFlags: u32 {
        /// An explicit repeat count was given.
        const MULT = 1 << 0;
        /// Temporary count being typed.
        const TMULT = 1 << 1;
        /// Vi-style cut buffer selected.
        const VIBUF = 1 << 2;
        /// Append to the cut buffer.
        const VIAPP = 1 << 3;
        /// Negative count.
        const NEG = 1 << 4;
    }
}

/// Repeat count and related state applied to the next widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Modifier {
    pub flags: ModifierFlags,
    pub mult: i32,
}

impl Modifier {
    /// A modifier with an explicit repeat count.
    pub fn with_count(mult: i32) -> Self {
        Self {
            flags: ModifierFlags::MULT,
            mult,
        }
    }

    pub fn has_count(&self) -> bool {
        self.flags.contains(ModifierFlags::MULT)
    }
}

impl Default for Modifier {
    fn default() -> Self {
        Self {
            flags: ModifierFlags::empty(),
            mult: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_default_has_no_count() {
        let m = Modifier::default();
        assert_eq!(m.mult, 1);
        assert!(!m.has_count());
        assert!(Modifier::with_count(4).has_count());
    }
}
