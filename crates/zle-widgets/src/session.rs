//! Editing session collaborator.
//!
//! The registry never reads keys or draws anything itself. Everything it
//! needs from the running line editor goes through [`Session`].

use zle_core::{Modifier, ZleResult};

use crate::thingy::ThingyId;
use crate::Zle;

/// What `zle -R` asks the display to show.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshRequest {
    /// Replacement status line.
    pub status: Option<String>,
    /// Strings to list below the line.
    pub list: Vec<String>,
    /// Clear a list currently on display.
    pub clear_list: bool,
}

/// The editing session a widget runs in.
#[cfg_attr(test, mockall::automock)]
pub trait Session {
    /// Whether the line editor is active.
    fn is_active(&self) -> bool;

    /// Whether a completion function is running, which makes widgets
    /// uncallable even in an active session.
    fn in_completion(&self) -> bool;

    /// Whether the display has been invalidated.
    fn is_trashed(&self) -> bool;

    /// Invalidate the display so the editor can be left cleanly.
    fn trash(&mut self);

    /// Run the widget `thingy` names with `args`, returning its exit code.
    ///
    /// The caller holds a reference on `thingy` for the duration. A record
    /// that names no widget is an error the session reports itself.
    /// Implementations may call back into `zle` to run further commands.
    fn execute(&mut self, zle: &mut Zle, thingy: ThingyId, args: &[String]) -> i32;

    fn modifier(&self) -> Modifier;

    fn set_modifier(&mut self, modifier: Modifier);

    /// Name of the selected keymap.
    fn current_keymap(&self) -> String;

    /// Select a keymap by name.
    fn select_keymap(&mut self, name: &str) -> ZleResult<()>;

    /// Show a message below the edit line.
    fn show_message(&mut self, message: &str);

    /// Push a byte back onto the input.
    fn unget_byte(&mut self, byte: u8);

    /// Redraw the display.
    fn refresh(&mut self, request: RefreshRequest);
}

impl dyn Session + '_ {
    /// Active, and not inside a completion function.
    pub fn is_usable(&self) -> bool {
        self.is_active() && !self.in_completion()
    }
}
