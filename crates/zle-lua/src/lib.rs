//! Lua-scripted editing session.
//!
//! User widgets defined with `zle -N` run Lua global functions of the
//! same name. While a widget or script runs, Lua can call back into the
//! command surface through the `zle(...)` global, with the same words a
//! shell would pass.

mod argv;
mod error;
mod session;

pub use argv::{parse_command_line, OPTION_LETTERS};
pub use error::LuaSessionError;
pub use session::{LuaSession, ZLE_COMMAND};
