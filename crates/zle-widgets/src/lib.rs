//! Widget name registry for a line editor.
//!
//! This crate provides:
//! - Refcounted name records and the alias rings that tie them to widgets
//! - Protected canonical (`.name`) bindings for native widgets
//! - The `zle` command surface: list, delete, link, define, completion
//!   wrappers, invocation, messages, input pushback, keymaps, redisplay
//! - The descriptor watch table

pub mod commands;
pub mod completion;
pub mod options;
pub mod output;
pub mod quote;
pub mod registry;
pub mod session;
pub mod thingy;
pub mod watch;
pub mod widget;
mod zle;

pub use commands::{
    parse_call_options, select_operation, CallOptions, CountOption, ListFormat, Operation,
};
pub use completion::{BuiltinCompletion, CompletionLoader};
pub use options::Options;
pub use output::SharedBuffer;
pub use quote::{nice, quote};
pub use registry::{Registry, CANONICAL_PREFIX};
pub use session::{RefreshRequest, Session};
pub use thingy::{ThingyId, ThingyTable, Visibility};
pub use watch::{parse_fd, WatchEntry, WatchTable};
pub use widget::{NativeFn, Widget, WidgetId, WidgetKind, WidgetTable};
pub use zle::Zle;

// Re-export zle_core types for convenience
pub use zle_core::{Modifier, ModifierFlags, Status, WidgetFlags, ZleError, ZleResult};
