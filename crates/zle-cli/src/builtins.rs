//! Native widgets every shell starts with.

use zle_core::{WidgetFlags, ZleResult};
use zle_widgets::{NativeFn, Zle};

fn accept_line(_args: &[String]) -> i32 {
    tracing::debug!("accept-line");
    0
}

fn send_break(_args: &[String]) -> i32 {
    1
}

fn beep(_args: &[String]) -> i32 {
    tracing::debug!("beep");
    0
}

fn clear_screen(_args: &[String]) -> i32 {
    0
}

/// Completion entry point. A wrapper widget passes its driver function
/// name first.
fn complete_word(args: &[String]) -> i32 {
    if let Some(driver) = args.first() {
        tracing::debug!("Completing with {}", driver);
    }
    0
}

fn list_choices(args: &[String]) -> i32 {
    complete_word(args)
}

const BUILTINS: &[(&str, NativeFn, WidgetFlags)] = &[
    ("accept-line", accept_line, WidgetFlags::empty()),
    ("send-break", send_break, WidgetFlags::empty()),
    ("beep", beep, WidgetFlags::empty()),
    ("clear-screen", clear_screen, WidgetFlags::NOT_COMMAND),
    ("complete-word", complete_word, WidgetFlags::IS_COMPLETION),
    (
        "list-choices",
        list_choices,
        WidgetFlags::IS_COMPLETION.union(WidgetFlags::KEEP_SUFFIX),
    ),
];

/// Install the builtin widgets under their names and `.`-prefixed
/// canonical names.
pub fn register(zle: &mut Zle) -> ZleResult<()> {
    for &(name, func, flags) in BUILTINS {
        zle.add_function(name, func, flags)?;
    }
    tracing::info!("Registered {} builtin widgets", BUILTINS.len());
    Ok(())
}
