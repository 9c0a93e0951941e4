//! Invoking a widget by name.
//!
//! ```text
//! zle widget [-n NUM] [-N] [-K KEYMAP] [--] [args...]
//! ```
//!
//! `-n` and `-N` change the repeat count and `-K` the keymap for the
//! duration of the call only. Both are restored by [`InvocationScope`]
//! when the call returns, however it returns, so nested calls unwind in
//! order.

use std::ops::{Deref, DerefMut};

use zle_core::{Modifier, ModifierFlags, Status, ZleError, ZleResult};

use crate::session::Session;
use crate::Zle;

/// Repeat count requested for a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountOption {
    /// `-n NUM`: explicit count.
    Explicit(i32),
    /// `-N`: back to the default count.
    Reset,
}

/// Options of a widget call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallOptions {
    pub count: Option<CountOption>,
    pub keymap: Option<String>,
}

/// Split the call options off the front of `args`.
///
/// Options end at the first word not starting with `-`, or after a word
/// that is `-` alone or starts with `--`. Later options override earlier
/// ones.
pub fn parse_call_options(args: &[String]) -> ZleResult<(CallOptions, &[String])> {
    let mut options = CallOptions::default();
    let mut i = 0;

    while let Some(arg) = args.get(i) {
        let Some(body) = arg.strip_prefix('-') else {
            break;
        };
        if body.is_empty() || body.starts_with('-') {
            i += 1;
            break;
        }

        let mut took_next = false;
        for (pos, c) in body.char_indices() {
            let rest = &body[pos + c.len_utf8()..];
            match c {
                'n' | 'K' => {
                    let value = if !rest.is_empty() {
                        rest
                    } else if let Some(next) = args.get(i + 1) {
                        took_next = true;
                        next.as_str()
                    } else if c == 'n' {
                        return Err(ZleError::NumberExpected(c));
                    } else {
                        return Err(ZleError::KeymapExpected(c));
                    };
                    if c == 'n' {
                        options.count = Some(CountOption::Explicit(atoi(value)));
                    } else {
                        options.keymap = Some(value.to_string());
                    }
                    break;
                }
                'N' => options.count = Some(CountOption::Reset),
                _ => return Err(ZleError::UnknownOption(body[pos..].to_string())),
            }
        }
        i += 1 + usize::from(took_next);
    }

    Ok((options, &args[i..]))
}

/// Leading integer of `s`, 0 if there is none.
fn atoi(s: &str) -> i32 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let value = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i32, |acc, d| {
            acc.wrapping_mul(10).wrapping_add(i32::from(d - b'0'))
        });
    if negative {
        value.wrapping_neg()
    } else {
        value
    }
}

/// Session access for one widget call. Any repeat count or keymap
/// changed through the scope is put back when it is dropped.
pub(crate) struct InvocationScope<'a> {
    session: &'a mut dyn Session,
    saved_modifier: Option<Modifier>,
    saved_keymap: Option<String>,
}

impl<'a> InvocationScope<'a> {
    pub(crate) fn new(session: &'a mut dyn Session) -> Self {
        Self {
            session,
            saved_modifier: None,
            saved_keymap: None,
        }
    }

    pub(crate) fn set_count(&mut self, count: CountOption) {
        let mut modifier = self.session.modifier();
        self.saved_modifier.get_or_insert(modifier);
        match count {
            CountOption::Explicit(mult) => {
                modifier.mult = mult;
                modifier.flags.insert(ModifierFlags::MULT);
            }
            CountOption::Reset => {
                modifier.mult = 1;
                modifier.flags.remove(ModifierFlags::MULT);
            }
        }
        self.session.set_modifier(modifier);
    }

    pub(crate) fn select_keymap(&mut self, name: &str) -> ZleResult<()> {
        let current = self.session.current_keymap();
        self.session.select_keymap(name)?;
        self.saved_keymap.get_or_insert(current);
        Ok(())
    }
}

impl<'a> Deref for InvocationScope<'a> {
    type Target = dyn Session + 'a;

    fn deref(&self) -> &Self::Target {
        &*self.session
    }
}

impl<'a> DerefMut for InvocationScope<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.session
    }
}

impl Drop for InvocationScope<'_> {
    fn drop(&mut self) {
        if let Some(modifier) = self.saved_modifier.take() {
            self.session.set_modifier(modifier);
        }
        if let Some(keymap) = self.saved_keymap.take() {
            if let Err(e) = self.session.select_keymap(&keymap) {
                tracing::warn!("Failed to restore keymap '{}': {}", keymap, e);
            }
        }
    }
}

impl Zle {
    /// Run the widget `name` in `session`.
    ///
    /// The name does not need to be bound: the session decides what
    /// running an unknown widget means. Returns the widget's status.
    pub fn call(
        &mut self,
        session: &mut dyn Session,
        name: &str,
        options: &CallOptions,
        args: &[String],
    ) -> ZleResult<Status> {
        if !session.is_usable() {
            return Err(ZleError::NoActiveSession);
        }

        let mut scope = InvocationScope::new(session);
        if let Some(count) = options.count {
            scope.set_count(count);
        }
        if let Some(keymap) = &options.keymap {
            scope.select_keymap(keymap)?;
        }

        let thingy = self.registry.thingies_mut().resolve(name);
        tracing::debug!("Calling widget '{}'", name);
        let code = scope.execute(self, thingy, args);
        self.registry.thingies_mut().release(thingy);
        Ok(Status::from(code))
    }

    pub(crate) fn call_command(
        &mut self,
        session: &mut dyn Session,
        args: &[String],
    ) -> ZleResult<Status> {
        let Some((name, rest)) = args.split_first() else {
            return Ok(Status::from(session.is_usable()));
        };
        if !session.is_usable() {
            return Err(ZleError::NoActiveSession);
        }
        let (options, widget_args) = parse_call_options(rest)?;
        self.call(session, name, &options, widget_args)
    }
}
