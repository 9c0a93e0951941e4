//! The `zle` command.
//!
//! ## Operations
//!
//! | Flag | Operation | Arguments |
//! |------|-----------|-----------|
//! | `-l` | list widgets / test for existence | any |
//! | `-D` | delete widget names | 1 or more |
//! | `-A` | link two names | 2 |
//! | `-N` | define a user widget | 1 or 2 |
//! | `-C` | define a completion widget | 3 |
//! | `-R` | redisplay | any |
//! | `-M` | show a message | 1 |
//! | `-U` | push back input | 1 |
//! | `-K` | select a keymap | 1 |
//! | `-I` | invalidate the display | 0 |
//! | `-F` | watch a file descriptor | 0 to 2 |
//! | none | invoke a widget | any |
//!
//! At most one operation flag may be given. Arity is checked before the
//! operation runs.

mod bind;
mod call;
mod display;
mod fd;
mod list;

pub use call::{parse_call_options, CallOptions, CountOption};
pub use list::ListFormat;

use zle_core::{Status, ZleError, ZleResult};

use crate::options::Options;
use crate::session::Session;
use crate::Zle;

/// An operation of the `zle` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Delete,
    Link,
    New,
    Complete,
    Refresh,
    Message,
    Unget,
    Keymap,
    Invalidate,
    Fd,
    Call,
}

struct OpSpec {
    flag: Option<char>,
    op: Operation,
    min: usize,
    max: Option<usize>,
}

const OPERATIONS: &[OpSpec] = &[
    OpSpec { flag: Some('l'), op: Operation::List, min: 0, max: None },
    OpSpec { flag: Some('D'), op: Operation::Delete, min: 1, max: None },
    OpSpec { flag: Some('A'), op: Operation::Link, min: 2, max: Some(2) },
    OpSpec { flag: Some('N'), op: Operation::New, min: 1, max: Some(2) },
    OpSpec { flag: Some('C'), op: Operation::Complete, min: 3, max: Some(3) },
    OpSpec { flag: Some('R'), op: Operation::Refresh, min: 0, max: None },
    OpSpec { flag: Some('M'), op: Operation::Message, min: 1, max: Some(1) },
    OpSpec { flag: Some('U'), op: Operation::Unget, min: 1, max: Some(1) },
    OpSpec { flag: Some('K'), op: Operation::Keymap, min: 1, max: Some(1) },
    OpSpec { flag: Some('I'), op: Operation::Invalidate, min: 0, max: Some(0) },
    OpSpec { flag: Some('F'), op: Operation::Fd, min: 0, max: Some(2) },
];

const CALL: OpSpec = OpSpec {
    flag: None,
    op: Operation::Call,
    min: 0,
    max: None,
};

/// Pick the operation selected by `ops` and check the argument count.
pub fn select_operation(ops: &Options, argc: usize) -> ZleResult<Operation> {
    let mut selected = OPERATIONS
        .iter()
        .filter(|entry| entry.flag.is_some_and(|f| ops.is_set(f)));
    let entry = selected.next().unwrap_or(&CALL);
    if selected.next().is_some() {
        return Err(ZleError::IncompatibleOptions);
    }

    let flag = entry.flag.unwrap_or(' ');
    if argc < entry.min {
        return Err(ZleError::NotEnoughArguments(flag));
    }
    if entry.max.is_some_and(|max| argc > max) {
        return Err(ZleError::TooManyArguments(flag.to_string()));
    }
    Ok(entry.op)
}

impl Zle {
    /// Run the `zle` command with pre-tokenized options and arguments.
    ///
    /// `name` is the command name used in diagnostics and listings.
    /// Failures are reported on the diagnostic sink.
    pub fn run(
        &mut self,
        session: &mut dyn Session,
        name: &str,
        args: &[String],
        ops: &Options,
    ) -> Status {
        match self.dispatch(session, name, args, ops) {
            Ok(status) => status,
            Err(e) => {
                self.warn(name, &e);
                Status::Failure
            }
        }
    }

    fn dispatch(
        &mut self,
        session: &mut dyn Session,
        name: &str,
        args: &[String],
        ops: &Options,
    ) -> ZleResult<Status> {
        match select_operation(ops, args.len())? {
            Operation::List => Ok(self.list_command(args, ops)),
            Operation::Delete => Ok(self.delete_command(name, args)),
            Operation::Link => self.link(&args[0], &args[1]).map(|()| Status::Success),
            Operation::New => self
                .define(&args[0], args.get(1).map(String::as_str))
                .map(|()| Status::Success),
            Operation::Complete => self
                .wrap_completion(&args[0], &args[1], &args[2])
                .map(|()| Status::Success),
            Operation::Refresh => Ok(self.refresh(session, args, ops.is_set('c'))),
            Operation::Message => self.message(session, &args[0]).map(|()| Status::Success),
            Operation::Unget => self.unget(session, &args[0]).map(|()| Status::Success),
            Operation::Keymap => self.keymap(session, &args[0]).map(|()| Status::Success),
            Operation::Invalidate => Ok(self.invalidate(session)),
            Operation::Fd => self.fd_command(name, args, ops),
            Operation::Call => self.call_command(session, args),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::output::SharedBuffer;
    use crate::Zle;

    /// A registry whose output and diagnostics can be inspected.
    pub(crate) fn capture() -> (Zle, SharedBuffer, SharedBuffer) {
        let out = SharedBuffer::new();
        let err = SharedBuffer::new();
        let zle = Zle::new().with_output(out.clone(), err.clone());
        (zle, out, err)
    }

    pub(crate) fn args(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }
}
