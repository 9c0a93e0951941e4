//! Pre-parsed option flags of a `zle` command line.

use std::collections::BTreeSet;

/// The single-letter options given to a command. Tokenizing is done by
/// the caller; this only records which letters were present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    set: BTreeSet<char>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options with every character of `flags` set, e.g. `"lL"`.
    pub fn from_flags(flags: &str) -> Self {
        Self {
            set: flags.chars().collect(),
        }
    }

    pub fn set(&mut self, flag: char) {
        self.set.insert(flag);
    }

    pub fn is_set(&self, flag: char) -> bool {
        self.set.contains(&flag)
    }
}

impl FromIterator<char> for Options {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        Self {
            set: iter.into_iter().collect(),
        }
    }
}
