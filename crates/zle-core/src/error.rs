//! Error types for the zle registry.
//!
//! Every error here is reportable: the command surface prints it as a
//! diagnostic and returns [`Status::Failure`]. Broken internal invariants
//! are not represented and panic instead.

use thiserror::Error;

/// Errors raised by the widget registry and its command surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ZleError {
    /// No record by this name designates a widget.
    #[error("no such widget `{0}'")]
    UnknownName(String),

    /// The name is a canonical binding and cannot be rebound or deleted.
    #[error("widget name `{0}' is protected")]
    Protected(String),

    /// Fewer positional arguments than the operation needs.
    #[error("not enough arguments for -{0}")]
    NotEnoughArguments(char),

    /// More positional arguments than the operation accepts.
    #[error("too many arguments for -{0}")]
    TooManyArguments(String),

    /// More than one primary operation flag was given.
    #[error("incompatible operation selection options")]
    IncompatibleOptions,

    /// Widgets can only be invoked from inside an editing session.
    #[error("widgets can only be called when ZLE is active")]
    NoActiveSession,

    /// Display and input commands need an active editing session.
    #[error("can only be called from widget function")]
    NotInWidgetFunction,

    /// The completion support could not be loaded.
    #[error("can't load complete module")]
    CapabilityUnavailable,

    /// The wrap target is not a completion widget.
    #[error("invalid widget `{0}'")]
    InvalidWidget(String),

    /// A watch descriptor argument is not a non-negative decimal number.
    #[error("Bad file descriptor number for -F: {0}")]
    BadDescriptor(String),

    /// Removing a descriptor that has no handler.
    #[error("No handler installed for fd {0}")]
    DescriptorNotRegistered(i32),

    /// `-n` given without a count.
    #[error("number expected after -{0}")]
    NumberExpected(char),

    /// `-K` given without a keymap name.
    #[error("keymap expected after -{0}")]
    KeymapExpected(char),

    /// Unrecognised option while invoking a widget.
    #[error("unknown option: {0}")]
    UnknownOption(String),

    /// The session has no keymap by this name.
    #[error("no such keymap `{0}'")]
    NoSuchKeymap(String),

    /// Native widgets must be registered under their public name.
    #[error("widget name `{0}' is reserved for canonical widgets")]
    CanonicalName(String),

    /// A native widget with this canonical name already exists.
    #[error("widget `{0}' is already registered")]
    AlreadyRegistered(String),
}

/// Result type alias for registry operations.
pub type ZleResult<T> = Result<T, ZleError>;

/// Exit status of a command: 0 for success, 1 for failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Success,
    Failure,
}

impl Status {
    /// The numeric exit code.
    pub fn code(self) -> i32 {
        match self {
            Status::Success => 0,
            Status::Failure => 1,
        }
    }

    pub fn is_success(self) -> bool {
        self == Status::Success
    }
}

impl From<bool> for Status {
    fn from(ok: bool) -> Self {
        if ok {
            Status::Success
        } else {
            Status::Failure
        }
    }
}

impl From<i32> for Status {
    /// Any non-zero code from a widget is a failure.
    fn from(code: i32) -> Self {
        Status::from(code == 0)
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No config directory found.
    #[error("Config directory not found")]
    NoConfigDir,

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            ZleError::UnknownName("foo".to_string()).to_string(),
            "no such widget `foo'"
        );
        assert_eq!(
            ZleError::NotEnoughArguments('A').to_string(),
            "not enough arguments for -A"
        );
        assert_eq!(
            ZleError::TooManyArguments("FL".to_string()).to_string(),
            "too many arguments for -FL"
        );
        assert_eq!(
            ZleError::DescriptorNotRegistered(7).to_string(),
            "No handler installed for fd 7"
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(Status::Success.code(), 0);
        assert_eq!(Status::Failure.code(), 1);
        assert_eq!(Status::from(true), Status::Success);
        assert_eq!(Status::from(3), Status::Failure);
        assert_eq!(Status::from(0), Status::Success);
    }
}
