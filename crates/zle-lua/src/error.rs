//! Error types for the Lua session.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LuaSessionError {
    /// Lua script error.
    #[error("Lua error: {0}")]
    Lua(#[from] mlua::Error),

    /// A widget names a function the Lua state does not define.
    #[error("function `{0}' is not defined")]
    UndefinedFunction(String),

    /// Script could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
