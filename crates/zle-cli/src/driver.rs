//! Line-oriented command driver.
//!
//! Each input line is one `zle` command, written as it would be in a
//! shell script (the leading `zle` is optional). Lines starting with
//! `lua ` run the rest of the line as Lua. Blank lines and `#` comments
//! are skipped.

use std::io::BufRead;

use thiserror::Error;
use zle_core::Status;
use zle_lua::{parse_command_line, LuaSession, ZLE_COMMAND};
use zle_widgets::Zle;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LineError {
    #[error("unterminated quote")]
    UnterminatedQuote,

    #[error("trailing backslash")]
    TrailingBackslash,
}

/// Split a line into words, honouring single quotes, double quotes and
/// backslash escapes.
pub fn split_words(line: &str) -> Result<Vec<String>, LineError> {
    let mut words = Vec::new();
    let mut word = String::new();
    let mut in_word = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(c) => word.push(c),
                        None => return Err(LineError::UnterminatedQuote),
                    }
                }
            }
            '"' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(c @ ('"' | '\\' | '$' | '`')) => word.push(c),
                            Some(c) => {
                                word.push('\\');
                                word.push(c);
                            }
                            None => return Err(LineError::UnterminatedQuote),
                        },
                        Some(c) => word.push(c),
                        None => return Err(LineError::UnterminatedQuote),
                    }
                }
            }
            '\\' => {
                in_word = true;
                word.push(chars.next().ok_or(LineError::TrailingBackslash)?);
            }
            c if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut word));
                    in_word = false;
                }
            }
            c => {
                in_word = true;
                word.push(c);
            }
        }
    }
    if in_word {
        words.push(word);
    }
    Ok(words)
}

/// Runs `zle` commands against one registry and session.
pub struct Driver {
    zle: Zle,
    session: LuaSession,
}

impl Driver {
    pub fn new(zle: Zle, session: LuaSession) -> Self {
        Self { zle, session }
    }

    pub fn session(&self) -> &LuaSession {
        &self.session
    }

    /// Load a Lua script with the `zle` command available.
    pub fn load_script(&mut self, path: &std::path::Path) -> Result<(), zle_lua::LuaSessionError> {
        self.session.load_script(&mut self.zle, path)
    }

    /// Run one line, returning its status.
    pub fn run_line(&mut self, line: &str) -> Status {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Status::Success;
        }
        if let Some(source) = line.strip_prefix("lua ") {
            return match self.session.exec(&mut self.zle, "lua", source) {
                Ok(()) => Status::Success,
                Err(e) => {
                    tracing::warn!("{}", e);
                    eprintln!("lua: {e}");
                    Status::Failure
                }
            };
        }

        let mut words = match split_words(line) {
            Ok(words) => words,
            Err(e) => {
                eprintln!("{ZLE_COMMAND}: {e}");
                return Status::Failure;
            }
        };
        if words.first().map(String::as_str) == Some(ZLE_COMMAND) {
            words.remove(0);
        }
        let (ops, args) = parse_command_line(&words);
        self.zle.run(&mut self.session, ZLE_COMMAND, &args, &ops)
    }

    /// Run every line of `input`. The status is that of the last command.
    pub fn run<R: BufRead>(&mut self, input: R) -> std::io::Result<Status> {
        let mut status = Status::Success;
        for line in input.lines() {
            status = self.run_line(&line?);
        }
        Ok(status)
    }

    /// Unbind every user widget and hand back the registry.
    pub fn finish(mut self) -> Zle {
        self.session.deactivate();
        self.zle.teardown();
        self.zle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlua::Lua;
    use zle_core::ShellConfig;
    use zle_widgets::{ListFormat, SharedBuffer};

    fn driver() -> (Driver, SharedBuffer, SharedBuffer) {
        let out = SharedBuffer::new();
        let err = SharedBuffer::new();
        let mut zle = Zle::new().with_output(out.clone(), err.clone());
        crate::builtins::register(&mut zle).unwrap();
        let mut session = LuaSession::new(Lua::new(), &ShellConfig::default())
            .with_diagnostics(err.clone());
        session.activate();
        (Driver::new(zle, session), out, err)
    }

    #[test]
    fn test_split_words() {
        assert_eq!(
            split_words(r#"zle -N 'my widget' "a \"b\"" c\ d"#).unwrap(),
            vec!["zle", "-N", "my widget", "a \"b\"", "c d"]
        );
        assert_eq!(split_words("  ").unwrap(), Vec::<String>::new());
        assert_eq!(split_words("''").unwrap(), vec![""]);
        assert_eq!(split_words("'open"), Err(LineError::UnterminatedQuote));
        assert_eq!(split_words("end\\"), Err(LineError::TrailingBackslash));
    }

    #[test]
    fn test_script_of_commands() {
        let (mut driver, out, err) = driver();
        let input = "\
# define and list
zle -N my-widget my_func
-A my-widget alias
zle -lL
zle -D nope
";
        let status = driver.run(input.as_bytes()).unwrap();
        assert_eq!(status, Status::Failure);
        assert_eq!(
            out.contents(),
            "zle -N alias my_func\nzle -N my-widget my_func\n"
        );
        assert_eq!(err.contents(), "zle: no such widget `nope'\n");
    }

    #[test]
    fn test_lua_lines_define_widgets() {
        let (mut driver, _out, _err) = driver();

        let status = driver.run_line("lua function hello() zle('-M', 'hi') end");
        assert_eq!(status, Status::Success);
        assert_eq!(driver.run_line("zle -N hello"), Status::Success);
        assert_eq!(driver.run_line("zle hello"), Status::Success);
        assert_eq!(driver.session().messages(), &["hi".to_string()]);
        assert_eq!(driver.run_line("lua return ("), Status::Failure);
    }

    #[test]
    fn test_finish_keeps_builtins_only() {
        let (mut driver, _out, _err) = driver();
        driver.run_line("zle -N mine");
        driver.run_line("zle -A beep bell");

        let zle = driver.finish();
        let names = zle.list_widgets(ListFormat::Names);
        assert!(!names.contains(&"mine".to_string()));
        assert!(names.contains(&"bell".to_string()));
        assert!(names.contains(&".beep".to_string()));
    }
}
