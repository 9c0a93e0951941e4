//! [`Session`] backed by a Lua state.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::path::Path;

use mlua::{Lua, Value, Variadic};
use zle_core::{Modifier, ShellConfig, ZleError, ZleResult};
use zle_widgets::{RefreshRequest, Session, ThingyId, WidgetKind, Zle};

use crate::argv::parse_command_line;
use crate::error::LuaSessionError;

/// Name the command surface reports itself under, and the Lua global it
/// is reachable through.
pub const ZLE_COMMAND: &str = "zle";

/// An editing session whose user widgets are Lua functions.
///
/// There is no terminal: messages, pushed-back input and redisplay
/// requests are recorded and can be inspected by the host.
pub struct LuaSession {
    lua: Lua,
    active: bool,
    completing: bool,
    trashed: bool,
    keymaps: Vec<String>,
    keymap: String,
    modifier: Modifier,
    messages: Vec<String>,
    input: VecDeque<u8>,
    last_refresh: Option<RefreshRequest>,
    err: Box<dyn Write + Send>,
}

impl LuaSession {
    /// Create an inactive session with the keymaps named in `config`.
    pub fn new(lua: Lua, config: &ShellConfig) -> Self {
        Self {
            lua,
            active: false,
            completing: false,
            trashed: false,
            keymaps: config.all_keymaps(),
            keymap: config.default_keymap.clone(),
            modifier: Modifier::default(),
            messages: Vec::new(),
            input: VecDeque::new(),
            last_refresh: None,
            err: Box::new(io::stderr()),
        }
    }

    /// Replace the sink widget failures are reported on.
    pub fn with_diagnostics(mut self, err: impl Write + Send + 'static) -> Self {
        self.err = Box::new(err);
        self
    }

    pub fn lua(&self) -> &Lua {
        &self.lua
    }

    /// Start editing. Widgets can only be called while active.
    pub fn activate(&mut self) {
        tracing::debug!("Session activated in keymap {}", self.keymap);
        self.active = true;
        self.trashed = false;
    }

    pub fn deactivate(&mut self) {
        tracing::debug!("Session deactivated");
        self.active = false;
    }

    /// Mark whether a completion function is running.
    pub fn set_in_completion(&mut self, completing: bool) {
        self.completing = completing;
    }

    /// Messages shown with `zle -M`, oldest first.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Input pushed back with `zle -U` and not yet read.
    pub fn pending_input(&self) -> Vec<u8> {
        self.input.iter().copied().collect()
    }

    /// Read one byte of pushed-back input.
    pub fn read_byte(&mut self) -> Option<u8> {
        self.input.pop_front()
    }

    /// The most recent redisplay request.
    pub fn last_refresh(&self) -> Option<&RefreshRequest> {
        self.last_refresh.as_ref()
    }

    /// Run a Lua chunk with the `zle(...)` global available.
    pub fn exec(&mut self, zle: &mut Zle, name: &str, source: &str) -> Result<(), LuaSessionError> {
        self.with_zle_command(zle, |lua| lua.load(source).set_name(name).exec())?;
        Ok(())
    }

    /// Load a script file, typically one defining widgets.
    pub fn load_script(&mut self, zle: &mut Zle, path: &Path) -> Result<(), LuaSessionError> {
        let source = std::fs::read_to_string(path).map_err(|source| LuaSessionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("Loading script {}", path.display());
        self.exec(zle, &path.display().to_string(), &source)
    }

    /// Run the Lua function backing a user widget.
    fn call_function(
        &mut self,
        zle: &mut Zle,
        function: &str,
        args: &[String],
    ) -> Result<i32, LuaSessionError> {
        let func = match self.lua.globals().get::<Value>(function)? {
            Value::Function(func) => func,
            _ => return Err(LuaSessionError::UndefinedFunction(function.to_string())),
        };
        let args: Variadic<String> = args.iter().cloned().collect();
        let value = self.with_zle_command(zle, move |_| func.call::<Value>(args))?;
        Ok(exit_code(&value))
    }

    /// Run `f` with the `zle` global bound to the command surface of
    /// `zle`, restoring whatever it was bound to before.
    fn with_zle_command<R>(
        &mut self,
        zle: &mut Zle,
        f: impl FnOnce(&Lua) -> mlua::Result<R>,
    ) -> mlua::Result<R> {
        let lua = self.lua.clone();
        let globals = lua.globals();
        let previous: Value = globals.get(ZLE_COMMAND)?;
        let session = self;

        let result = lua.scope(|scope| {
            let command = scope.create_function_mut(move |_, words: Variadic<String>| {
                let (ops, args) = parse_command_line(&words);
                Ok(zle.run(&mut *session, ZLE_COMMAND, &args, &ops).code())
            })?;
            globals.set(ZLE_COMMAND, command)?;
            f(&lua)
        });

        globals.set(ZLE_COMMAND, previous)?;
        result
    }

    fn report(&mut self, name: &str, message: &dyn std::fmt::Display) {
        tracing::debug!("{}: {}", name, message);
        if let Err(e) = writeln!(self.err, "{name}: {message}") {
            tracing::warn!("Failed to write diagnostic: {}", e);
        }
    }
}

impl Session for LuaSession {
    fn is_active(&self) -> bool {
        self.active
    }

    fn in_completion(&self) -> bool {
        self.completing
    }

    fn is_trashed(&self) -> bool {
        self.trashed
    }

    fn trash(&mut self) {
        tracing::debug!("Display invalidated");
        self.trashed = true;
    }

    fn execute(&mut self, zle: &mut Zle, thingy: ThingyId, args: &[String]) -> i32 {
        let name = zle.registry().thingies().name(thingy).to_string();
        let Some(kind) = zle.registry().widget_of(thingy).map(|w| w.kind.clone()) else {
            self.report(ZLE_COMMAND, &ZleError::UnknownName(name));
            return 1;
        };
        tracing::debug!("Executing widget {} ({:?})", name, kind);

        match kind {
            WidgetKind::Native(func) => func(args),
            WidgetKind::User { function } => {
                match self.call_function(zle, &function, args) {
                    Ok(code) => code,
                    Err(e) => {
                        self.report(&name, &e);
                        1
                    }
                }
            }
            WidgetKind::Completion { func, driver, .. } => {
                let mut argv = Vec::with_capacity(args.len() + 1);
                argv.push(driver);
                argv.extend_from_slice(args);
                func(&argv)
            }
        }
    }

    fn modifier(&self) -> Modifier {
        self.modifier
    }

    fn set_modifier(&mut self, modifier: Modifier) {
        self.modifier = modifier;
    }

    fn current_keymap(&self) -> String {
        self.keymap.clone()
    }

    fn select_keymap(&mut self, name: &str) -> ZleResult<()> {
        if !self.keymaps.iter().any(|k| k == name) {
            return Err(ZleError::NoSuchKeymap(name.to_string()));
        }
        tracing::debug!("Selected keymap {}", name);
        self.keymap = name.to_string();
        Ok(())
    }

    fn show_message(&mut self, message: &str) {
        tracing::info!("{}", message);
        self.messages.push(message.to_string());
    }

    fn unget_byte(&mut self, byte: u8) {
        self.input.push_front(byte);
    }

    fn refresh(&mut self, request: RefreshRequest) {
        tracing::debug!("Redisplay: {:?}", request);
        self.last_refresh = Some(request);
    }
}

impl std::fmt::Debug for LuaSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LuaSession")
            .field("active", &self.active)
            .field("keymap", &self.keymap)
            .field("modifier", &self.modifier)
            .finish()
    }
}

/// Widget exit code from a Lua return value: nothing or `true` is
/// success, `false` is failure, numbers are used as they are.
fn exit_code(value: &Value) -> i32 {
    match value {
        Value::Boolean(false) => 1,
        Value::Integer(n) => i32::try_from(*n).unwrap_or(1),
        Value::Number(n) => *n as i32,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zle_core::WidgetFlags;
    use zle_widgets::{Options, SharedBuffer, Status};

    fn words(w: &[&str]) -> Vec<String> {
        w.iter().map(|s| s.to_string()).collect()
    }

    fn setup() -> (Zle, LuaSession, SharedBuffer) {
        let diagnostics = SharedBuffer::new();
        let zle = Zle::new().with_output(SharedBuffer::new(), diagnostics.clone());
        let mut session = LuaSession::new(Lua::new(), &ShellConfig::default())
            .with_diagnostics(diagnostics.clone());
        session.activate();
        (zle, session, diagnostics)
    }

    fn call(zle: &mut Zle, session: &mut LuaSession, line: &[&str]) -> Status {
        let (ops, args) = parse_command_line(&words(line));
        zle.run(session, ZLE_COMMAND, &args, &ops)
    }

    fn global<T: mlua::FromLua>(session: &LuaSession, name: &str) -> T {
        session.lua().globals().get(name).unwrap()
    }

    fn expects_driver(args: &[String]) -> i32 {
        if args.first().map(String::as_str) == Some("_driver") {
            0
        } else {
            1
        }
    }

    #[test]
    fn test_user_widget_runs_lua_function() {
        let (mut zle, mut session, _err) = setup();
        session
            .exec(
                &mut zle,
                "init",
                r#"
                function greet(...)
                    seen = table.concat({...}, ",")
                    return 3
                end
                zle("-N", "greet")
                "#,
            )
            .unwrap();

        assert_eq!(call(&mut zle, &mut session, &["greet", "a", "b"]), Status::Failure);
        assert_eq!(global::<String>(&session, "seen"), "a,b");
    }

    #[test]
    fn test_widget_calls_back_into_zle() {
        let (mut zle, mut session, _err) = setup();
        session
            .exec(
                &mut zle,
                "init",
                r#"
                function say() return zle("-M", "hello") end
                function push() zle("-U", "abc") end
                zle("-N", "say")
                zle("-N", "push")
                "#,
            )
            .unwrap();

        assert_eq!(call(&mut zle, &mut session, &["say"]), Status::Success);
        assert_eq!(session.messages(), &["hello".to_string()]);
        assert_eq!(call(&mut zle, &mut session, &["push"]), Status::Success);
        assert_eq!(session.pending_input(), b"abc".to_vec());
        assert_eq!(session.read_byte(), Some(b'a'));
    }

    #[test]
    fn test_nested_calls_restore_zle_global() {
        let (mut zle, mut session, _err) = setup();
        session
            .exec(
                &mut zle,
                "init",
                r#"
                function inner() depth = (depth or 0) + 1 end
                function outer()
                    zle("inner")
                    zle("inner", "-K", "vicmd")
                    still_bound = type(zle) == "function"
                end
                zle("-N", "inner")
                zle("-N", "outer")
                "#,
            )
            .unwrap();

        assert_eq!(call(&mut zle, &mut session, &["outer", "-K", "viins"]), Status::Success);
        assert_eq!(global::<i64>(&session, "depth"), 2);
        assert!(global::<bool>(&session, "still_bound"));
        assert!(global::<Value>(&session, ZLE_COMMAND).is_nil());
        assert_eq!(session.current_keymap(), "main");
    }

    #[test]
    fn test_undefined_function_reported() {
        let (mut zle, mut session, err) = setup();
        zle.define("ghost", Some("no_such_fn")).unwrap();

        assert_eq!(call(&mut zle, &mut session, &["ghost"]), Status::Failure);
        assert_eq!(err.contents(), "ghost: function `no_such_fn' is not defined\n");
    }

    #[test]
    fn test_unbound_name_reported() {
        let (mut zle, mut session, err) = setup();

        assert_eq!(call(&mut zle, &mut session, &["missing"]), Status::Failure);
        assert_eq!(err.contents(), "zle: no such widget `missing'\n");
        assert!(zle.registry().thingies().lookup("missing").is_none());
    }

    #[test]
    fn test_completion_widget_receives_driver() {
        let (mut zle, mut session, _err) = setup();
        zle.add_function("complete-word", expects_driver, WidgetFlags::IS_COMPLETION)
            .unwrap();
        zle.wrap_completion("my-complete", "complete-word", "_driver")
            .unwrap();

        assert_eq!(call(&mut zle, &mut session, &["my-complete"]), Status::Success);
        assert_eq!(call(&mut zle, &mut session, &["complete-word"]), Status::Failure);
    }

    #[test]
    fn test_select_keymap() {
        let (_zle, mut session, _err) = setup();

        session.select_keymap("vicmd").unwrap();
        assert_eq!(session.current_keymap(), "vicmd");
        assert_eq!(
            session.select_keymap("nope"),
            Err(ZleError::NoSuchKeymap("nope".to_string()))
        );
        assert_eq!(session.current_keymap(), "vicmd");
    }

    #[test]
    fn test_refresh_and_invalidate() {
        let (mut zle, mut session, _err) = setup();

        assert_eq!(call(&mut zle, &mut session, &["-R", "status", "x"]), Status::Success);
        assert_eq!(
            session.last_refresh().and_then(|r| r.status.clone()),
            Some("status".to_string())
        );
        assert_eq!(call(&mut zle, &mut session, &["-I"]), Status::Success);
        assert!(session.is_trashed());

        session.deactivate();
        assert_eq!(call(&mut zle, &mut session, &["-I"]), Status::Failure);
        assert_eq!(zle.run(&mut session, ZLE_COMMAND, &[], &Options::new()), Status::Failure);
    }

    #[test]
    fn test_load_script() {
        let (mut zle, mut session, _err) = setup();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("init.lua");
        std::fs::write(&path, "function w() end\nzle('-N', 'w')\nzle('-A', 'w', 'w2')\n").unwrap();

        session.load_script(&mut zle, &path).unwrap();
        assert!(zle.registry().widget_named("w2").is_some());

        let missing = dir.path().join("missing.lua");
        assert!(matches!(
            session.load_script(&mut zle, &missing),
            Err(LuaSessionError::Io { .. })
        ));
    }

    #[test]
    fn test_script_error() {
        let (mut zle, mut session, _err) = setup();
        let result = session.exec(&mut zle, "bad", "return invalid_syntax(");
        assert!(matches!(result, Err(LuaSessionError::Lua(_))));
    }

    #[test]
    fn test_exit_code() {
        assert_eq!(exit_code(&Value::Nil), 0);
        assert_eq!(exit_code(&Value::Boolean(true)), 0);
        assert_eq!(exit_code(&Value::Boolean(false)), 1);
        assert_eq!(exit_code(&Value::Integer(4)), 4);
    }
}
