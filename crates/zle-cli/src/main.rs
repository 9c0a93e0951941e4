//! zle-shell - runs `zle` commands against a widget registry.
//!
//! Loads the config, registers the builtin widgets, runs the init
//! script and then reads commands from stdin, one per line.

mod builtins;
mod driver;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use mlua::Lua;
use zle_core::ShellConfig;
use zle_lua::LuaSession;
use zle_widgets::Zle;

use crate::driver::Driver;

#[derive(Parser, Debug)]
#[command(name = "zle-shell")]
#[command(about = "Run zle widget commands")]
#[command(version)]
struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Lua script to load instead of the configured init script
    #[arg(long)]
    script: Option<PathBuf>,

    /// Run this command instead of reading stdin (repeatable)
    #[arg(short = 'c', long = "command")]
    commands: Vec<String>,
}

fn init_tracing(default_filter: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(true))
        .with(filter)
        .init();
}

fn load_config(cli: &Cli) -> Result<ShellConfig, zle_core::ConfigError> {
    match &cli.config {
        Some(path) => ShellConfig::load(path),
        None => ShellConfig::load_default(),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config.log_filter);
    tracing::info!("zle-shell starting...");

    let mut zle = Zle::new();
    if let Err(e) = builtins::register(&mut zle) {
        tracing::error!("Failed to register builtin widgets: {}", e);
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let mut session = LuaSession::new(Lua::new(), &config);
    session.activate();
    let mut driver = Driver::new(zle, session);

    if let Some(script) = cli.script.as_ref().or(config.init_script.as_ref()) {
        if let Err(e) = driver.load_script(script) {
            tracing::error!("Failed to load {}: {}", script.display(), e);
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    }

    let status = if cli.commands.is_empty() {
        match driver.run(io::stdin().lock()) {
            Ok(status) => status,
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        let mut status = zle_core::Status::Success;
        for command in &cli.commands {
            status = driver.run_line(command);
        }
        status
    };

    driver.finish();
    tracing::info!("zle-shell exiting");
    ExitCode::from(status.code() as u8)
}
