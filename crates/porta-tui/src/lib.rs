//! Full-screen TUI for Porta: sign-in, registration and the signed-in home
//! screen.

pub mod common;
pub mod effects;
pub mod events;
pub mod features;
pub mod mutations;
pub mod navigator;
pub mod overlays;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, Write, stderr};

use anyhow::Result;
use porta_core::config::{Config, paths};
use porta_core::identity;
pub use runtime::TuiRuntime;

/// Runs the interactive sign-in app against the backend selected by `config`.
pub async fn run_app(config: &Config) -> Result<()> {
    if !stderr().is_terminal() {
        anyhow::bail!(
            "The interactive app requires a terminal.\n\
             Use `porta signin` or `porta register` for non-interactive use."
        );
    }

    let service = identity::connect(config)?;

    // Print pre-TUI info to stderr (will be replaced by alternate screen)
    let mut err = stderr();
    writeln!(err, "Porta")?;
    writeln!(err, "Backend: {}", config.provider.display_name())?;
    if let Some(user) = service.current_user() {
        writeln!(err, "Restored session for {}", user.email)?;
    }
    let config_path = paths::config_path();
    if config_path.exists() {
        writeln!(err, "Config file: {}", config_path.display())?;
    }
    err.flush()?;

    tracing::info!(backend = service.name(), "starting interactive app");
    let mut runtime = TuiRuntime::new(service)?;
    runtime.run()?;

    writeln!(stderr(), "Goodbye!")?;

    Ok(())
}
