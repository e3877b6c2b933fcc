//! Interactive app launcher.

use anyhow::Result;
use porta_core::config::Config;

#[cfg(feature = "tui")]
pub async fn run(config: &Config) -> Result<()> {
    use anyhow::Context;

    porta_tui::run_app(config)
        .await
        .context("interactive app failed")
}

#[cfg(not(feature = "tui"))]
pub async fn run(_config: &Config) -> Result<()> {
    anyhow::bail!("TUI support is disabled in this build (feature \"tui\").");
}
