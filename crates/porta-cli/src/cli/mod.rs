//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use porta_core::config;

use crate::logging;

mod commands;

#[derive(Parser)]
#[command(name = "porta")]
#[command(version)]
#[command(about = "Sign in to an email/password identity provider from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Sign in (password is read from stdin)
    Signin {
        /// Account email
        #[arg(long)]
        email: String,
    },

    /// Create an account (password and confirmation are read from stdin, one per line)
    Register {
        /// Account email
        #[arg(long)]
        email: String,

        /// Display name to set on the new account
        #[arg(long, value_name = "NAME")]
        display_name: Option<String>,
    },

    /// Sign out of the remembered session
    Signout,

    /// Show the signed-in account
    Whoami,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = logging::init();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    // default to the interactive app
    let Some(command) = cli.command else {
        return commands::tui::run(&load_config()?).await;
    };

    match command {
        Commands::Signin { email } => commands::auth::sign_in(&load_config()?, email).await,
        Commands::Register {
            email,
            display_name,
        } => commands::auth::register(&load_config()?, email, display_name.as_deref()).await,
        Commands::Signout => commands::auth::sign_out(&load_config()?).await,
        Commands::Whoami => commands::auth::whoami(&load_config()?),

        // Config commands work even when the existing file is broken.
        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        },
    }
}

fn load_config() -> Result<config::Config> {
    config::Config::load().context("load config")
}
