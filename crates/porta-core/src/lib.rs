//! Porta core: configuration, identity backends, form validation and the
//! credential submission flows shared by the TUI and the CLI.

pub mod config;
pub mod error;
pub mod flows;
pub mod identity;
pub mod session;
pub mod store;
pub mod validation;
