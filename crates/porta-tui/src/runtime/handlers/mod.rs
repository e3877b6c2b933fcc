//! Effect handlers.
//!
//! Handlers are async functions that perform I/O and return the `UiEvent`
//! carrying the result. The runtime spawns them and routes the event back
//! through the inbox.

mod auth;

pub use auth::{register, sign_in, sign_out};
