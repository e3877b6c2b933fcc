//! Authenticated home screen slice.
//!
//! Shows the signed-in identity from the session observer and offers log out.

mod render;
mod update;

use porta_core::session::SessionObserver;
pub use render::render_home;
pub use update::{HomeAction, handle_key, handle_sign_out_result};

#[derive(Debug, Default)]
pub struct HomeState {
    /// Mounted while Home is the active screen.
    pub observer: SessionObserver,
}

impl HomeState {
    pub fn new() -> Self {
        Self::default()
    }
}
