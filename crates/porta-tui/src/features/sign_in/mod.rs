//! Sign-in screen slice.

mod render;
mod state;
mod update;

pub use render::render_sign_in;
pub use state::{SignInFocus, SignInState};
pub use update::{handle_key, handle_paste, handle_result};
