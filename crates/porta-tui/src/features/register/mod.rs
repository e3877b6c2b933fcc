//! Registration screen slice.

mod render;
mod state;
mod update;

pub use render::render_register;
pub use state::{RegisterFocus, RegisterState};
pub use update::{handle_key, handle_paste, handle_result};
