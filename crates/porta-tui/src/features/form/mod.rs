//! Building blocks shared by the credential forms.

pub mod field;
mod render;

use porta_core::validation::Credentials;
pub use field::TextField;
pub use render::{FIELD_HEIGHT, FORM_WIDTH, render_button, render_field, render_form_card};

use crate::navigator::Trigger;

/// What a form key handler asks the reducer to do.
#[derive(Debug, PartialEq, Eq)]
pub enum FormAction {
    None,
    /// Input passed validation; start the submission task.
    Submit(Credentials),
    Navigate(Trigger),
    Quit,
}
