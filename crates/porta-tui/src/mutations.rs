//! Cross-slice state mutations.
//!
//! Feature reducers return these to request changes outside their own slice.
//! The main reducer applies them in order.

use crate::navigator::Trigger;
use crate::overlays::NoticeState;

#[derive(Debug)]
pub enum StateMutation {
    /// Ask the navigator to apply a transition.
    Navigate(Trigger),
    /// Open a blocking notice.
    ShowNotice(NoticeState),
    /// Forget the identity exposed by the session observer.
    ClearIdentity,
}
