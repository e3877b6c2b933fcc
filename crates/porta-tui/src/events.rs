//! UI event types.
//!
//! All external inputs (terminal, auth-state notifications, task results) are
//! converted to `UiEvent` before being processed by the reducer.

use crossterm::event::Event as CrosstermEvent;
use porta_core::error::ServiceError;
use porta_core::identity::User;

use crate::common::{TaskCompleted, TaskKind};

#[derive(Debug)]
pub enum UiEvent {
    /// Timer tick (spinner animation).
    Tick,

    /// Terminal input event (key, paste, resize).
    Terminal(CrosstermEvent),

    /// The mounted session observer received an auth-state change.
    AuthStateChanged(Option<User>),

    /// Sign-in request finished.
    SignInFinished(Result<User, ServiceError>),

    /// Registration pipeline finished.
    RegisterFinished(Result<User, ServiceError>),

    /// Sign-out request finished.
    SignOutFinished(Result<(), ServiceError>),

    /// Task lifecycle: runtime completed a task (wraps the result event).
    TaskCompleted {
        kind: TaskKind,
        completed: TaskCompleted<Box<UiEvent>>,
    },
}
