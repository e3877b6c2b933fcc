//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They represent I/O and task spawning only, which keeps the reducer pure.

use porta_core::validation::Credentials;

use crate::common::TaskId;

#[derive(Debug, PartialEq, Eq)]
pub enum UiEffect {
    /// Quit the application.
    Quit,

    /// Submit validated credentials for sign-in.
    SignIn {
        task: TaskId,
        credentials: Credentials,
    },

    /// Run the registration pipeline.
    Register {
        task: TaskId,
        credentials: Credentials,
    },

    /// Request sign-out.
    SignOut { task: TaskId },

    /// Register the session observer with the identity service.
    MountObserver,

    /// Release the session observer's registration.
    UnmountObserver,
}
