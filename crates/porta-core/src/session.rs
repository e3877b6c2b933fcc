//! Session observer: tracks who is signed in for the authenticated screen.
//!
//! `mount` registers with the identity service and `unmount` releases the
//! registration. Between the two, `poll` drains pending auth-state events into
//! the exposed identity.

use crate::error::ServiceError;
use crate::flows;
use crate::identity::{AuthStateSubscription, IdentityService, User};

/// The part of a user the application shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub email: String,
}

impl From<&User> for UserIdentity {
    fn from(user: &User) -> Self {
        Self {
            email: user.email.clone(),
        }
    }
}

#[derive(Debug, Default)]
pub struct SessionObserver {
    subscription: Option<AuthStateSubscription>,
    identity: Option<UserIdentity>,
}

impl SessionObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers for auth-state events. Mounting again replaces (and releases)
    /// the previous registration.
    pub fn mount(&mut self, service: &dyn IdentityService) {
        tracing::debug!(backend = service.name(), "session observer mounted");
        self.subscription = Some(service.on_auth_state_changed());
    }

    /// Releases the registration. The last known identity is kept until the
    /// next event or `clear`.
    pub fn unmount(&mut self) {
        if self.subscription.take().is_some() {
            tracing::debug!("session observer unmounted");
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn identity(&self) -> Option<&UserIdentity> {
        self.identity.as_ref()
    }

    /// Takes the pending auth-state event without applying it.
    ///
    /// Used by event loops that route the event through their own reducer
    /// before calling `on_auth_state_changed`.
    pub fn pending_event(&mut self) -> Option<Option<User>> {
        self.subscription.as_mut()?.try_next()
    }

    /// Applies the pending auth-state event, if any, and returns it.
    pub fn poll(&mut self) -> Option<Option<User>> {
        let event = self.pending_event()?;
        self.on_auth_state_changed(event.as_ref());
        Some(event)
    }

    /// Handles one auth-state event.
    pub fn on_auth_state_changed(&mut self, user: Option<&User>) {
        self.identity = user.map(UserIdentity::from);
    }

    pub fn clear(&mut self) {
        self.identity = None;
    }

    /// Requests sign-out and clears the identity once it succeeds.
    ///
    /// On failure the identity is kept and the error is returned for the
    /// caller to report.
    pub async fn log_out(&mut self, service: &dyn IdentityService) -> Result<(), ServiceError> {
        flows::sign_out(service).await?;
        self.clear();
        Ok(())
    }
}
