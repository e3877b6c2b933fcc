//! Identity service contract and backends.
//!
//! `IdentityService` is the only way the application talks to the identity
//! provider. Backends:
//! - `firebase`: Firebase Authentication REST API
//! - `memory`: in-process account table (offline use, tests)
//!
//! ## Auth-state notifications
//!
//! Backends own an `AuthStateNotifier` and publish the signed-in user (or
//! `None`) whenever it changes. Observers call `on_auth_state_changed()` to get
//! an `AuthStateSubscription`; dropping the subscription deregisters it.
//! The first poll of a fresh subscription yields the current state, later
//! polls yield only changes. Rapid successive changes coalesce to the latest.

pub mod firebase;
pub mod memory;

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

pub use self::firebase::FirebaseAuth;
pub use self::memory::MemoryIdentity;
use crate::config::{Config, ProviderKind, paths};
use crate::error::ServiceError;
use crate::store::{FileStore, KeyValueStore, MemoryStore};

/// Account as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub uid: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// Profile fields to change. `None` removes the display name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
}

/// Remote (or local) email/password identity provider.
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Human-readable backend name for logs and status lines.
    fn name(&self) -> &'static str;

    async fn sign_in(&self, email: &str, password: &str) -> Result<User, ServiceError>;

    /// Creates an account and signs it in.
    async fn register(&self, email: &str, password: &str) -> Result<User, ServiceError>;

    async fn update_profile(&self, user: &User, update: &ProfileUpdate)
    -> Result<User, ServiceError>;

    async fn sign_out(&self) -> Result<(), ServiceError>;

    /// Registers an auth-state observer. Drop the subscription to release it.
    fn on_auth_state_changed(&self) -> AuthStateSubscription;

    fn current_user(&self) -> Option<User>;
}

/// Publishing side of auth-state notifications.
#[derive(Debug)]
pub struct AuthStateNotifier {
    tx: watch::Sender<Option<User>>,
}

impl AuthStateNotifier {
    pub fn new(initial: Option<User>) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Replaces the current state and wakes every subscriber.
    pub fn publish(&self, user: Option<User>) {
        self.tx.send_replace(user);
    }

    pub fn current(&self) -> Option<User> {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> AuthStateSubscription {
        AuthStateSubscription {
            rx: self.tx.subscribe(),
            initial_pending: true,
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for AuthStateNotifier {
    /// Starts signed out.
    fn default() -> Self {
        Self::new(None)
    }
}

/// Receiving side of auth-state notifications.
#[derive(Debug)]
pub struct AuthStateSubscription {
    rx: watch::Receiver<Option<User>>,
    initial_pending: bool,
}

impl AuthStateSubscription {
    /// Returns the next state without blocking, or `None` if nothing changed
    /// since the last call.
    pub fn try_next(&mut self) -> Option<Option<User>> {
        if self.initial_pending {
            self.initial_pending = false;
            return Some(self.rx.borrow_and_update().clone());
        }
        match self.rx.has_changed() {
            Ok(true) => Some(self.rx.borrow_and_update().clone()),
            Ok(false) | Err(_) => None,
        }
    }
}

/// Builds the identity backend selected by `config`.
///
/// The Firebase backend persists its session in `${PORTA_HOME}/session.json`
/// unless `remember_session` is off.
pub fn connect(config: &Config) -> Result<Arc<dyn IdentityService>> {
    let store: Arc<dyn KeyValueStore> = if config.remember_session {
        Arc::new(FileStore::default_location())
    } else {
        Arc::new(MemoryStore::new())
    };

    match config.provider {
        ProviderKind::Firebase => {
            let Some(api_key) = config.firebase.effective_api_key() else {
                anyhow::bail!(
                    "No Firebase API key configured.\n\
                     Set PORTA_API_KEY or firebase.api_key in {}",
                    paths::config_path().display()
                );
            };
            let auth = FirebaseAuth::new(
                api_key,
                config.firebase.effective_base_url(),
                config.firebase.effective_token_url(),
                store,
            )
            .context("Failed to initialize Firebase backend")?;
            Ok(Arc::new(auth))
        }
        ProviderKind::Memory => Ok(Arc::new(MemoryIdentity::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str) -> User {
        User {
            uid: format!("uid-{email}"),
            email: email.to_string(),
            display_name: None,
        }
    }

    #[test]
    fn test_subscription_yields_current_state_first() {
        let notifier = AuthStateNotifier::new(Some(user("x@y.com")));
        let mut sub = notifier.subscribe();

        assert_eq!(sub.try_next(), Some(Some(user("x@y.com"))));
        assert_eq!(sub.try_next(), None);
    }

    #[test]
    fn test_subscription_sees_changes() {
        let notifier = AuthStateNotifier::new(None);
        let mut sub = notifier.subscribe();
        assert_eq!(sub.try_next(), Some(None));

        notifier.publish(Some(user("a@b.com")));
        assert_eq!(sub.try_next(), Some(Some(user("a@b.com"))));

        notifier.publish(None);
        assert_eq!(sub.try_next(), Some(None));
        assert_eq!(sub.try_next(), None);
    }

    #[test]
    fn test_dropping_subscription_deregisters() {
        let notifier = AuthStateNotifier::new(None);
        let sub = notifier.subscribe();
        assert_eq!(notifier.subscriber_count(), 1);

        drop(sub);
        assert_eq!(notifier.subscriber_count(), 0);

        // Publishing without subscribers still updates the current state.
        notifier.publish(Some(user("a@b.com")));
        assert_eq!(notifier.current(), Some(user("a@b.com")));
    }

    #[test]
    fn test_connect_memory_backend() {
        let config = Config {
            provider: ProviderKind::Memory,
            remember_session: false,
            ..Config::default()
        };
        let service = connect(&config).unwrap();
        assert_eq!(service.name(), "memory");
        assert_eq!(service.current_user(), None);
    }
}
