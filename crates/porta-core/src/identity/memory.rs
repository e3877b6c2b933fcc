//! In-process identity backend.
//!
//! Accounts live in a map for the lifetime of the value. Error codes mirror
//! the ones Firebase returns so callers see the same rejections offline.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use super::{AuthStateNotifier, AuthStateSubscription, IdentityService, ProfileUpdate, User};
use crate::error::ServiceError;
use crate::validation::{MIN_PASSWORD_LEN, is_valid_email};

struct Account {
    password: String,
    user: User,
}

#[derive(Default)]
struct Accounts {
    by_email: HashMap<String, Account>,
    next_uid: u64,
}

/// Identity provider backed by an in-memory account table.
pub struct MemoryIdentity {
    accounts: Mutex<Accounts>,
    notifier: AuthStateNotifier,
}

impl Default for MemoryIdentity {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryIdentity {
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(Accounts::default()),
            notifier: AuthStateNotifier::new(None),
        }
    }

    /// Seeds an account without signing it in.
    #[must_use]
    pub fn with_account(self, email: &str, password: &str) -> Self {
        {
            let mut accounts = self.accounts();
            let user = accounts.allocate(email);
            accounts.by_email.insert(
                email.to_lowercase(),
                Account {
                    password: password.to_string(),
                    user,
                },
            );
        }
        self
    }

    fn accounts(&self) -> MutexGuard<'_, Accounts> {
        self.accounts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Accounts {
    fn allocate(&mut self, email: &str) -> User {
        self.next_uid += 1;
        User {
            uid: format!("local-{}", self.next_uid),
            email: email.to_string(),
            display_name: None,
        }
    }
}

#[async_trait]
impl IdentityService for MemoryIdentity {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<User, ServiceError> {
        let user = {
            let accounts = self.accounts();
            let account = accounts
                .by_email
                .get(&email.to_lowercase())
                .ok_or_else(|| ServiceError::rejected("EMAIL_NOT_FOUND"))?;
            if account.password != password {
                return Err(ServiceError::rejected("INVALID_PASSWORD"));
            }
            account.user.clone()
        };
        self.notifier.publish(Some(user.clone()));
        Ok(user)
    }

    async fn register(&self, email: &str, password: &str) -> Result<User, ServiceError> {
        if !is_valid_email(email) {
            return Err(ServiceError::rejected("INVALID_EMAIL"));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ServiceError::Rejected {
                code: "WEAK_PASSWORD".to_string(),
                detail: Some(format!(
                    "Password should be at least {MIN_PASSWORD_LEN} characters"
                )),
            });
        }

        let user = {
            let mut accounts = self.accounts();
            let key = email.to_lowercase();
            if accounts.by_email.contains_key(&key) {
                return Err(ServiceError::rejected("EMAIL_EXISTS"));
            }
            let user = accounts.allocate(email);
            accounts.by_email.insert(
                key,
                Account {
                    password: password.to_string(),
                    user: user.clone(),
                },
            );
            user
        };
        self.notifier.publish(Some(user.clone()));
        Ok(user)
    }

    async fn update_profile(
        &self,
        user: &User,
        update: &ProfileUpdate,
    ) -> Result<User, ServiceError> {
        if self.notifier.current().is_none_or(|current| current.uid != user.uid) {
            return Err(ServiceError::NotSignedIn);
        }

        let updated = {
            let mut accounts = self.accounts();
            let account = accounts
                .by_email
                .values_mut()
                .find(|a| a.user.uid == user.uid)
                .ok_or_else(|| ServiceError::rejected("USER_NOT_FOUND"))?;
            account.user.display_name = update.display_name.clone();
            account.user.clone()
        };
        self.notifier.publish(Some(updated.clone()));
        Ok(updated)
    }

    async fn sign_out(&self) -> Result<(), ServiceError> {
        self.notifier.publish(None);
        Ok(())
    }

    fn on_auth_state_changed(&self) -> AuthStateSubscription {
        self.notifier.subscribe()
    }

    fn current_user(&self) -> Option<User> {
        self.notifier.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_register_then_sign_in() {
        let identity = MemoryIdentity::new();
        let registered = identity.register("a@b.com", "secret1").await.unwrap();
        assert_eq!(registered.uid, "local-1");
        assert_eq!(identity.current_user(), Some(registered.clone()));

        identity.sign_out().await.unwrap();
        assert_eq!(identity.current_user(), None);

        let signed_in = identity.sign_in("A@B.com", "secret1").await.unwrap();
        assert_eq!(signed_in, registered);
    }

    #[tokio::test]
    async fn test_rejections() {
        let identity = MemoryIdentity::new().with_account("a@b.com", "secret1");

        let err = identity.sign_in("nobody@b.com", "secret1").await.unwrap_err();
        assert_eq!(err.code(), Some("EMAIL_NOT_FOUND"));

        let err = identity.sign_in("a@b.com", "wrong12").await.unwrap_err();
        assert_eq!(err.code(), Some("INVALID_PASSWORD"));

        let err = identity.register("a@b.com", "secret1").await.unwrap_err();
        assert_eq!(err.code(), Some("EMAIL_EXISTS"));

        let err = identity.register("c@d.com", "123").await.unwrap_err();
        assert_eq!(err.code(), Some("WEAK_PASSWORD"));

        let err = identity.register("not-an-email", "secret1").await.unwrap_err();
        assert_eq!(err.code(), Some("INVALID_EMAIL"));

        assert_eq!(identity.current_user(), None);
    }

    #[tokio::test]
    async fn test_update_profile() {
        let identity = MemoryIdentity::new();
        let user = identity.register("a@b.com", "secret1").await.unwrap();
        let update = ProfileUpdate {
            display_name: Some("Ada".to_string()),
        };

        let updated = identity.update_profile(&user, &update).await.unwrap();
        assert_eq!(updated.display_name.as_deref(), Some("Ada"));

        identity.sign_out().await.unwrap();
        let err = identity.update_profile(&user, &update).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotSignedIn));
    }

    #[tokio::test]
    async fn test_notifications() {
        let identity = MemoryIdentity::new().with_account("x@y.com", "secret1");
        let mut sub = identity.on_auth_state_changed();
        assert_eq!(sub.try_next(), Some(None));

        identity.sign_in("x@y.com", "secret1").await.unwrap();
        let user = sub.try_next().flatten().unwrap();
        assert_eq!(user.email, "x@y.com");

        identity.sign_out().await.unwrap();
        assert_eq!(sub.try_next(), Some(None));
    }
}
