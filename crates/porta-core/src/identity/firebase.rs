//! Firebase Authentication backend (Identity Toolkit REST API v1).
//!
//! Endpoints:
//! - `POST {base}/accounts:signInWithPassword?key=..`
//! - `POST {base}/accounts:signUp?key=..`
//! - `POST {base}/accounts:update?key=..`
//! - `POST {token}/token?key=..` (form-encoded refresh grant)
//!
//! The session (ID token, refresh token, expiry) is kept in the persistence
//! adapter under `authUser:<api_key>:[DEFAULT]`, so a later process starts
//! signed in. Sign-out is local: the stored session is removed.
//! Tokens are never logged.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::Context;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{AuthStateNotifier, AuthStateSubscription, IdentityService, ProfileUpdate, User};
use crate::error::ServiceError;
use crate::store::KeyValueStore;

/// Tokens expiring within this window are refreshed before use.
const EXPIRY_SKEW_MS: u64 = 60_000;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

fn now_millis_u64() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|d| u64::try_from(d.as_millis()).ok())
        .unwrap_or(u64::MAX)
}

/// Session record as stored in the persistence adapter.
#[derive(Clone, Serialize, Deserialize)]
struct PersistedSession {
    uid: String,
    email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    display_name: Option<String>,
    id_token: String,
    refresh_token: String,
    /// Expiry timestamp in milliseconds since epoch.
    expires_at: u64,
}

impl PersistedSession {
    fn user(&self) -> User {
        User {
            uid: self.uid.clone(),
            email: self.email.clone(),
            display_name: self.display_name.clone(),
        }
    }

    fn is_expired(&self) -> bool {
        now_millis_u64().saturating_add(EXPIRY_SKEW_MS) >= self.expires_at
    }
}

fn expires_at(expires_in: &str) -> Result<u64, ServiceError> {
    let secs: u64 = expires_in
        .trim()
        .parse()
        .map_err(|_| ServiceError::InvalidResponse(format!("bad expiresIn: {expires_in}")))?;
    Ok(now_millis_u64().saturating_add(secs.saturating_mul(1000)))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateProfileRequest<'a> {
    id_token: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    delete_attribute: Vec<&'static str>,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    id_token: String,
    refresh_token: String,
    expires_in: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateResponse {
    local_id: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    id_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<String>,
}

#[derive(Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
    expires_in: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Maps a non-2xx response to a rejection.
///
/// Firebase messages look like `EMAIL_EXISTS` or
/// `WEAK_PASSWORD : Password should be at least 6 characters`.
fn parse_error(status: StatusCode, body: &str) -> ServiceError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => {
            let message = envelope.error.message;
            match message.split_once(" : ") {
                Some((code, detail)) => ServiceError::Rejected {
                    code: code.trim().to_string(),
                    detail: Some(detail.trim().to_string()),
                },
                None => ServiceError::rejected(message.trim()),
            }
        }
        Err(_) => ServiceError::rejected(format!("HTTP_{}", status.as_u16())),
    }
}

/// Firebase Authentication client.
pub struct FirebaseAuth {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    token_url: String,
    store: Arc<dyn KeyValueStore>,
    session: Mutex<Option<PersistedSession>>,
    notifier: AuthStateNotifier,
}

impl FirebaseAuth {
    /// Creates a client and restores any session found in `store`.
    ///
    /// An unreadable stored session is discarded (logged), not fatal.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        token_url: impl Into<String>,
        store: Arc<dyn KeyValueStore>,
    ) -> anyhow::Result<Self> {
        let api_key = api_key.into();
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        let session = match restore_session(store.as_ref(), &persistence_key(&api_key)) {
            Ok(session) => session,
            Err(err) => {
                tracing::warn!(error = %err, "discarding unreadable stored session");
                None
            }
        };
        if let Some(session) = &session {
            tracing::debug!(email = %session.email, "restored persisted session");
        }
        let notifier = AuthStateNotifier::new(session.as_ref().map(PersistedSession::user));

        Ok(Self {
            http,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token_url: token_url.into().trim_end_matches('/').to_string(),
            store,
            session: Mutex::new(session),
            notifier,
        })
    }

    fn key(&self) -> String {
        persistence_key(&self.api_key)
    }

    fn session(&self) -> MutexGuard<'_, Option<PersistedSession>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn post_json<B, T>(&self, url: String, body: &B) -> Result<T, ServiceError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .http
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await?;
        read_response(response).await
    }

    /// Makes `session` the current one: persists it and notifies observers.
    ///
    /// A failed write only costs session restore on the next start, so it is
    /// logged rather than failing the sign-in.
    fn activate(&self, session: PersistedSession) -> User {
        let user = session.user();
        match serde_json::to_string(&session) {
            Ok(json) => {
                if let Err(err) = self.store.set(&self.key(), &json) {
                    tracing::warn!(error = %err, "failed to persist session");
                }
            }
            Err(err) => tracing::warn!(error = %err, "failed to serialize session"),
        }
        *self.session() = Some(session);
        self.notifier.publish(Some(user.clone()));
        user
    }

    fn session_from_auth(
        response: AuthResponse,
        fallback_email: &str,
    ) -> Result<PersistedSession, ServiceError> {
        Ok(PersistedSession {
            expires_at: expires_at(&response.expires_in)?,
            uid: response.local_id,
            email: response.email.unwrap_or_else(|| fallback_email.to_string()),
            display_name: response.display_name.filter(|n| !n.is_empty()),
            id_token: response.id_token,
            refresh_token: response.refresh_token,
        })
    }

    async fn password_request(
        &self,
        endpoint: &str,
        email: &str,
        password: &str,
    ) -> Result<User, ServiceError> {
        let body = PasswordRequest {
            email,
            password,
            return_secure_token: true,
        };
        let response: AuthResponse = self
            .post_json(format!("{}/accounts:{endpoint}", self.base_url), &body)
            .await?;
        let session = Self::session_from_auth(response, email)?;
        Ok(self.activate(session))
    }

    /// Returns the current session for `uid`, refreshing its ID token first
    /// if it has expired.
    async fn fresh_session(&self, uid: &str) -> Result<PersistedSession, ServiceError> {
        let session = self
            .session()
            .clone()
            .filter(|s| s.uid == uid)
            .ok_or(ServiceError::NotSignedIn)?;
        if !session.is_expired() {
            return Ok(session);
        }

        tracing::debug!("refreshing expired ID token");
        let response = self
            .http
            .post(format!("{}/token", self.token_url))
            .query(&[("key", self.api_key.as_str())])
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", session.refresh_token.as_str()),
            ])
            .send()
            .await?;
        let refreshed: RefreshResponse = read_response(response).await?;

        let session = PersistedSession {
            id_token: refreshed.id_token,
            refresh_token: refreshed.refresh_token,
            expires_at: expires_at(&refreshed.expires_in)?,
            ..session
        };
        self.activate(session.clone());
        Ok(session)
    }
}

fn persistence_key(api_key: &str) -> String {
    format!("authUser:{api_key}:[DEFAULT]")
}

fn restore_session(
    store: &dyn KeyValueStore,
    key: &str,
) -> anyhow::Result<Option<PersistedSession>> {
    let Some(json) = store.get(key)? else {
        return Ok(None);
    };
    let session = serde_json::from_str(&json).context("Failed to parse stored session")?;
    Ok(Some(session))
}

async fn read_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ServiceError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(parse_error(status, &body));
    }
    serde_json::from_str(&body).map_err(|e| ServiceError::InvalidResponse(e.to_string()))
}

#[async_trait]
impl IdentityService for FirebaseAuth {
    fn name(&self) -> &'static str {
        "firebase"
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<User, ServiceError> {
        self.password_request("signInWithPassword", email, password).await
    }

    async fn register(&self, email: &str, password: &str) -> Result<User, ServiceError> {
        self.password_request("signUp", email, password).await
    }

    async fn update_profile(
        &self,
        user: &User,
        update: &ProfileUpdate,
    ) -> Result<User, ServiceError> {
        let session = self.fresh_session(&user.uid).await?;

        let display_name = update.display_name.as_deref();
        let body = UpdateProfileRequest {
            id_token: &session.id_token,
            display_name,
            delete_attribute: if display_name.is_none() {
                vec!["DISPLAY_NAME"]
            } else {
                Vec::new()
            },
            return_secure_token: true,
        };
        let response: UpdateResponse = self
            .post_json(format!("{}/accounts:update", self.base_url), &body)
            .await?;
        if response.local_id != session.uid {
            return Err(ServiceError::InvalidResponse(
                "profile update returned a different account".to_string(),
            ));
        }

        let expiry = match response.expires_in.as_deref() {
            Some(expires_in) => expires_at(expires_in)?,
            None => session.expires_at,
        };
        let updated = PersistedSession {
            display_name: response.display_name.filter(|n| !n.is_empty()),
            id_token: response.id_token.unwrap_or(session.id_token),
            refresh_token: response.refresh_token.unwrap_or(session.refresh_token),
            expires_at: expiry,
            uid: session.uid,
            email: session.email,
        };
        Ok(self.activate(updated))
    }

    async fn sign_out(&self) -> Result<(), ServiceError> {
        self.store
            .remove(&self.key())
            .map_err(ServiceError::Storage)?;
        *self.session() = None;
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
