//! Credential submission flows.
//!
//! Each flow validates its form first; invalid input never reaches the
//! identity service. Registration is a sequential pipeline (create account,
//! then set the display name) that stops at the first failing step.
//!
//! Service errors are logged here with full detail. Callers show users the
//! generic messages below instead.

use crate::error::{FlowError, ServiceError};
use crate::identity::{IdentityService, ProfileUpdate, User};
use crate::validation::{Credentials, RegisterForm, SignInForm};

/// Shown when sign-in is rejected, whatever the reason.
pub const SIGN_IN_FAILED: &str = "Incorrect email or password. Please try again.";

pub const REGISTRATION_SUCCEEDED: &str = "Registration succeeded!";

/// Shown when any registration step is rejected.
pub const REGISTRATION_FAILED: &str =
    "Could not create user. Check whether the email is already registered.";

pub const SIGN_OUT_SUCCEEDED: &str = "You have signed out.";

pub const SIGN_OUT_FAILED: &str = "Sign-out failed. You are still signed in.";

/// Validates `form` and signs in.
pub async fn sign_in(service: &dyn IdentityService, form: &SignInForm) -> Result<User, FlowError> {
    let credentials = form.validate()?;
    Ok(submit_sign_in(service, &credentials).await?)
}

/// Signs in with already validated credentials.
pub async fn submit_sign_in(
    service: &dyn IdentityService,
    credentials: &Credentials,
) -> Result<User, ServiceError> {
    match service
        .sign_in(&credentials.email, &credentials.password)
        .await
    {
        Ok(user) => {
            tracing::info!(email = %user.email, backend = service.name(), "signed in");
            Ok(user)
        }
        Err(err) => {
            tracing::error!(email = %credentials.email, error = %err, "sign-in failed");
            Err(err)
        }
    }
}

/// Validates `form` and runs the registration pipeline.
pub async fn register(
    service: &dyn IdentityService,
    form: &RegisterForm,
    display_name: Option<&str>,
) -> Result<User, FlowError> {
    let credentials = form.validate()?;
    Ok(submit_registration(service, &credentials, display_name).await?)
}

/// Creates the account, then sets its display name when one is given.
pub async fn submit_registration(
    service: &dyn IdentityService,
    credentials: &Credentials,
    display_name: Option<&str>,
) -> Result<User, ServiceError> {
    let result = run_registration(service, credentials, display_name).await;
    match &result {
        Ok(user) => {
            tracing::info!(email = %user.email, backend = service.name(), "registered");
        }
        Err(err) => {
            tracing::error!(email = %credentials.email, error = %err, "registration failed");
        }
    }
    result
}

async fn run_registration(
    service: &dyn IdentityService,
    credentials: &Credentials,
    display_name: Option<&str>,
) -> Result<User, ServiceError> {
    let user = service
        .register(&credentials.email, &credentials.password)
        .await?;

    let Some(name) = display_name.map(str::trim).filter(|n| !n.is_empty()) else {
        return Ok(user);
    };
    let update = ProfileUpdate {
        display_name: Some(name.to_string()),
    };
    service.update_profile(&user, &update).await
}

/// Requests sign-out of the current user.
pub async fn sign_out(service: &dyn IdentityService) -> Result<(), ServiceError> {
    let email = service.current_user().map(|user| user.email).unwrap_or_default();
    match service.sign_out().await {
        Ok(()) => {
            tracing::info!(email = %email, backend = service.name(), "signed out");
            Ok(())
        }
        Err(err) => {
            tracing::error!(email = %email, error = %err, "sign-out failed");
            Err(err)
        }
    }
}
