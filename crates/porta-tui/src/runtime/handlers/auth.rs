use std::sync::Arc;

use porta_core::flows;
use porta_core::identity::IdentityService;
use porta_core::validation::Credentials;

use crate::events::UiEvent;

pub async fn sign_in(service: Arc<dyn IdentityService>, credentials: Credentials) -> UiEvent {
    UiEvent::SignInFinished(flows::submit_sign_in(service.as_ref(), &credentials).await)
}

/// Runs the registration pipeline. The form has no display-name field, so
/// the profile step is skipped.
pub async fn register(service: Arc<dyn IdentityService>, credentials: Credentials) -> UiEvent {
    UiEvent::RegisterFinished(
        flows::submit_registration(service.as_ref(), &credentials, None).await,
    )
}

pub async fn sign_out(service: Arc<dyn IdentityService>) -> UiEvent {
    UiEvent::SignOutFinished(flows::sign_out(service.as_ref()).await)
}

#[cfg(test)]
mod tests {
    use porta_core::identity::MemoryIdentity;

    use super::*;

    fn credentials(email: &str, password: &str) -> Credentials {
        Credentials {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_handlers_wrap_flow_results() {
        let service: Arc<dyn IdentityService> = Arc::new(MemoryIdentity::new());

        let event = register(Arc::clone(&service), credentials("a@b.com", "secret1")).await;
        assert!(matches!(event, UiEvent::RegisterFinished(Ok(_))));

        let event = sign_out(Arc::clone(&service)).await;
        assert!(matches!(event, UiEvent::SignOutFinished(Ok(()))));

        let event = sign_in(Arc::clone(&service), credentials("a@b.com", "nope123")).await;
        assert!(matches!(event, UiEvent::SignInFinished(Err(_))));
    }
}
