//! Thin wrappers over the backend's session endpoints.

use crate::api::AuthApi;
use crate::domain::user::CurrentUser;
use crate::services::{ServiceError, ServiceResult};

/// Returns the signed-in user, `None` when the session is missing or expired.
pub async fn current_user<A>(api: &A) -> ServiceResult<Option<CurrentUser>>
where
    A: AuthApi + ?Sized,
{
    match api.current_user().await {
        Ok(user) => Ok(Some(user)),
        Err(err) => match ServiceError::from(err) {
            ServiceError::Unauthorized => Ok(None),
            err => {
                log::error!("Failed to load current user: {err}");
                Err(err)
            }
        },
    }
}

/// Ends the backend session. Failures are logged; the visitor is signed out
/// locally either way.
pub async fn logout<A>(api: &A)
where
    A: AuthApi + ?Sized,
{
    if let Err(err) = api.logout().await {
        log::error!("Logout error: {err}");
    }
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::api::errors::ApiError;
    use crate::api::mock::MockAuthApi;

    #[tokio::test]
    async fn expired_session_means_no_user() {
        let mut api = MockAuthApi::new();
        api.expect_current_user()
            .times(1)
            .returning(|| Err(ApiError::Unauthorized));

        assert_eq!(current_user(&api).await.unwrap(), None);
    }

    #[tokio::test]
    async fn other_failures_are_reported() {
        let mut api = MockAuthApi::new();
        api.expect_current_user()
            .times(1)
            .returning(|| Err(ApiError::Transport("timeout".into())));

        assert!(matches!(
            current_user(&api).await,
            Err(ServiceError::Transport(_))
        ));
    }

    #[tokio::test]
    async fn logout_swallows_errors() {
        let mut api = MockAuthApi::new();
        api.expect_logout()
            .times(1)
            .returning(|| Err(ApiError::Transport("timeout".into())));

        logout(&api).await;
    }
}
