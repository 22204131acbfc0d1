//! Session precondition.

use crate::RateLimitedCaller;
use herald_error::{AuthError, AuthErrorKind};
use serde_json::json;
use tracing::{info, instrument};

/// Confirm that the gateway holds a signed-in session.
///
/// Asks for the current user's profile. Login itself happens out of band;
/// this only verifies its result before the service starts.
///
/// # Errors
///
/// Returns an [`AuthError`] when the profile call fails or yields nothing.
#[instrument(skip(caller))]
pub async fn ensure_session(caller: &RateLimitedCaller) -> Result<(), AuthError> {
    let user = caller
        .call("users.getFullUser", &json!({ "id": { "_": "inputUserSelf" } }))
        .await
        .map_err(|e| AuthError::new(AuthErrorKind::SessionUnavailable(e.kind.to_string())))?;

    if user.is_null() {
        return Err(AuthError::new(AuthErrorKind::NotSignedIn));
    }

    info!("Gateway session is signed in");
    Ok(())
}
