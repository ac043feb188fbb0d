//! Sign-in and sign-up form checks.

use crate::credentials::Credential;
use crate::error::AuthError;
use crate::session::SessionManager;

pub const PASSWORD_MISMATCH: &str = "Passwords do not match";

/// Password and confirmation must match before a sign-up is sent.
pub fn validate_sign_up(password: &str, confirm: &str) -> Result<(), AuthError> {
    if password != confirm {
        return Err(AuthError::ValidationFailed(PASSWORD_MISMATCH.to_string()));
    }
    Ok(())
}

/// Both fields are required.
pub fn validate_sign_in(email: &str, password: &str) -> Result<(), AuthError> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(AuthError::ValidationFailed(
            "Email and password are required".to_string(),
        ));
    }
    Ok(())
}

/// Validate the sign-up form and submit it.
pub async fn submit_sign_up(
    session: &SessionManager,
    name: &str,
    email: &str,
    password: &str,
    confirm: &str,
) -> Result<Credential, AuthError> {
    validate_sign_up(password, confirm)?;
    if name.trim().is_empty() {
        return Err(AuthError::ValidationFailed("Name is required".to_string()));
    }
    session.sign_up(name.trim(), email.trim(), password).await
}
