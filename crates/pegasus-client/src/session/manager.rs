//! Sign-in, sign-up and sign-out against the auth endpoints.

use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::credentials::{Credential, CredentialStore, UserProfile};
use crate::error::{AuthError, ClientError, Result};
use crate::gateway::{ApiRequest, ApiResponse, Gateway};

use super::events::{SessionEvent, SessionEventBus};

const SIGN_IN_PATH: &str = "api/auth/signin";
const SIGN_UP_PATH: &str = "api/auth/signup";
const PROFILE_PATH: &str = "api/user/profile";

/// Body of a successful sign-in or sign-up.
#[derive(Debug, Deserialize)]
struct AuthResponse {
    user: UserProfile,
    token: String,
}

#[derive(Debug, Deserialize)]
struct ProfileResponse {
    user: UserProfile,
}

/// Authentication state and the operations that change it.
///
/// Holds no state of its own; every query re-reads the credential store.
#[derive(Clone, Debug)]
pub struct SessionManager {
    gateway: Gateway,
    store: CredentialStore,
    events: SessionEventBus,
    remember_days: u32,
}

impl SessionManager {
    pub fn new(
        gateway: Gateway,
        store: CredentialStore,
        events: SessionEventBus,
        remember_days: u32,
    ) -> Self {
        Self {
            gateway,
            store,
            events,
            remember_days,
        }
    }

    /// Sign in with email and password.
    ///
    /// With `remember`, the stored credential gets an expiry
    /// `remember_days` out.
    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
        remember: bool,
    ) -> std::result::Result<Credential, AuthError> {
        let request = ApiRequest::post(SIGN_IN_PATH, json!({ "email": email, "password": password }));
        let response = self.gateway.request_anonymous(request).await?;

        if !response.is_success() {
            return Err(rejection(&response, "Invalid credentials", AuthError::InvalidCredentials));
        }

        let auth = parse_auth_response(response)?;
        self.establish(auth, remember.then_some(self.remember_days))
    }

    /// Create an account and sign in with it.
    ///
    /// Password confirmation is the caller's job; see
    /// [`validate_sign_up`](crate::pages::auth_form::validate_sign_up).
    pub async fn sign_up(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> std::result::Result<Credential, AuthError> {
        let request = ApiRequest::post(
            SIGN_UP_PATH,
            json!({ "name": name, "email": email, "password": password }),
        );
        let response = self.gateway.request_anonymous(request).await?;

        if !response.is_success() {
            return Err(rejection(&response, "Registration failed", AuthError::ValidationFailed));
        }

        let auth = parse_auth_response(response)?;
        self.establish(auth, None)
    }

    /// Clear the stored session and notify observers. Does not navigate.
    pub fn sign_out(&self) {
        let user = self.current_user().map(|u| u.name);
        self.store.clear();
        info!(user = ?user, "Signed out");
        self.events.publish(SessionEvent::SignedOut);
    }

    #[inline]
    pub fn is_authenticated(&self) -> bool {
        self.store.is_authenticated()
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.store.load().map(|c| c.profile)
    }

    pub fn credential(&self) -> Option<Credential> {
        self.store.load()
    }

    /// Ask the API whether the stored token is still accepted.
    ///
    /// `Ok(false)` means there was no token, or the API answered 401 (the
    /// session is cleared in that case). Any other failure, including a 403
    /// or 5xx from the profile endpoint, is an error and keeps the session.
    pub async fn verify_token(&self) -> Result<bool> {
        if self.store.token().is_none() {
            return Ok(false);
        }
        match self.gateway.request(ApiRequest::get(PROFILE_PATH)).await {
            Ok(response) => response.into_success().map(|_| true),
            Err(ClientError::Unauthenticated) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Fetch the server-side profile of the signed-in user.
    pub async fn profile(&self) -> Result<UserProfile> {
        if self.store.token().is_none() {
            return Err(ClientError::NotAuthenticated);
        }
        let response = self.gateway.request(ApiRequest::get(PROFILE_PATH)).await?;
        let profile: ProfileResponse = response.json()?;
        Ok(profile.user)
    }

    /// Whether the signed-in user has an active subscription. Any failure reads as `false`.
    pub async fn has_premium_access(&self) -> bool {
        match self.profile().await {
            Ok(profile) => profile.has_active_subscription(),
            Err(e) => {
                debug!(error = %e, "Premium check failed");
                false
            }
        }
    }

    fn establish(
        &self,
        auth: AuthResponse,
        remember_days: Option<u32>,
    ) -> std::result::Result<Credential, AuthError> {
        let credential = self.store.save(&auth.user, &auth.token, remember_days)?;
        info!(user = %credential.profile.name, remembered = remember_days.is_some(), "Signed in");
        self.events.publish(SessionEvent::SignedIn {
            user: credential.profile.name.clone(),
        });
        Ok(credential)
    }
}

/// Map a non-2xx auth response: 5xx is a server error, anything else uses `client_error`.
fn rejection(
    response: &ApiResponse,
    fallback: &str,
    client_error: fn(String) -> AuthError,
) -> AuthError {
    let message = response
        .error_message()
        .unwrap_or_else(|| fallback.to_string());
    if response.status.is_server_error() {
        AuthError::Server(message)
    } else {
        client_error(message)
    }
}

fn parse_auth_response(response: ApiResponse) -> std::result::Result<AuthResponse, AuthError> {
    serde_json::from_value(response.body)
        .map_err(|e| AuthError::Server(format!("unexpected auth response: {e}")))
}
