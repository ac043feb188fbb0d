//! Content access resolution.
//!
//! The API overloads HTTP status codes as its authorization states:
//! 200 for viewable, 401 for "sign in first", 403 for "subscription required".
//! [`ContentAccessResolver`] turns those into an [`AccessDecision`] the UI can
//! branch on.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::content::{ContentKind, item_path};
use crate::error::ClientError;
use crate::gateway::{ApiRequest, Gateway};
use crate::ids::ContentId;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum AccessReason {
    None,
    AuthRequired,
    PremiumRequired,
    Unknown,
    NetworkError,
}

/// What the UI should show instead of (or as) the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum AccessPrompt {
    ShowContent,
    SignIn,
    Upgrade,
    Unavailable,
}

/// Per-request access outcome. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessDecision {
    pub accessible: bool,
    pub reason: AccessReason,
}

impl AccessDecision {
    pub const fn granted() -> Self {
        Self {
            accessible: true,
            reason: AccessReason::None,
        }
    }

    pub const fn denied(reason: AccessReason) -> Self {
        Self {
            accessible: false,
            reason,
        }
    }

    /// Decision for a raw HTTP status.
    pub fn from_status(status: u16) -> Self {
        match status {
            200..=299 => Self::granted(),
            401 => Self::denied(AccessReason::AuthRequired),
            403 => Self::denied(AccessReason::PremiumRequired),
            _ => Self::denied(AccessReason::Unknown),
        }
    }

    pub fn prompt(&self) -> AccessPrompt {
        match self.reason {
            _ if self.accessible => AccessPrompt::ShowContent,
            AccessReason::AuthRequired => AccessPrompt::SignIn,
            AccessReason::PremiumRequired => AccessPrompt::Upgrade,
            _ => AccessPrompt::Unavailable,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ContentAccessResolver {
    gateway: Gateway,
}

impl ContentAccessResolver {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// Probe `/api/content/{kind}/{id}` and classify the outcome. Never fails.
    ///
    /// A 401 also clears a stale session, as it does for every gateway call.
    pub async fn check_access(&self, content_id: &ContentId, kind: ContentKind) -> AccessDecision {
        let request = ApiRequest::get(item_path(kind, content_id));
        let decision = match self.gateway.request(request).await {
            Ok(response) => AccessDecision::from_status(response.status.as_u16()),
            Err(ClientError::Unauthenticated) => AccessDecision::denied(AccessReason::AuthRequired),
            // Non-JSON bodies still carry a meaningful status.
            Err(ClientError::Server { status, .. }) => AccessDecision::from_status(status),
            Err(ClientError::Network(e)) => {
                debug!(error = %e, "Access check failed in transport");
                AccessDecision::denied(AccessReason::NetworkError)
            }
            Err(e) => {
                debug!(error = %e, "Access check failed");
                AccessDecision::denied(AccessReason::Unknown)
            }
        };
        debug!(%content_id, %kind, reason = %decision.reason, "Resolved content access");
        decision
    }
}
