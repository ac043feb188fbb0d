//! Core credential types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// User profile as returned by the auth endpoints.
///
/// Only `name` is required; unknown fields are kept so the stored blob
/// round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: None,
            subscription_status: None,
            extra: Map::new(),
        }
    }

    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    #[must_use]
    pub fn with_subscription_status(mut self, status: impl Into<String>) -> Self {
        self.subscription_status = Some(status.into());
        self
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some("admin")
    }

    #[inline]
    pub fn has_active_subscription(&self) -> bool {
        self.subscription_status.as_deref() == Some("active")
    }

    /// Upper-cased first letter of the name, for avatars.
    pub fn initial(&self) -> Option<char> {
        self.name.chars().next().map(|c| c.to_ascii_uppercase())
    }
}

/// A stored session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Credential {
    pub profile: UserProfile,
    pub token: String,
    /// Informational only. The API is the sole judge of token validity.
    pub expires_at: Option<DateTime<Utc>>,
}

impl Credential {
    /// Whether the recorded expiry has passed.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| at <= Utc::now())
    }
}
