//! Login wall in front of members-only sections.

use serde::Serialize;
use tracing::{info, warn};

use crate::context::SessionContext;
use crate::credentials::UserProfile;
use crate::session::SessionManager;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "user", rename_all = "lowercase")]
pub enum WallState {
    /// Protected content may be shown.
    Open(UserProfile),
    /// Show the login wall instead.
    Locked,
}

impl WallState {
    #[inline]
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open(_))
    }
}

#[derive(Clone, Debug)]
pub struct AuthWall {
    session: SessionManager,
}

impl AuthWall {
    pub fn new(ctx: &SessionContext) -> Self {
        Self {
            session: ctx.session(),
        }
    }

    /// Decide whether the wall stays up.
    ///
    /// A stored session is verified against the API first. Only a 401
    /// clears it. Any other failure (unreachable API, 403, 5xx) keeps the
    /// wall up but leaves the session for the next attempt.
    pub async fn init(&self) -> WallState {
        let Some(user) = self.session.current_user() else {
            return WallState::Locked;
        };

        match self.session.verify_token().await {
            Ok(true) => WallState::Open(user),
            Ok(false) => {
                if self.session.is_authenticated() {
                    self.session.sign_out();
                }
                info!(user = %user.name, "Stored session rejected, locking");
                WallState::Locked
            }
            Err(e) => {
                warn!(error = %e, "Could not verify session");
                WallState::Locked
            }
        }
    }
}
