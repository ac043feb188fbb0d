//! Header navigation and page guards.

use serde::Serialize;

use super::{HOME_PAGE, SIGN_IN_PAGE};
use crate::credentials::UserProfile;
use crate::session::SessionManager;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "href", rename_all = "kebab-case")]
pub enum NavTarget {
    Page(&'static str),
    SignOut,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub label: &'static str,
    pub target: NavTarget,
}

impl NavItem {
    const fn page(label: &'static str, href: &'static str) -> Self {
        Self {
            label,
            target: NavTarget::Page(href),
        }
    }
}

/// The header's auth area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavView {
    pub user_name: Option<String>,
    /// Avatar letter.
    pub initial: Option<char>,
    pub items: Vec<NavItem>,
}

impl NavView {
    pub fn for_user(user: Option<&UserProfile>) -> Self {
        let Some(user) = user else {
            return Self {
                user_name: None,
                initial: None,
                items: vec![
                    NavItem::page("Sign In", SIGN_IN_PAGE),
                    NavItem::page("Subscribe", "signup.html"),
                ],
            };
        };

        let mut items = vec![
            NavItem::page("Profile", "profile.html"),
            NavItem::page("Favorites", "favorites.html"),
        ];
        if user.is_admin() {
            items.push(NavItem::page("Admin", "admin.html"));
        }
        items.push(NavItem {
            label: "Logout",
            target: NavTarget::SignOut,
        });

        Self {
            user_name: Some(user.name.clone()),
            initial: user.initial(),
            items,
        }
    }

    pub fn for_session(session: &SessionManager) -> Self {
        Self::for_user(session.current_user().as_ref())
    }
}

/// Where a guarded page should send the visitor instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Redirect(pub &'static str);

/// Members-only pages.
pub fn require_auth(session: &SessionManager) -> Result<UserProfile, Redirect> {
    session.current_user().ok_or(Redirect(SIGN_IN_PAGE))
}

/// Admin pages. Signed-in non-admins go back home.
pub fn require_admin(session: &SessionManager) -> Result<UserProfile, Redirect> {
    let user = require_auth(session)?;
    if user.is_admin() {
        Ok(user)
    } else {
        Err(Redirect(HOME_PAGE))
    }
}
