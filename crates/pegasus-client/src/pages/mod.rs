//! Page view models.
//!
//! Each page controller takes a [`SessionContext`](crate::SessionContext),
//! talks to the API and returns plain data for a rendering layer. None of
//! them render anything or navigate on their own.

pub mod auth_form;
pub mod auth_wall;
pub mod card;
pub mod home;
pub mod nav;
pub mod player;
pub mod popup;

pub use auth_wall::{AuthWall, WallState};
pub use card::ContentCard;
pub use home::{HomePage, LoadState};
pub use nav::{NavItem, NavTarget, NavView, Redirect};
pub use player::{PlaybackStatus, PlayerError, PlayerPage, PlayerSource, PlayerView};
pub use popup::{ContentPopup, FavoriteButton, PopupActions, PopupView, ToggleOutcome};

/// Shown when an item has no thumbnail.
pub const PLACEHOLDER_THUMBNAIL: &str = "https://via.placeholder.com/400x225";

pub const DEFAULT_CATEGORY: &str = "Sports";

pub const SIGN_IN_PAGE: &str = "signin.html";
pub const HOME_PAGE: &str = "index.html";

/// `signin.html?redirect=<return_to>`, with `return_to` percent-encoded.
pub fn sign_in_link(return_to: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(return_to.as_bytes()).collect();
    format!("{SIGN_IN_PAGE}?redirect={encoded}")
}
