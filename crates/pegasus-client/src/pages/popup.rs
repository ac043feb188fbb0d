//! Content detail popup.

use serde::Serialize;
use tracing::{debug, warn};

use super::card::{ContentCard, player_link};
use super::sign_in_link;
use crate::content::{ContentKind, ContentService};
use crate::context::SessionContext;
use crate::credentials::CredentialStore;
use crate::favorites::FavoritesClient;
use crate::ids::ContentId;

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load content details";
pub const TOGGLE_FAILED_MESSAGE: &str = "An error occurred. Please try again.";
pub const SIGN_IN_PROMPT: &str = "Please sign in to add favorites";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum FavoriteButton {
    Favorited,
    NotFavorited,
}

impl FavoriteButton {
    pub fn from_flag(favorited: bool) -> Self {
        if favorited {
            Self::Favorited
        } else {
            Self::NotFavorited
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Favorited)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "audience", rename_all = "lowercase")]
pub enum PopupActions {
    /// Signed-in users get a favorite toggle and a play link.
    Member {
        favorite: FavoriteButton,
        play_link: String,
    },
    Guest { sign_in_link: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum PopupView {
    Ready {
        card: ContentCard,
        actions: PopupActions,
    },
    Failed {
        message: String,
    },
}

/// Result of pressing the favorite button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum ToggleOutcome {
    Toggled { button: FavoriteButton },
    /// No session: show [`SIGN_IN_PROMPT`] and offer the link.
    SignInRequired { sign_in_link: String },
    /// The toggle failed; the button goes back to its previous state.
    Reverted {
        button: FavoriteButton,
        message: String,
    },
}

#[derive(Clone, Debug)]
pub struct ContentPopup {
    content: ContentService,
    favorites: FavoritesClient,
    store: CredentialStore,
    return_to: String,
}

impl ContentPopup {
    /// `return_to` is where a sign-in should send the user back to.
    pub fn new(ctx: &SessionContext, return_to: impl Into<String>) -> Self {
        Self {
            content: ctx.content(),
            favorites: ctx.favorites(),
            store: ctx.store().clone(),
            return_to: return_to.into(),
        }
    }

    pub async fn show(&self, id: &ContentId, kind: ContentKind) -> PopupView {
        let item = match self.content.fetch_item(kind, id).await {
            Ok(item) => item,
            Err(e) => {
                warn!(%kind, %id, error = %e, "Failed to load popup content");
                return PopupView::Failed {
                    message: LOAD_FAILED_MESSAGE.to_string(),
                };
            }
        };
        let card = ContentCard::from_item(&item, kind);

        let actions = if self.store.is_authenticated() {
            let favorited = match self.favorites.check(id, card.kind).await {
                Ok(status) => status.is_favorited,
                Err(e) => {
                    debug!(error = %e, "Favorite status unavailable");
                    false
                }
            };
            PopupActions::Member {
                favorite: FavoriteButton::from_flag(favorited),
                play_link: player_link(card.kind, id),
            }
        } else {
            PopupActions::Guest {
                sign_in_link: sign_in_link(&self.return_to),
            }
        };

        PopupView::Ready { card, actions }
    }

    /// Toggle the favorite state. `current` is what the button shows now.
    pub async fn toggle_favorite(
        &self,
        id: &ContentId,
        kind: ContentKind,
        current: FavoriteButton,
    ) -> ToggleOutcome {
        if !self.store.is_authenticated() {
            return ToggleOutcome::SignInRequired {
                sign_in_link: sign_in_link(&self.return_to),
            };
        }
        match self.favorites.toggle(id, kind).await {
            Ok(status) => ToggleOutcome::Toggled {
                button: FavoriteButton::from_flag(status.is_favorited),
            },
            Err(e) => {
                warn!(%kind, %id, error = %e, "Failed to toggle favorite");
                ToggleOutcome::Reverted {
                    button: current,
                    message: TOGGLE_FAILED_MESSAGE.to_string(),
                }
            }
        }
    }
}
