//! Content cards shown in listings.

use serde::Serialize;

use super::{DEFAULT_CATEGORY, PLACEHOLDER_THUMBNAIL};
use crate::content::{ContentItem, ContentKind};
use crate::ids::ContentId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentCard {
    pub id: ContentId,
    pub kind: ContentKind,
    pub title: String,
    pub category: String,
    pub thumbnail: String,
    pub live: bool,
    pub premium: bool,
    /// `"N watching"` for live items, `"N views"` otherwise.
    pub audience: String,
    pub link: String,
}

impl ContentCard {
    /// Build a card for an item listed under `kind`.
    ///
    /// With [`ContentKind::All`] the item's own kind is used for the link.
    /// The `LIVE` badge is shown when the item is flagged live or when it is
    /// listed under [`ContentKind::Live`], since live rows may omit the flag.
    pub fn from_item(item: &ContentItem, kind: ContentKind) -> Self {
        let kind = if kind.is_all() { item.kind() } else { kind };
        let live = item.is_live || kind == ContentKind::Live;
        Self {
            id: item.id.clone(),
            kind,
            title: item.title.clone(),
            category: item
                .category
                .clone()
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            thumbnail: item
                .thumbnail
                .clone()
                .unwrap_or_else(|| PLACEHOLDER_THUMBNAIL.to_string()),
            live,
            premium: item.requires_premium,
            audience: audience_text(item, live),
            link: player_link(kind, &item.id),
        }
    }

    pub fn badges(&self) -> Vec<&'static str> {
        let mut badges = Vec::with_capacity(2);
        if self.live {
            badges.push("LIVE");
        }
        if self.premium {
            badges.push("PREMIUM");
        }
        badges
    }
}

pub(crate) fn audience_text(item: &ContentItem, live: bool) -> String {
    if live {
        format!("{} watching", item.viewers_count)
    } else {
        format!("{} views", item.views_count)
    }
}

/// Player page URL for an item.
pub fn player_link(kind: ContentKind, id: &ContentId) -> String {
    format!("player.html?type={kind}&id={id}")
}
