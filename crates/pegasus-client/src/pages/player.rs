//! Player page.

use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use super::card::{ContentCard, audience_text};
use crate::content::{ContentItem, ContentKind, ContentService};
use crate::context::SessionContext;
use crate::error::ClientError;
use crate::ids::ContentId;

/// Related items shown under the player.
pub const RELATED_LIMIT: usize = 4;

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("Missing type or id parameter")]
    MissingParams,

    #[error("Content not found")]
    NotFound,

    #[error(transparent)]
    Client(#[from] ClientError),
}

impl PlayerError {
    /// Status line shown in place of the player, whatever the failure.
    pub const STATUS_TEXT: &'static str = "Content not available";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
pub enum PlaybackStatus {
    #[strum(to_string = "Live")]
    Live,
    #[strum(to_string = "On Demand")]
    OnDemand,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum PlayerSource {
    /// Provider embed markup, passed through as-is.
    Embed(String),
    /// Path of a local sample video.
    Video(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub item: ContentItem,
    pub kind: ContentKind,
    /// Document title, `"<title> | PEGASUS"`.
    pub page_title: String,
    pub status: PlaybackStatus,
    pub audience: String,
    pub source: PlayerSource,
    pub related: Vec<ContentCard>,
}

#[derive(Clone, Debug)]
pub struct PlayerPage {
    content: ContentService,
}

impl PlayerPage {
    pub fn new(ctx: &SessionContext) -> Self {
        Self {
            content: ctx.content(),
        }
    }

    /// Load the player for `?type=<kind>&id=<id>`.
    pub async fn load_from_query(&self, query: &str) -> Result<PlayerView, PlayerError> {
        let (kind, id) = parse_query(query)?;
        self.load(kind, &id).await
    }

    /// Load the player for one item, looked up in the full catalog.
    pub async fn load(&self, kind: ContentKind, id: &ContentId) -> Result<PlayerView, PlayerError> {
        if kind.is_all() {
            return Err(PlayerError::MissingParams);
        }
        let catalog = self.content.fetch_all().await.inspect_err(|e| {
            warn!(%kind, %id, error = %e, "Failed to load player content");
        })?;
        let item = catalog.find(kind, id).ok_or(PlayerError::NotFound)?;

        let related = catalog
            .items(kind)
            .into_iter()
            .filter(|other| &other.id != id)
            .take(RELATED_LIMIT)
            .map(|other| ContentCard::from_item(other, kind))
            .collect();

        Ok(build_view(item.clone(), kind, related))
    }
}

fn build_view(item: ContentItem, kind: ContentKind, related: Vec<ContentCard>) -> PlayerView {
    let live = kind == ContentKind::Live;
    let source = match item.embed_code.as_deref().filter(|code| !code.trim().is_empty()) {
        Some(code) => PlayerSource::Embed(code.to_string()),
        None => PlayerSource::Video(format!("videos/sample-{kind}.mp4")),
    };
    PlayerView {
        page_title: format!("{} | PEGASUS", item.title),
        status: if live {
            PlaybackStatus::Live
        } else {
            PlaybackStatus::OnDemand
        },
        audience: audience_text(&item, live),
        source,
        related,
        kind,
        item,
    }
}

fn parse_query(query: &str) -> Result<(ContentKind, ContentId), PlayerError> {
    let query = query.trim_start_matches('?');
    let mut kind = None;
    let mut id = None;
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "type" if !value.is_empty() => kind = Some(value.into_owned()),
            "id" if !value.is_empty() => id = Some(ContentId::new(value.into_owned())),
            _ => {}
        }
    }
    let (Some(kind), Some(id)) = (kind, id) else {
        return Err(PlayerError::MissingParams);
    };
    let kind = kind.parse().map_err(|_| PlayerError::NotFound)?;
    Ok((kind, id))
}
