//! Content item and catalog models.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ids::ContentId;
use crate::utils::{as_flag, first_count, first_str, first_value};

/// Kind of playable content, plus the `all` pseudo-kind used in listings.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum ContentKind {
    #[strum(to_string = "live")]
    Live,
    #[strum(to_string = "vod")]
    Vod,
    #[serde(alias = "highlights")]
    #[strum(to_string = "highlight", serialize = "highlights")]
    Highlight,
    #[serde(alias = "channels")]
    #[strum(to_string = "channel", serialize = "channels")]
    Channel,
    #[strum(to_string = "all")]
    All,
}

impl ContentKind {
    /// Every kind except [`ContentKind::All`].
    pub const PLAYABLE: [ContentKind; 4] = [
        ContentKind::Live,
        ContentKind::Vod,
        ContentKind::Highlight,
        ContentKind::Channel,
    ];

    /// Key of this kind's list in a `/api/content` response.
    pub fn catalog_key(&self) -> Option<&'static str> {
        match self {
            Self::Live => Some("live"),
            Self::Vod => Some("vod"),
            Self::Highlight => Some("highlights"),
            Self::Channel => Some("channels"),
            Self::All => None,
        }
    }

    #[inline]
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Normalize the kind of an item: explicit `type` field, then the
    /// `is_live` flag, then `vod`.
    pub fn infer(explicit_type: Option<&str>, is_live: bool) -> Self {
        if let Some(kind) = explicit_type
            .and_then(|t| t.parse::<ContentKind>().ok())
            .filter(|k| !k.is_all())
        {
            return kind;
        }
        if is_live { Self::Live } else { Self::Vod }
    }
}

/// A playable item, with the API's field-name variants folded together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct ContentItem {
    pub id: ContentId,
    /// `title`, falling back to `name`.
    pub title: String,
    pub category: Option<String>,
    /// `thumbnail`, falling back to `thumbnail_url`.
    pub thumbnail: Option<String>,
    pub is_live: bool,
    pub requires_premium: bool,
    /// Explicit `type` field, when the API sends one.
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    /// `viewers_count`, falling back to `viewers`.
    pub viewers_count: u64,
    /// `views_count`, falling back to `view_count`, then `views`.
    pub views_count: u64,
    pub embed_code: Option<String>,
}

impl ContentItem {
    pub fn new(id: impl Into<ContentId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            category: None,
            thumbnail: None,
            is_live: false,
            requires_premium: false,
            content_type: None,
            viewers_count: 0,
            views_count: 0,
            embed_code: None,
        }
    }

    /// Normalized kind; see [`ContentKind::infer`].
    pub fn kind(&self) -> ContentKind {
        ContentKind::infer(self.content_type.as_deref(), self.is_live)
    }

    /// Parse one item out of an API object. `None` when it has no usable id.
    pub fn from_json(value: &Value) -> Option<Self> {
        let id = first_value(value, &["id"]).and_then(ContentId::from_json)?;
        Some(Self {
            id,
            title: first_str(value, &["title", "name"])
                .unwrap_or_default()
                .to_string(),
            category: first_str(value, &["category"]).map(str::to_string),
            thumbnail: first_str(value, &["thumbnail", "thumbnail_url"]).map(str::to_string),
            is_live: as_flag(value.get("is_live")),
            requires_premium: as_flag(value.get("requires_premium")),
            content_type: first_str(value, &["type"]).map(str::to_string),
            viewers_count: first_count(value, &["viewers_count", "viewers"]).unwrap_or(0),
            views_count: first_count(value, &["views_count", "view_count", "views"]).unwrap_or(0),
            embed_code: first_str(value, &["embed_code"]).map(str::to_string),
        })
    }
}

impl TryFrom<Value> for ContentItem {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_json(&value).ok_or_else(|| "content item without a valid id".to_string())
    }
}

/// The `/api/content` response: one list per kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContentCatalog {
    pub live: Vec<ContentItem>,
    pub vod: Vec<ContentItem>,
    pub highlights: Vec<ContentItem>,
    pub channels: Vec<ContentItem>,
}

impl ContentCatalog {
    /// Parse a catalog response.
    ///
    /// Grouped objects are read per key. A bare array is grouped by each
    /// item's normalized kind. Entries without an id are skipped.
    pub fn from_json(body: &Value) -> Self {
        let mut catalog = Self::default();
        match body {
            Value::Array(items) => {
                for item in items.iter().filter_map(ContentItem::from_json) {
                    let kind = item.kind();
                    catalog.push(kind, item);
                }
            }
            Value::Object(_) => {
                for kind in ContentKind::PLAYABLE {
                    let key = kind.catalog_key().unwrap_or_default();
                    if let Some(items) = body.get(key).and_then(Value::as_array) {
                        catalog
                            .list_mut(kind)
                            .extend(items.iter().filter_map(ContentItem::from_json));
                    }
                }
            }
            _ => {}
        }
        catalog
    }

    /// Items listed under `kind`; every list for [`ContentKind::All`].
    pub fn items(&self, kind: ContentKind) -> Vec<&ContentItem> {
        match kind {
            ContentKind::Live => self.live.iter().collect(),
            ContentKind::Vod => self.vod.iter().collect(),
            ContentKind::Highlight => self.highlights.iter().collect(),
            ContentKind::Channel => self.channels.iter().collect(),
            ContentKind::All => self
                .live
                .iter()
                .chain(&self.vod)
                .chain(&self.highlights)
                .chain(&self.channels)
                .collect(),
        }
    }

    pub fn find(&self, kind: ContentKind, id: &ContentId) -> Option<&ContentItem> {
        self.items(kind).into_iter().find(|item| &item.id == id)
    }

    pub fn len(&self) -> usize {
        self.live.len() + self.vod.len() + self.highlights.len() + self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&mut self, kind: ContentKind, item: ContentItem) {
        self.list_mut(kind).push(item);
    }

    fn list_mut(&mut self, kind: ContentKind) -> &mut Vec<ContentItem> {
        match kind {
            ContentKind::Live => &mut self.live,
            ContentKind::Highlight => &mut self.highlights,
            ContentKind::Channel => &mut self.channels,
            ContentKind::Vod | ContentKind::All => &mut self.vod,
        }
    }
}
