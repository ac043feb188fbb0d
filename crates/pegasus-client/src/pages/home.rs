//! Homepage content rows.

use serde::Serialize;
use tracing::warn;

use super::card::ContentCard;
use crate::content::{ContentKind, ContentQuery, ContentService};
use crate::context::SessionContext;

pub const EMPTY_MESSAGE: &str = "No content available";
pub const FAILED_MESSAGE: &str = "Failed to load content. Please try again later.";

/// Outcome of loading one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "lowercase")]
pub enum LoadState {
    Loaded(Vec<ContentCard>),
    Empty,
    /// Carries the underlying error for logs; show [`FAILED_MESSAGE`] to users.
    Failed(String),
}

impl LoadState {
    pub fn cards(&self) -> &[ContentCard] {
        match self {
            Self::Loaded(cards) => cards,
            _ => &[],
        }
    }

    /// User-facing placeholder text, if the row has no cards.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Self::Loaded(_) => None,
            Self::Empty => Some(EMPTY_MESSAGE),
            Self::Failed(_) => Some(FAILED_MESSAGE),
        }
    }
}

#[derive(Clone, Debug)]
pub struct HomePage {
    content: ContentService,
}

impl HomePage {
    pub fn new(ctx: &SessionContext) -> Self {
        Self {
            content: ctx.content(),
        }
    }

    /// Load one row of cards. `filter` is a category name or `"all"`.
    pub async fn load_content(&self, kind: ContentKind, filter: &str, limit: usize) -> LoadState {
        let query = ContentQuery::new(kind).with_category(filter).with_limit(limit);
        match self.content.fetch(&query).await {
            Ok(catalog) => {
                let cards: Vec<_> = catalog
                    .items(kind)
                    .into_iter()
                    .map(|item| ContentCard::from_item(item, kind))
                    .collect();
                if cards.is_empty() {
                    LoadState::Empty
                } else {
                    LoadState::Loaded(cards)
                }
            }
            Err(e) => {
                warn!(%kind, error = %e, "Failed to load content row");
                LoadState::Failed(e.to_string())
            }
        }
    }
}
