//! Favorites CRUD.
//!
//! Every operation needs a stored session and fails fast with
//! [`ClientError::NotAuthenticated`] (no request sent) without one.

use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::content::ContentKind;
use crate::error::{ClientError, Result};
use crate::gateway::{ApiRequest, Gateway};
use crate::ids::{ContentId, FavoriteId};
use crate::utils::{as_flag, first_str, first_value, list_items};

const FAVORITES_PATH: &str = "api/favorites";

/// A user's favorite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FavoriteRecord {
    pub favorite_id: FavoriteId,
    pub content_id: ContentId,
    pub content_type: String,
}

impl FavoriteRecord {
    /// Parse a record, accepting snake_case and camelCase field names.
    pub fn from_json(value: &Value) -> Option<Self> {
        let favorite_id =
            first_value(value, &["id", "favoriteId", "favorite_id"]).and_then(FavoriteId::from_json)?;
        let content_id =
            first_value(value, &["content_id", "contentId"]).and_then(ContentId::from_json)?;
        let content_type = first_str(value, &["content_type", "contentType"])
            .unwrap_or_default()
            .to_string();
        Some(Self {
            favorite_id,
            content_id,
            content_type,
        })
    }

    /// Parsed content type; `None` for values outside the known kinds.
    pub fn kind(&self) -> Option<ContentKind> {
        self.content_type.parse().ok()
    }
}

/// Result of a favorite check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FavoriteStatus {
    pub is_favorited: bool,
    pub favorite_id: Option<FavoriteId>,
}

impl FavoriteStatus {
    pub fn favorited(favorite_id: FavoriteId) -> Self {
        Self {
            is_favorited: true,
            favorite_id: Some(favorite_id),
        }
    }

    pub fn not_favorited() -> Self {
        Self {
            is_favorited: false,
            favorite_id: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct FavoritesClient {
    gateway: Gateway,
}

impl FavoritesClient {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// Favorite a content item. Returns the new favorite id.
    pub async fn add(&self, content_id: &ContentId, kind: ContentKind) -> Result<FavoriteId> {
        self.require_session()?;
        let request = ApiRequest::post(
            FAVORITES_PATH,
            json!({ "contentId": content_id, "contentType": kind }),
        );
        let body = self.gateway.request(request).await?.into_success()?;

        let favorite_id = body
            .get("favorite")
            .and_then(|f| first_value(f, &["id", "favoriteId", "favorite_id"]))
            .or_else(|| first_value(&body, &["favoriteId", "favorite_id", "id"]))
            .or_else(|| body.get("data").and_then(|d| first_value(d, &["id"])))
            .and_then(FavoriteId::from_json)
            .ok_or_else(|| ClientError::unexpected("favorite created without an id"))?;

        info!(%content_id, %kind, %favorite_id, "Added favorite");
        Ok(favorite_id)
    }

    pub async fn remove(&self, favorite_id: &FavoriteId) -> Result<()> {
        self.require_session()?;
        let request = ApiRequest::delete(format!("{FAVORITES_PATH}/{favorite_id}"));
        self.gateway.request(request).await?.into_success()?;
        info!(%favorite_id, "Removed favorite");
        Ok(())
    }

    pub async fn check(&self, content_id: &ContentId, kind: ContentKind) -> Result<FavoriteStatus> {
        self.require_session()?;
        let request = ApiRequest::get(format!("{FAVORITES_PATH}/check"))
            .with_query("contentId", content_id)
            .with_query("contentType", kind);
        let body = self.gateway.request(request).await?.into_success()?;

        let is_favorited = as_flag(first_value(&body, &["isFavorited", "is_favorited", "favorited"]));
        let favorite_id = first_value(&body, &["favoriteId", "favorite_id"])
            .or_else(|| body.get("favorite").and_then(|f| f.get("id")))
            .and_then(FavoriteId::from_json);

        debug!(%content_id, %kind, is_favorited, "Checked favorite status");
        Ok(match favorite_id {
            Some(id) if is_favorited => FavoriteStatus::favorited(id),
            _ if is_favorited => FavoriteStatus {
                is_favorited: true,
                favorite_id: None,
            },
            _ => FavoriteStatus::not_favorited(),
        })
    }

    pub async fn list(&self) -> Result<Vec<FavoriteRecord>> {
        self.require_session()?;
        let body = self
            .gateway
            .request(ApiRequest::get(FAVORITES_PATH))
            .await?
            .into_success()?;
        let records = list_items(&body, &["favorites", "data"])
            .map(|items| items.iter().filter_map(FavoriteRecord::from_json).collect())
            .unwrap_or_default();
        Ok(records)
    }

    /// Check, then add or remove. The two calls are strictly sequential.
    ///
    /// Two concurrent toggles for the same item can still race.
    pub async fn toggle(&self, content_id: &ContentId, kind: ContentKind) -> Result<FavoriteStatus> {
        let status = self.check(content_id, kind).await?;
        match (status.is_favorited, status.favorite_id) {
            (true, Some(favorite_id)) => {
                self.remove(&favorite_id).await?;
                Ok(FavoriteStatus::not_favorited())
            }
            // Adding here would create a second favorite for the same item.
            (true, None) => Err(ClientError::unexpected("favorited without an id")),
            (false, _) => {
                let favorite_id = self.add(content_id, kind).await?;
                Ok(FavoriteStatus::favorited(favorite_id))
            }
        }
    }

    fn require_session(&self) -> Result<()> {
        if self.gateway.store().is_authenticated() {
            Ok(())
        } else {
            Err(ClientError::NotAuthenticated)
        }
    }
}
