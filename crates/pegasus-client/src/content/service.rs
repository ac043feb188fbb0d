//! Content listing and lookup.

use serde_json::Value;
use tracing::debug;

use super::models::{ContentCatalog, ContentItem, ContentKind};
use crate::error::{ClientError, Result};
use crate::gateway::{ApiRequest, Gateway};
use crate::ids::ContentId;

pub const DEFAULT_LIMIT: usize = 8;

/// Filter for `GET /api/content`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentQuery {
    pub kind: ContentKind,
    /// `None` means every category.
    pub category: Option<String>,
    pub limit: usize,
}

impl Default for ContentQuery {
    fn default() -> Self {
        Self {
            kind: ContentKind::All,
            category: None,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl ContentQuery {
    pub fn new(kind: ContentKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Restrict to a category. `"all"` (any case) clears the filter.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        let category = category.into();
        self.category = (!category.eq_ignore_ascii_case("all") && !category.is_empty())
            .then_some(category);
        self
    }

    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub(crate) fn to_request(&self) -> ApiRequest {
        let mut request = ApiRequest::get("api/content");
        if !self.kind.is_all() {
            request = request.with_query("type", self.kind);
        }
        if let Some(category) = &self.category {
            request = request.with_query("category", category);
        }
        request.with_query("limit", self.limit)
    }
}

/// Read-only access to the content endpoints.
#[derive(Clone, Debug)]
pub struct ContentService {
    gateway: Gateway,
}

impl ContentService {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// Filtered listing.
    pub async fn fetch(&self, query: &ContentQuery) -> Result<ContentCatalog> {
        let body = self.gateway.request(query.to_request()).await?.into_success()?;
        let catalog = ContentCatalog::from_json(&body);
        debug!(kind = %query.kind, items = catalog.len(), "Fetched content listing");
        Ok(catalog)
    }

    /// Unfiltered listing.
    pub async fn fetch_all(&self) -> Result<ContentCatalog> {
        let body = self
            .gateway
            .request(ApiRequest::get("api/content"))
            .await?
            .into_success()?;
        Ok(ContentCatalog::from_json(&body))
    }

    /// Single item from `/api/content/{kind}/{id}`.
    ///
    /// 401 and 403 surface as [`ClientError::Unauthenticated`] and
    /// [`ClientError::Forbidden`].
    pub async fn fetch_item(&self, kind: ContentKind, id: &ContentId) -> Result<ContentItem> {
        if kind.is_all() {
            return Err(ClientError::validation("a concrete content type is required"));
        }
        let body = self
            .gateway
            .request(ApiRequest::get(item_path(kind, id)))
            .await?
            .into_success()?;

        // Some deployments wrap the item.
        let item = match body.get("id") {
            Some(_) => &body,
            None => ["content", "item", "data"]
                .iter()
                .find_map(|key| body.get(key).filter(|v| v.is_object()))
                .unwrap_or(&Value::Null),
        };
        ContentItem::from_json(item)
            .ok_or_else(|| ClientError::unexpected(format!("content {kind}/{id} has no id")))
    }
}

pub(crate) fn item_path(kind: ContentKind, id: &ContentId) -> String {
    format!("api/content/{}/{}", kind, id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query_of(query: &ContentQuery) -> Vec<(String, String)> {
        query.to_request().query_pairs().to_vec()
    }

    #[test]
    fn all_kinds_omit_type_and_category() {
        let pairs = query_of(&ContentQuery::new(ContentKind::All).with_category("all"));
        assert_eq!(pairs, vec![("limit".to_string(), "8".to_string())]);
    }

    #[test]
    fn filtered_query_lists_every_param() {
        let pairs = query_of(
            &ContentQuery::new(ContentKind::Highlight)
                .with_category("football")
                .with_limit(4),
        );
        assert_eq!(
            pairs,
            vec![
                ("type".to_string(), "highlight".to_string()),
                ("category".to_string(), "football".to_string()),
                ("limit".to_string(), "4".to_string()),
            ]
        );
    }

    #[test]
    fn item_path_uses_singular_kind() {
        assert_eq!(
            item_path(ContentKind::Channel, &ContentId::from(12_i64)),
            "api/content/channel/12"
        );
    }
}
