//! Comment threads on content items.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::info;

use crate::content::ContentKind;
use crate::error::{ClientError, Result};
use crate::gateway::{ApiRequest, Gateway};
use crate::ids::{CommentId, ContentId};
use crate::utils::{first_str, first_value, list_items};

const COMMENTS_PATH: &str = "api/comments";
const MAX_COMMENT_LEN: usize = 2000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub id: CommentId,
    pub content_id: Option<ContentId>,
    pub content_type: Option<String>,
    pub user_name: Option<String>,
    pub text: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl Comment {
    pub fn from_json(value: &Value) -> Option<Self> {
        let id = first_value(value, &["id"]).and_then(CommentId::from_json)?;
        Some(Self {
            id,
            content_id: first_value(value, &["content_id", "contentId"])
                .and_then(ContentId::from_json),
            content_type: first_str(value, &["content_type", "contentType"]).map(str::to_string),
            user_name: first_str(value, &["user_name", "userName", "name"])
                .or_else(|| value.get("user").and_then(|u| first_str(u, &["name"])))
                .map(str::to_string),
            text: first_str(value, &["text", "content", "body"])
                .unwrap_or_default()
                .to_string(),
            created_at: first_str(value, &["created_at", "createdAt"]).and_then(parse_timestamp),
        })
    }

    /// Author name for display.
    pub fn author(&self) -> &str {
        self.user_name.as_deref().unwrap_or("Anonymous")
    }
}

/// Accepts RFC 3339 and the `YYYY-MM-DD HH:MM:SS` form SQLite emits.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

#[derive(Clone, Debug)]
pub struct CommentsClient {
    gateway: Gateway,
}

impl CommentsClient {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// Comments on an item. Public; a stored token is still sent.
    pub async fn list(&self, content_id: &ContentId, kind: ContentKind) -> Result<Vec<Comment>> {
        let request = ApiRequest::get(COMMENTS_PATH)
            .with_query("contentId", content_id)
            .with_query("contentType", kind);
        let body = self.gateway.request(request).await?.into_success()?;
        Ok(list_items(&body, &["comments", "data"])
            .map(|items| items.iter().filter_map(Comment::from_json).collect())
            .unwrap_or_default())
    }

    /// Post a comment as the signed-in user.
    pub async fn post(
        &self,
        content_id: &ContentId,
        kind: ContentKind,
        text: &str,
    ) -> Result<Comment> {
        if !self.gateway.store().is_authenticated() {
            return Err(ClientError::NotAuthenticated);
        }
        let text = validate_text(text)?;

        let request = ApiRequest::post(
            COMMENTS_PATH,
            json!({ "contentId": content_id, "contentType": kind, "text": text }),
        );
        let body = self.gateway.request(request).await?.into_success()?;
        let comment = body
            .get("comment")
            .and_then(Comment::from_json)
            .or_else(|| Comment::from_json(&body))
            .ok_or_else(|| ClientError::unexpected("comment created without an id"))?;

        info!(%content_id, %kind, comment_id = %comment.id, "Posted comment");
        Ok(comment)
    }
}

fn validate_text(text: &str) -> Result<&str> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ClientError::validation("comment text is empty"));
    }
    if text.chars().count() > MAX_COMMENT_LEN {
        return Err(ClientError::validation(format!(
            "comment is longer than {MAX_COMMENT_LEN} characters"
        )));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_user_and_sqlite_timestamp() {
        let comment = Comment::from_json(&json!({
            "id": 7,
            "content_id": 3,
            "content_type": "vod",
            "user": {"name": "Dana"},
            "text": "great match",
            "created_at": "2024-05-01 18:30:00"
        }))
        .unwrap();
        assert_eq!(comment.id.as_str(), "7");
        assert_eq!(comment.author(), "Dana");
        assert_eq!(
            comment.created_at.map(|t| t.to_rfc3339()),
            Some("2024-05-01T18:30:00+00:00".to_string())
        );
    }

    #[test]
    fn missing_author_is_anonymous() {
        let comment = Comment::from_json(&json!({"id": "c1", "text": "hi"})).unwrap();
        assert_eq!(comment.author(), "Anonymous");
        assert!(comment.created_at.is_none());
    }

    #[test]
    fn text_is_trimmed_and_bounded() {
        assert_eq!(validate_text("  hello ").unwrap(), "hello");
        assert!(matches!(validate_text("   "), Err(ClientError::Validation(_))));
        assert!(validate_text(&"x".repeat(MAX_COMMENT_LEN + 1)).is_err());
    }
}
