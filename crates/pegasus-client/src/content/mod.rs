//! Content catalog.
//!
//! The API is inconsistent about field names (`views` / `views_count` /
//! `view_count`, `title` / `name`) and about how an item's kind is signalled.
//! [`ContentItem`] folds all of that into one shape.

mod models;
mod service;

pub use models::{ContentCatalog, ContentItem, ContentKind};
pub use service::{ContentQuery, ContentService, DEFAULT_LIMIT};
pub(crate) use service::item_path;
