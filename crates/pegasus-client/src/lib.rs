//! Session and content-access client for the Pegasus sports-streaming API.
//!
//! Every consumer goes through one [`SessionContext`], which owns the
//! credential store, the session event bus and the authenticated gateway
//! that all API calls share.
//!
//! ```rust,ignore
//! use pegasus_client::{ClientConfig, SessionContext, ContentKind};
//!
//! let ctx = SessionContext::new(ClientConfig::default(), storage)?;
//! ctx.session().sign_in("a@b.com", "secret", true).await?;
//! let decision = ctx.access().check_access(&"42".into(), ContentKind::Live).await;
//! if !decision.accessible {
//!     println!("{}", decision.prompt());
//! }
//! ```

pub mod access;
pub mod comments;
pub mod config;
pub mod content;
pub mod context;
pub mod credentials;
pub mod error;
pub mod favorites;
pub mod gateway;
mod ids;
pub mod pages;
pub mod session;
mod utils;

pub use access::{AccessDecision, AccessPrompt, AccessReason, ContentAccessResolver};
pub use comments::{Comment, CommentsClient};
pub use config::ClientConfig;
pub use content::{ContentCatalog, ContentItem, ContentKind, ContentQuery, ContentService};
pub use context::SessionContext;
pub use credentials::{
    Credential, CredentialStore, FileStorage, KeyValueStorage, MemoryStorage, UserProfile,
};
pub use error::{AuthError, AuthErrorKind, ClientError, Envelope, ErrorKind, Result};
pub use favorites::{FavoriteRecord, FavoriteStatus, FavoritesClient};
pub use gateway::{ApiRequest, ApiResponse, Gateway};
pub use ids::{CommentId, ContentId, FavoriteId};
pub use session::{SessionEvent, SessionEventBus, SessionManager};
