use crate::{
    cli::{CommentsAction, FavoritesAction},
    config::AppConfig,
    error::{AppError, Result},
    output::OutputManager,
};
use pegasus_client::pages::auth_form::{submit_sign_up, validate_sign_in};
use pegasus_client::pages::{
    ContentPopup, FavoriteButton, HomePage, LoadState, NavView, PlayerPage, ToggleOutcome,
};
use pegasus_client::{
    ContentId, ContentKind, FavoriteId, FileStorage, KeyValueStorage, MemoryStorage,
    SessionContext,
};
use serde_json::json;
use std::io::{self, BufRead};
use std::sync::Arc;
use tracing::{debug, warn};

pub struct CommandExecutor {
    ctx: SessionContext,
    output: OutputManager,
}

impl CommandExecutor {
    pub fn new(config: &AppConfig, output: OutputManager) -> Result<Self> {
        let storage: Arc<dyn KeyValueStorage> = match config.storage_path() {
            Some(path) => Arc::new(FileStorage::open(path)),
            None => {
                warn!("No data directory available, the session will not be kept");
                Arc::new(MemoryStorage::new())
            }
        };
        let ctx = SessionContext::new(config.client_config(), storage)?;
        debug!(api_base = %ctx.config().api_base, "Command executor ready");
        Ok(Self { ctx, output })
    }

    pub async fn sign_in(&self, email: &str, password: Option<String>, remember: bool) -> Result<()> {
        let password = match password {
            Some(password) => password,
            None => read_password()?,
        };
        validate_sign_in(email, &password)?;

        let credential = self.ctx.session().sign_in(email, &password, remember).await?;
        self.output
            .emit(&credential.profile, |o| o.format_credential(&credential))
    }

    pub async fn sign_up(
        &self,
        name: &str,
        email: &str,
        password: &str,
        confirm: Option<&str>,
    ) -> Result<()> {
        let credential = submit_sign_up(
            &self.ctx.session(),
            name,
            email,
            password,
            confirm.unwrap_or(password),
        )
        .await?;
        self.output
            .emit(&credential.profile, |o| o.format_credential(&credential))
    }

    pub fn sign_out(&self) -> Result<()> {
        let session = self.ctx.session();
        let was_signed_in = session.is_authenticated();
        session.sign_out();
        self.output.emit(&json!({ "signed_out": was_signed_in }), |o| {
            if was_signed_in {
                o.success("Signed out")
            } else {
                "Not signed in".to_string()
            }
        })
    }

    pub async fn whoami(&self, verify: bool) -> Result<()> {
        let session = self.ctx.session();
        let Some(credential) = session.credential() else {
            return Err(AppError::Client(pegasus_client::ClientError::NotAuthenticated));
        };

        if verify {
            let profile = session.profile().await?;
            let premium = profile.has_active_subscription();
            let nav = NavView::for_user(Some(&profile));
            return self.output.emit(
                &json!({ "user": profile, "premium": premium, "expires_at": credential.expires_at }),
                |o| format!("{}{}", o.format_profile(&profile), o.format_nav(&nav)),
            );
        }

        let nav = NavView::for_user(Some(&credential.profile));
        self.output.emit(
            &json!({ "user": credential.profile, "expires_at": credential.expires_at }),
            |o| format!("{}{}", o.format_credential(&credential), o.format_nav(&nav)),
        )
    }

    pub async fn content(&self, kind: ContentKind, category: &str, limit: usize) -> Result<()> {
        let state = HomePage::new(&self.ctx)
            .load_content(kind, category, limit)
            .await;
        if let LoadState::Failed(reason) = &state {
            // The row placeholder hides the cause; JSON callers want a failure.
            if self.output.format().is_json() {
                return Err(AppError::Failed(reason.clone()));
            }
        }
        self.output.emit(&state, |o| o.format_cards(&state))
    }

    pub async fn play(&self, kind: ContentKind, id: &str) -> Result<()> {
        let view = PlayerPage::new(&self.ctx)
            .load(kind, &ContentId::from(id))
            .await
            .map_err(|e| match e {
                pegasus_client::pages::PlayerError::Client(inner) => AppError::Client(inner),
                other => AppError::NotFound(other.to_string()),
            })?;
        self.output.emit(&view, |o| o.format_player(&view))
    }

    pub async fn popup(&self, kind: ContentKind, id: &str, return_to: &str) -> Result<()> {
        let view = ContentPopup::new(&self.ctx, return_to)
            .show(&ContentId::from(id), kind)
            .await;
        self.output.emit(&view, |o| o.format_popup(&view))
    }

    pub async fn access(&self, kind: ContentKind, id: &str) -> Result<()> {
        let decision = self
            .ctx
            .access()
            .check_access(&ContentId::from(id), kind)
            .await;
        self.output.emit(&decision, |o| o.format_access(&decision))
    }

    pub async fn favorites(&self, action: FavoritesAction) -> Result<()> {
        let favorites = self.ctx.favorites();
        match action {
            FavoritesAction::Add { kind, id } => {
                let favorite_id = favorites.add(&ContentId::from(id), kind).await?;
                self.output.emit(&json!({ "favorite_id": favorite_id }), |o| {
                    o.success(&format!("Added to favorites (id {favorite_id})"))
                })
            }
            FavoritesAction::Remove { favorite_id } => {
                favorites.remove(&FavoriteId::from(favorite_id)).await?;
                self.output
                    .emit(&json!({ "removed": true }), |o| o.success("Removed from favorites"))
            }
            FavoritesAction::Check { kind, id } => {
                let status = favorites.check(&ContentId::from(id), kind).await?;
                self.output
                    .emit(&status, |o| o.format_favorite_status(&status))
            }
            FavoritesAction::List => {
                let records = favorites.list().await?;
                self.output.emit(&records, |o| o.format_favorites(&records))
            }
            FavoritesAction::Toggle { kind, id } => {
                let id = ContentId::from(id);
                let popup = ContentPopup::new(&self.ctx, "index.html");
                let current = match favorites.check(&id, kind).await {
                    Ok(status) => FavoriteButton::from_flag(status.is_favorited),
                    Err(_) => FavoriteButton::NotFavorited,
                };
                let outcome = popup.toggle_favorite(&id, kind, current).await;
                if let ToggleOutcome::Reverted { message, .. } = &outcome
                    && self.output.format().is_json()
                {
                    return Err(AppError::Failed(message.clone()));
                }
                self.output.emit(&outcome, |o| o.format_toggle(&outcome))
            }
        }
    }

    pub async fn comments(&self, action: CommentsAction) -> Result<()> {
        let comments = self.ctx.comments();
        match action {
            CommentsAction::List { kind, id } => {
                let list = comments.list(&ContentId::from(id), kind).await?;
                self.output.emit(&list, |o| o.format_comments(&list))
            }
            CommentsAction::Post { kind, id, text } => {
                let comment = comments.post(&ContentId::from(id), kind, &text).await?;
                self.output.emit(&comment, |o| o.format_comment(&comment))
            }
        }
    }
}

fn read_password() -> Result<String> {
    eprint!("Password: ");
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        return Err(AppError::InvalidInput("password is required".to_string()));
    }
    Ok(password)
}
