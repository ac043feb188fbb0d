use crate::{cli::OutputFormat, error::Result};
#[cfg(feature = "colored-output")]
use colored::*;
use pegasus_client::pages::{
    ContentCard, LoadState, NavTarget, NavView, PlayerSource, PlayerView, PopupActions, PopupView,
    ToggleOutcome,
};
use pegasus_client::{
    AccessDecision, Comment, Credential, Envelope, FavoriteRecord, FavoriteStatus, UserProfile,
};
use serde::Serialize;
use std::fmt::Write as _;

pub struct OutputManager {
    colored: bool,
    format: OutputFormat,
}

enum Color {
    Green,
    Yellow,
    Red,
    Cyan,
}

impl OutputManager {
    pub fn new(colored: bool, format: OutputFormat) -> Self {
        Self { colored, format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Print `data` as a success envelope in JSON modes, or `pretty` otherwise.
    pub fn emit<T: Serialize>(&self, data: &T, pretty: impl FnOnce(&Self) -> String) -> Result<()> {
        let text = match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&Envelope::ok(data))?,
            OutputFormat::JsonCompact => serde_json::to_string(&Envelope::ok(data))?,
            OutputFormat::Pretty => pretty(self),
        };
        println!("{}", text.trim_end());
        Ok(())
    }

    pub fn format_credential(&self, credential: &Credential) -> String {
        let mut out = self.format_profile(&credential.profile);
        match credential.expires_at {
            Some(at) if credential.is_expired() => {
                let _ = writeln!(
                    out,
                    "  {}: {}",
                    self.colorize("Expires", &Color::Yellow, false),
                    self.colorize(&format!("{at} (expired)"), &Color::Red, false)
                );
            }
            Some(at) => {
                let _ = writeln!(
                    out,
                    "  {}: {}",
                    self.colorize("Expires", &Color::Yellow, false),
                    at.format("%Y-%m-%d %H:%M UTC")
                );
            }
            None => {
                let _ = writeln!(
                    out,
                    "  {}: until sign-out",
                    self.colorize("Expires", &Color::Yellow, false)
                );
            }
        }
        out
    }

    pub fn format_profile(&self, profile: &UserProfile) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} {}",
            self.colorize("Signed in as", &Color::Green, true),
            self.colorize(&profile.name, &Color::Cyan, true)
        );
        if let Some(role) = &profile.role {
            let _ = writeln!(out, "  {}: {}", self.colorize("Role", &Color::Yellow, false), role);
        }
        if let Some(status) = &profile.subscription_status {
            let _ = writeln!(
                out,
                "  {}: {}",
                self.colorize("Subscription", &Color::Yellow, false),
                status
            );
        }
        out
    }

    pub fn format_nav(&self, nav: &NavView) -> String {
        let items: Vec<String> = nav
            .items
            .iter()
            .map(|item| match &item.target {
                NavTarget::Page(href) => format!("{} ({href})", item.label),
                NavTarget::SignOut => item.label.to_string(),
            })
            .collect();
        let user = match (&nav.initial, &nav.user_name) {
            (Some(initial), Some(name)) => format!("[{initial}] {name}"),
            _ => "Guest".to_string(),
        };
        format!("{user}  |  {}", items.join("  "))
    }

    pub fn format_cards(&self, state: &LoadState) -> String {
        match state {
            LoadState::Loaded(cards) => cards
                .iter()
                .map(|card| self.format_card(card))
                .collect::<Vec<_>>()
                .join("\n"),
            other => self.colorize(other.message().unwrap_or_default(), &Color::Yellow, false),
        }
    }

    fn format_card(&self, card: &ContentCard) -> String {
        let badges = card
            .badges()
            .into_iter()
            .map(|badge| match badge {
                "LIVE" => self.colorize(badge, &Color::Red, true),
                _ => self.colorize(badge, &Color::Yellow, true),
            })
            .collect::<Vec<_>>()
            .join(" ");
        let mut out = String::new();
        let _ = write!(
            out,
            "{} {}",
            self.colorize(&card.title, &Color::Cyan, true),
            badges
        );
        let _ = write!(
            out,
            "\n  {}  |  {}  |  {}",
            card.category, card.audience, card.link
        );
        out
    }

    pub fn format_player(&self, view: &PlayerView) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.colorize(&view.page_title, &Color::Green, true));
        let _ = writeln!(
            out,
            "  {}: {}",
            self.colorize("Status", &Color::Yellow, false),
            view.status
        );
        let _ = writeln!(
            out,
            "  {}: {}",
            self.colorize("Audience", &Color::Yellow, false),
            view.audience
        );
        let source = match &view.source {
            PlayerSource::Embed(code) => format!("embed {code}"),
            PlayerSource::Video(path) => path.clone(),
        };
        let _ = writeln!(
            out,
            "  {}: {}",
            self.colorize("Source", &Color::Yellow, false),
            source
        );
        if view.related.is_empty() {
            let _ = writeln!(out, "\nNo related content available");
        } else {
            let _ = writeln!(out, "\n{}", self.colorize("Related:", &Color::Green, true));
            for card in &view.related {
                let _ = writeln!(out, "{}", self.format_card(card));
            }
        }
        out
    }

    pub fn format_popup(&self, view: &PopupView) -> String {
        match view {
            PopupView::Failed { message } => self.colorize(message, &Color::Red, false),
            PopupView::Ready { card, actions } => {
                let mut out = self.format_card(card);
                out.push('\n');
                match actions {
                    PopupActions::Member {
                        favorite,
                        play_link,
                    } => {
                        let heart = if favorite.is_active() { "♥" } else { "♡" };
                        let _ = write!(out, "  {heart}  Play Now: {play_link}");
                    }
                    PopupActions::Guest { sign_in_link } => {
                        let _ = write!(out, "  Sign In to Access: {sign_in_link}");
                    }
                }
                out
            }
        }
    }

    pub fn format_toggle(&self, outcome: &ToggleOutcome) -> String {
        match outcome {
            ToggleOutcome::Toggled { button } if button.is_active() => {
                self.colorize("✓ Added to favorites", &Color::Green, false)
            }
            ToggleOutcome::Toggled { .. } => {
                self.colorize("✓ Removed from favorites", &Color::Green, false)
            }
            ToggleOutcome::SignInRequired { sign_in_link } => format!(
                "{} ({sign_in_link})",
                self.colorize(pegasus_client::pages::popup::SIGN_IN_PROMPT, &Color::Yellow, false)
            ),
            ToggleOutcome::Reverted { message, .. } => self.colorize(message, &Color::Red, false),
        }
    }

    pub fn format_access(&self, decision: &AccessDecision) -> String {
        if decision.accessible {
            return self.colorize("✓ Accessible", &Color::Green, true);
        }
        let hint = match decision.prompt() {
            pegasus_client::AccessPrompt::SignIn => "sign in to watch",
            pegasus_client::AccessPrompt::Upgrade => "premium subscription required",
            _ => "content unavailable",
        };
        format!(
            "{} ({}): {hint}",
            self.colorize("✗ Not accessible", &Color::Red, true),
            decision.reason
        )
    }

    pub fn format_favorite_status(&self, status: &FavoriteStatus) -> String {
        match (status.is_favorited, &status.favorite_id) {
            (true, Some(id)) => format!("♥ Favorited (id {id})"),
            (true, None) => "♥ Favorited".to_string(),
            _ => "♡ Not in favorites".to_string(),
        }
    }

    pub fn format_favorites(&self, records: &[FavoriteRecord]) -> String {
        if records.is_empty() {
            return "No favorites yet".to_string();
        }
        records
            .iter()
            .map(|r| {
                format!(
                    "{}  {}/{}",
                    self.colorize(r.favorite_id.as_str(), &Color::Yellow, false),
                    r.content_type,
                    r.content_id
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn format_comments(&self, comments: &[Comment]) -> String {
        if comments.is_empty() {
            return "No comments yet".to_string();
        }
        comments
            .iter()
            .map(|c| self.format_comment(c))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn format_comment(&self, comment: &Comment) -> String {
        let when = comment
            .created_at
            .map(|t| t.format(" %Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        format!(
            "{}{when}: {}",
            self.colorize(comment.author(), &Color::Cyan, true),
            comment.text
        )
    }

    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {message}"), &Color::Green, false)
    }

    fn colorize(&self, text: &str, color: &Color, bold: bool) -> String {
        #[cfg(feature = "colored-output")]
        {
            if self.colored {
                let colored_text = match color {
                    Color::Green => text.green(),
                    Color::Yellow => text.yellow(),
                    Color::Red => text.red(),
                    Color::Cyan => text.cyan(),
                };
                if bold {
                    colored_text.bold().to_string()
                } else {
                    colored_text.to_string()
                }
            } else {
                text.to_string()
            }
        }

        #[cfg(not(feature = "colored-output"))]
        {
            let _ = (color, bold, self.colored);
            text.to_string()
        }
    }
}
