use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use pegasus_client::ContentKind;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pegasus")]
#[command(about = "Sign in, browse and watch on the Pegasus sports-streaming platform")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// API base URL
    #[arg(long, global = true, env = "PEGASUS_API_BASE")]
    pub api_base: Option<String>,

    /// Credential storage file
    #[arg(long, global = true, env = "PEGASUS_STORAGE")]
    pub storage: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "pretty")]
    pub output: OutputFormat,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in with email and password
    Signin {
        #[arg(short, long)]
        email: String,

        /// Password (read from stdin when omitted)
        #[arg(short, long, env = "PEGASUS_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Keep the session and record an expiry
        #[arg(short, long)]
        remember: bool,
    },

    /// Create an account
    Signup {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "PEGASUS_PASSWORD", hide_env_values = true)]
        password: String,

        /// Password confirmation (defaults to the password)
        #[arg(long)]
        confirm: Option<String>,
    },

    /// Sign out and forget the stored session
    Signout,

    /// Show the signed-in user
    Whoami {
        /// Check the session against the API
        #[arg(long)]
        verify: bool,
    },

    /// List content cards
    Content {
        #[arg(short = 't', long = "type", value_parser = parse_kind, default_value = "all")]
        kind: ContentKind,

        /// Category filter
        #[arg(long, default_value = "all")]
        category: String,

        #[arg(short, long, default_value_t = 8)]
        limit: usize,
    },

    /// Show the player view for an item
    Play {
        #[arg(value_parser = parse_kind)]
        kind: ContentKind,
        id: String,
    },

    /// Show the detail popup for an item
    Popup {
        #[arg(value_parser = parse_kind)]
        kind: ContentKind,
        id: String,

        /// Page to return to after signing in
        #[arg(long, default_value = "index.html")]
        return_to: String,
    },

    /// Check whether an item can be watched
    Access {
        #[arg(value_parser = parse_kind)]
        kind: ContentKind,
        id: String,
    },

    /// Manage favorites
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },

    /// Read and post comments
    Comments {
        #[command(subcommand)]
        action: CommentsAction,
    },

    /// Show or reset configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Reset configuration to defaults
        #[arg(long)]
        reset: bool,
    },

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum FavoritesAction {
    Add {
        #[arg(value_parser = parse_kind)]
        kind: ContentKind,
        id: String,
    },
    Remove {
        favorite_id: String,
    },
    Check {
        #[arg(value_parser = parse_kind)]
        kind: ContentKind,
        id: String,
    },
    List,
    Toggle {
        #[arg(value_parser = parse_kind)]
        kind: ContentKind,
        id: String,
    },
}

#[derive(Subcommand)]
pub enum CommentsAction {
    List {
        #[arg(value_parser = parse_kind)]
        kind: ContentKind,
        id: String,
    },
    Post {
        #[arg(value_parser = parse_kind)]
        kind: ContentKind,
        id: String,
        text: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output
    Pretty,
    /// JSON output
    Json,
    /// Compact JSON output
    JsonCompact,
}

impl OutputFormat {
    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json | Self::JsonCompact)
    }
}

fn parse_kind(raw: &str) -> Result<ContentKind, String> {
    raw.parse()
        .map_err(|_| format!("unknown content type '{raw}' (live, vod, highlight, channel, all)"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_nested_favorites_command() {
        let args = Args::parse_from(["pegasus", "--output", "json", "favorites", "toggle", "live", "7"]);
        assert_eq!(args.output, OutputFormat::Json);
        match args.command {
            Commands::Favorites {
                action: FavoritesAction::Toggle { kind, id },
            } => {
                assert_eq!(kind, ContentKind::Live);
                assert_eq!(id, "7");
            }
            _ => panic!("expected favorites toggle"),
        }
    }

    #[test]
    fn content_defaults() {
        let args = Args::parse_from(["pegasus", "content"]);
        match args.command {
            Commands::Content {
                kind,
                category,
                limit,
            } => {
                assert_eq!(kind, ContentKind::All);
                assert_eq!(category, "all");
                assert_eq!(limit, 8);
            }
            _ => panic!("expected content"),
        }
    }

    #[test]
    fn rejects_unknown_kind() {
        assert!(Args::try_parse_from(["pegasus", "access", "podcast", "1"]).is_err());
    }
}
