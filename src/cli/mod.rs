//! CLI entry point for the academy.

pub mod play;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::AcademyConfig;
use crate::error::{AcademyError, Result};

/// Speed used by `--fast`.
pub const FAST_SPEED: f64 = 20.0;

/// OAuth 2.0 Academy CLI
#[derive(Parser, Debug)]
#[command(
    name = "oauth-academy",
    version,
    about = "OAuth 2.0 Academy: simulate the authorization code flow"
)]
pub struct Cli {
    /// Divide every simulated delay by this factor
    #[arg(long, global = true)]
    pub speed: Option<f64>,

    /// Shorthand for --speed 20
    #[arg(long, global = true, conflicts_with = "speed")]
    pub fast: bool,

    /// Config file (default: ~/.oauth-academy/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the app at a path and follow its redirects
    Open(OpenArgs),
    /// Click "Sign in with Google" and watch the whole flow
    Login,
    /// Try the dashboard's actions without the route guard
    Dashboard(DashboardArgs),
    /// List the app's routes
    Routes,
}

/// Arguments for `oauth-academy open`.
#[derive(Parser, Debug)]
pub struct OpenArgs {
    /// Path with optional query, e.g. "/callback?code=abc"
    #[arg(default_value = "/")]
    pub path: String,

    /// Press "Return to Home" if the page offers it
    #[arg(long)]
    pub return_home: bool,
}

/// Arguments for `oauth-academy dashboard`.
#[derive(Parser, Debug)]
pub struct DashboardArgs {
    /// Reveal the full access token
    #[arg(long)]
    pub show_token: bool,

    /// Refresh the access token
    #[arg(long)]
    pub refresh: bool,

    /// Copy the access token to the clipboard
    #[arg(long)]
    pub copy: bool,

    /// Call the mock Google Calendar API
    #[arg(long)]
    pub test_api: bool,

    /// Log out when done
    #[arg(long)]
    pub logout: bool,

    /// Where --copy writes the token
    #[arg(long, value_enum, default_value_t = ClipboardKind::Terminal)]
    pub clipboard: ClipboardKind,
}

/// Clipboard backend selection.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardKind {
    /// OSC 52 escape sequence to the terminal
    Terminal,
    /// Keep the copy in memory
    Memory,
    /// Refuse every copy
    Disabled,
}

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Config file and environment, then `--speed`/`--fast`.
    pub fn resolve_config(&self) -> Result<AcademyConfig> {
        let config = AcademyConfig::load(self.config.as_deref())?;
        let config = match (self.fast, self.speed) {
            (true, _) => config.with_speed(FAST_SPEED),
            (false, Some(speed)) => config.with_speed(speed),
            (false, None) => config,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Map an [`AcademyError`] to a user-facing message with a hint.
pub fn format_error_help(err: &AcademyError) -> String {
    match err {
        AcademyError::InvalidRoute(msg) => {
            format!("Invalid route: {msg}. Run: oauth-academy routes")
        }
        AcademyError::Configuration(msg) => {
            format!(
                "Configuration error: {msg}. Check your .env, OAUTH_ACADEMY_* variables or {}",
                AcademyConfig::default_path().display()
            )
        }
        other => format!("{other}"),
    }
}
