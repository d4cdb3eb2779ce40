//! Route table, route parsing and navigation requests.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tokio::sync::mpsc;
use url::Url;

use crate::error::{AcademyError, Result};

const BASE_URL: &str = "http://oauth-academy.local/";

/// Which screen a route mounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ScreenKind {
    Landing,
    Callback,
    Dashboard,
    Guard,
    NotFound,
}

/// Parameters the provider appends to the redirect URI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
}

impl CallbackParams {
    pub fn with_code(code: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            error: None,
        }
    }

    pub fn with_error(error: impl Into<String>) -> Self {
        Self {
            code: None,
            error: Some(error.into()),
        }
    }
}

/// A location in the app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "route", rename_all = "snake_case")]
pub enum Route {
    Landing,
    Callback(CallbackParams),
    Dashboard,
    NotFound { path: String },
}

/// `(pattern, description)` for every route, catch-all last.
pub const ROUTE_TABLE: &[(&str, &str)] = &[
    ("/", "Landing: start the simulated login"),
    ("/callback?code=...&error=...", "Callback: simulated provider redirect target"),
    ("/dashboard", "Dashboard: mock profile and token (guarded)"),
    ("*", "Not found"),
];

impl Route {
    /// Parse a path with optional query string, e.g. `/callback?code=abc`.
    ///
    /// Empty query values count as absent. Unknown paths become
    /// [`Route::NotFound`].
    pub fn parse(target: &str) -> Result<Self> {
        let target = target.trim();
        if target.is_empty() {
            return Ok(Self::Landing);
        }
        let base = Url::parse(BASE_URL)?;
        let url = base.join(target)?;
        if url.host_str() != base.host_str() {
            return Err(AcademyError::InvalidRoute(format!(
                "{target} leaves the app"
            )));
        }

        let path = normalize_path(url.path());
        let route = match path.as_str() {
            "/" => Self::Landing,
            "/callback" => Self::Callback(CallbackParams {
                code: first_param(&url, "code"),
                error: first_param(&url, "error"),
            }),
            "/dashboard" => Self::Dashboard,
            _ => Self::NotFound { path },
        };
        Ok(route)
    }

    pub fn path(&self) -> &str {
        match self {
            Self::Landing => "/",
            Self::Callback(_) => "/callback",
            Self::Dashboard => "/dashboard",
            Self::NotFound { path } => path,
        }
    }

    pub fn kind(&self) -> ScreenKind {
        match self {
            Self::Landing => ScreenKind::Landing,
            Self::Callback(_) => ScreenKind::Callback,
            Self::Dashboard => ScreenKind::Guard,
            Self::NotFound { .. } => ScreenKind::NotFound,
        }
    }

    /// Routes rendered behind the route guard.
    pub fn is_protected(&self) -> bool {
        matches!(self, Self::Dashboard)
    }

    /// Path plus query string.
    pub fn to_target(&self) -> String {
        let Self::Callback(params) = self else {
            return self.path().to_string();
        };
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        if let Some(code) = &params.code {
            query.append_pair("code", code);
        }
        if let Some(error) = &params.error {
            query.append_pair("error", error);
        }
        let query = query.finish();
        if query.is_empty() {
            "/callback".to_string()
        } else {
            format!("/callback?{query}")
        }
    }
}

impl FromStr for Route {
    type Err = AcademyError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_target())
    }
}

fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

fn first_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// A request to move to another route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Navigation {
    pub to: Route,
    /// Replace the current history entry instead of pushing a new one.
    pub replace: bool,
    /// Mount generation of the screen that asked; the app shell ignores
    /// requests from screens it has already torn down.
    #[serde(default)]
    pub generation: u64,
}

/// Handle screens use to request navigation from the app shell.
#[derive(Debug, Clone)]
pub struct Navigator {
    tx: mpsc::UnboundedSender<Navigation>,
    generation: u64,
}

impl Navigator {
    /// A navigator and the receiver the app shell reads from.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Navigation>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx, generation: 0 }, rx)
    }

    /// Same channel, tagging requests with `generation`.
    pub fn for_generation(&self, generation: u64) -> Self {
        Self {
            tx: self.tx.clone(),
            generation,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Push `to` onto the history.
    pub fn navigate(&self, to: Route) {
        self.send(Navigation {
            to,
            replace: false,
            generation: self.generation,
        });
    }

    /// Replace the current history entry with `to`.
    pub fn replace(&self, to: Route) {
        self.send(Navigation {
            to,
            replace: true,
            generation: self.generation,
        });
    }

    fn send(&self, navigation: Navigation) {
        if self.tx.send(navigation).is_err() {
            tracing::debug!("navigation dropped: app shell is gone");
        }
    }
}
