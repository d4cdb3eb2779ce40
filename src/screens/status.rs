//! Authentication status badge.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AuthStatus {
    Authenticated,
    Unauthenticated,
    Loading,
}

impl AuthStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Authenticated => "Authenticated",
            Self::Unauthenticated => "Not Authenticated",
            Self::Loading => "Checking...",
        }
    }

    fn icon(&self) -> &'static str {
        match self {
            Self::Authenticated => "✔",
            Self::Unauthenticated => "✖",
            Self::Loading => "…",
        }
    }

    /// Badge text, e.g. `[✖ Not Authenticated]`.
    pub fn badge(&self) -> Badge {
        Badge(*self)
    }
}

/// Display adapter for [`AuthStatus::badge`].
#[derive(Debug, Clone, Copy)]
pub struct Badge(AuthStatus);

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {}]", self.0.icon(), self.0.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_match_badge_text() {
        assert_eq!(AuthStatus::Unauthenticated.badge().to_string(), "[✖ Not Authenticated]");
        assert_eq!(AuthStatus::Loading.label(), "Checking...");
        assert_eq!("authenticated".parse::<AuthStatus>().unwrap(), AuthStatus::Authenticated);
    }
}
