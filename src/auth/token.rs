use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::random::random_suffix;
use crate::util::clock::to_chrono;

/// Access token shown on the dashboard before any refresh.
pub const STATIC_ACCESS_TOKEN: &str =
    "ya29.a0ARl2qP9S-T-I_gJ-gH-jK-lM-nP-qR-sT-uV-wX-yZ-0A_1B_2C_3D_4E_5F_6G_7H_8I_9J";
/// Prefix of tokens minted by the simulated code exchange.
pub const EXCHANGED_TOKEN_PREFIX: &str = "ya29.mock_access_token_";
/// Prefix of tokens minted by the simulated refresh.
pub const REFRESHED_TOKEN_PREFIX: &str = "ya29.mock_refreshed_token_";
pub const TOKEN_TYPE: &str = "Bearer";
pub const TOKEN_SCOPE: &str = "profile email";
/// `expires_in` reported by the mock token endpoint, in seconds.
pub const EXCHANGED_TOKEN_EXPIRES_IN: u64 = 3600;

/// Placeholder access token held by the dashboard.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use chrono::Utc;
/// use oauth_academy::auth::MockToken;
///
/// let now = Utc::now();
/// let token = MockToken::issued("ya29.example", now, Duration::from_secs(300));
/// assert!(!token.is_expired_at(now));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockToken {
    pub value: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl MockToken {
    pub fn issued(value: impl Into<String>, issued_at: DateTime<Utc>, lifetime: Duration) -> Self {
        Self {
            value: value.into(),
            issued_at,
            expires_at: issued_at + to_chrono(lifetime),
        }
    }

    /// The dashboard's starting token, acquired `age` before `now`.
    pub fn initial(now: DateTime<Utc>, lifetime: Duration, age: Duration) -> Self {
        Self::issued(STATIC_ACCESS_TOKEN, now - to_chrono(age), lifetime)
    }

    /// Mint a replacement with a fresh random value, expiring `lifetime` after `now`.
    pub fn refreshed(&self, now: DateTime<Utc>, lifetime: Duration) -> Self {
        let value = loop {
            let candidate = format!("{REFRESHED_TOKEN_PREFIX}{}", random_suffix());
            if candidate != self.value {
                break candidate;
            }
        };
        Self::issued(value, now, lifetime)
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn remaining_at(&self, now: DateTime<Utc>) -> Countdown {
        Countdown::between(now, self.expires_at)
    }

    /// First 12 and last 8 characters around an ellipsis.
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.value.chars().collect();
        let head: String = chars.iter().take(12).collect();
        let tail: String = chars[chars.len().saturating_sub(8)..].iter().collect();
        format!("{head}...{tail}")
    }
}

/// Time left on a token, as the dashboard badge shows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Countdown {
    Remaining { minutes: i64, seconds: i64 },
    Expired,
}

impl Countdown {
    /// Whole seconds left until `expires_at`; `Expired` once `now >= expires_at`.
    pub fn between(now: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        let left = expires_at - now;
        if left <= chrono::Duration::zero() {
            return Self::Expired;
        }
        let total = left.num_seconds();
        Self::Remaining {
            minutes: total / 60,
            seconds: total % 60,
        }
    }

    pub fn is_expired(&self) -> bool {
        matches!(self, Self::Expired)
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remaining { minutes, seconds } => write!(f, "{minutes}m {seconds:02}s"),
            Self::Expired => f.write_str("Token expired"),
        }
    }
}

/// Body of the mock token endpoint response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: u64,
    pub token_type: String,
    pub scope: String,
}

impl TokenResponse {
    /// Fabricate the response a provider would return for an authorization code.
    pub fn generate() -> Self {
        Self {
            access_token: format!("{EXCHANGED_TOKEN_PREFIX}{}", random_suffix()),
            expires_in: EXCHANGED_TOKEN_EXPIRES_IN,
            token_type: TOKEN_TYPE.to_string(),
            scope: TOKEN_SCOPE.to_string(),
        }
    }

    pub fn into_token(self, issued_at: DateTime<Utc>) -> MockToken {
        MockToken::issued(
            self.access_token,
            issued_at,
            Duration::from_secs(self.expires_in),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn countdown_expires_exactly_at_expiry() {
        let expiry = Utc::now();
        assert_eq!(Countdown::between(expiry, expiry), Countdown::Expired);
        assert_eq!(
            Countdown::between(expiry - chrono::Duration::nanoseconds(1), expiry),
            Countdown::Remaining {
                minutes: 0,
                seconds: 0
            }
        );
        assert!(Countdown::between(expiry + chrono::Duration::seconds(5), expiry).is_expired());
    }

    #[test]
    fn countdown_formats_minutes_and_padded_seconds() {
        let now = Utc::now();
        let left = Countdown::between(now, now + chrono::Duration::milliseconds(245_900));
        assert_eq!(left.to_string(), "4m 05s");
        assert_eq!(Countdown::Expired.to_string(), "Token expired");
    }

    #[test]
    fn initial_token_is_a_minute_old() {
        let now = Utc::now();
        let token = MockToken::initial(now, Duration::from_secs(300), Duration::from_secs(60));
        assert_eq!(token.value, STATIC_ACCESS_TOKEN);
        assert_eq!(token.issued_at, now - chrono::Duration::seconds(60));
        assert_eq!(token.remaining_at(now).to_string(), "4m 00s");
    }

    #[test]
    fn masked_keeps_head_and_tail() {
        let token = MockToken::initial(Utc::now(), Duration::from_secs(1), Duration::ZERO);
        assert_eq!(token.masked(), "ya29.a0ARl2q...7H_8I_9J");
    }

    #[test]
    fn refreshed_token_differs_and_expires_later() {
        let now = Utc::now();
        let original = MockToken::initial(now, Duration::from_secs(300), Duration::from_secs(60));
        let refreshed = original.refreshed(now, Duration::from_secs(300));
        assert_ne!(refreshed.value, original.value);
        assert!(refreshed.value.starts_with(REFRESHED_TOKEN_PREFIX));
        assert!(refreshed.expires_at > now);
        assert_eq!(refreshed.issued_at, now);
    }

    #[test]
    fn generated_response_matches_provider_shape() {
        let response = TokenResponse::generate();
        assert!(response.access_token.starts_with(EXCHANGED_TOKEN_PREFIX));
        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.scope, "profile email");
        let issued = Utc::now();
        let token = response.into_token(issued);
        assert_eq!(token.expires_at, issued + chrono::Duration::hours(1));
    }
}
