//! Callback screen: the redirect target that "exchanges" the code.
//!
//! States: `loading -> success -> (navigate to /dashboard)` or
//! `loading -> error`, where error is terminal until the user returns home.

use std::fmt::Write as _;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tokio::sync::watch;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::ScreenContext;
use crate::auth::{MockUser, TokenResponse};
use crate::error::{AcademyError, Result};
use crate::events::{Emitter, EventPayload};
use crate::router::{CallbackParams, Navigator, Route, ScreenKind};
use crate::util::timer::{delay_until, TimerHandle};

pub const NO_CODE_MESSAGE: &str = "No authorization code received";
pub const EXCHANGE_FAILED_MESSAGE: &str = "Failed to exchange authorization code";
const GENERIC_FAILURE: &str = "Something went wrong during authentication";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FlowStatus {
    Loading,
    Success,
    Error,
}

/// Snapshot of the callback screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackState {
    pub status: FlowStatus,
    pub error_message: Option<String>,
    pub token: Option<TokenResponse>,
    pub user: Option<MockUser>,
}

impl CallbackState {
    fn loading() -> Self {
        Self {
            status: FlowStatus::Loading,
            error_message: None,
            token: None,
            user: None,
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            status: FlowStatus::Error,
            error_message: Some(message.into()),
            ..Self::loading()
        }
    }

    fn succeeded(token: TokenResponse, user: MockUser) -> Self {
        Self {
            status: FlowStatus::Success,
            error_message: None,
            token: Some(token),
            user: Some(user),
        }
    }
}

/// What the redirect parameters call for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackDecision {
    Exchange { code: String },
    Reject { message: String },
}

impl CallbackDecision {
    /// A provider `error` wins over any `code`; a missing code is an error too.
    pub fn from_params(params: &CallbackParams) -> Self {
        if let Some(error) = &params.error {
            return Self::Reject {
                message: error.clone(),
            };
        }
        match &params.code {
            Some(code) => Self::Exchange { code: code.clone() },
            None => Self::Reject {
                message: NO_CODE_MESSAGE.to_string(),
            },
        }
    }
}

#[derive(Debug)]
pub struct CallbackScreen {
    navigator: Navigator,
    emitter: Emitter,
    cancel: CancellationToken,
    state: watch::Receiver<CallbackState>,
    _exchange: Option<TimerHandle>,
}

impl CallbackScreen {
    /// Mount the screen and immediately act on `params`.
    pub fn mount(ctx: &ScreenContext, params: CallbackParams) -> Self {
        let emitter = ctx.emitter(ScreenKind::Callback);
        emitter.emit(EventPayload::Mounted);
        let cancel = CancellationToken::new();

        let (state, exchange) = match CallbackDecision::from_params(&params) {
            CallbackDecision::Reject { message } => {
                tracing::warn!(error = %message, "authorization callback rejected");
                emitter.narrate(format!("OAuth error: {message}"));
                emitter.emit(EventPayload::FlowStatusChanged {
                    status: FlowStatus::Error,
                });
                let (_tx, rx) = watch::channel(CallbackState::failed(message));
                (rx, None)
            }
            CallbackDecision::Exchange { code } => {
                emitter.emit(EventPayload::FlowStatusChanged {
                    status: FlowStatus::Loading,
                });
                emitter.narrate("Exchanging authorization code for access token...");
                emitter.narrate(format!("Authorization Code: {code}"));

                let (tx, rx) = watch::channel(CallbackState::loading());
                let task = run_exchange(
                    exchange,
                    tx,
                    Instant::now() + ctx.config.exchange_delay(),
                    ctx.config.success_redirect_delay(),
                    emitter.clone(),
                    ctx.navigator.clone(),
                    cancel.clone(),
                );
                (rx, Some(TimerHandle::spawn(task)))
            }
        };

        Self {
            navigator: ctx.navigator.clone(),
            emitter,
            cancel,
            state,
            _exchange: exchange,
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> CallbackState {
        self.state.borrow().clone()
    }

    /// Current flow status.
    pub fn status(&self) -> FlowStatus {
        self.state.borrow().status
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<CallbackState> {
        self.state.clone()
    }

    /// Wait until the screen leaves `loading`.
    ///
    /// Returns the last state seen if the exchange was torn down first.
    pub async fn settled(&mut self) -> CallbackState {
        loop {
            {
                let state = self.state.borrow_and_update();
                if state.status != FlowStatus::Loading {
                    return state.clone();
                }
            }
            if self.state.changed().await.is_err() {
                return self.state.borrow().clone();
            }
        }
    }

    /// The error screen's "Return to Home" action.
    pub fn return_home(&self) -> Result<()> {
        if self.status() != FlowStatus::Error {
            return Err(AcademyError::InvalidState(format!(
                "return home is only offered on error, status is {}",
                self.status()
            )));
        }
        self.navigator.navigate(Route::Landing);
        Ok(())
    }

    /// Text rendering of the loading, success or error view.
    pub fn render(&self) -> String {
        let state = self.state.borrow();
        let mut out = String::new();
        match state.status {
            FlowStatus::Loading => {
                let _ = writeln!(out, "Exchanging Authorization Code");
                let _ = writeln!(out, "Securely obtaining your access token...");
                let _ = writeln!(out, "  • POST /oauth/token");
                let _ = writeln!(out, "  • Validating authorization code...");
                let _ = writeln!(out, "  • Fetching user profile...");
            }
            FlowStatus::Success => {
                let _ = writeln!(out, "Authentication Successful!");
                let _ = writeln!(out, "Redirecting to dashboard...");
            }
            FlowStatus::Error => {
                let message = state.error_message.as_deref().unwrap_or_default();
                let headline = if message.is_empty() { GENERIC_FAILURE } else { message };
                let _ = writeln!(out, "Authentication Failed");
                let _ = writeln!(out, "{headline}");
                let _ = writeln!(out, "Error: {message}");
                let _ = writeln!(out, "  [ Return to Home ]");
            }
        }
        out
    }
}

impl Drop for CallbackScreen {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.emitter.emit(EventPayload::Unmounted);
    }
}

/// Produces the token endpoint response and profile once the exchange delay passes.
type ExchangeFn = fn(&Emitter) -> Result<(TokenResponse, MockUser)>;

async fn run_exchange(
    exchange: ExchangeFn,
    state: watch::Sender<CallbackState>,
    exchange_deadline: Instant,
    redirect_delay: Duration,
    emitter: Emitter,
    navigator: Navigator,
    cancel: CancellationToken,
) {
    if !delay_until(exchange_deadline, &cancel).await {
        return;
    }

    let (token, user) = match exchange(&emitter) {
        Ok(pair) => pair,
        Err(err) => {
            tracing::warn!(error = %err, "mock token exchange failed");
            emitter.narrate(format!("Token exchange failed: {err}"));
            state.send_replace(CallbackState::failed(EXCHANGE_FAILED_MESSAGE));
            emitter.emit(EventPayload::FlowStatusChanged {
                status: FlowStatus::Error,
            });
            return;
        }
    };

    state.send_replace(CallbackState::succeeded(token, user));
    emitter.emit(EventPayload::FlowStatusChanged {
        status: FlowStatus::Success,
    });

    if !delay_until(Instant::now() + redirect_delay, &cancel).await {
        return;
    }
    navigator.navigate(Route::Dashboard);
}

/// Fabricate the token endpoint response and the user profile.
fn exchange(emitter: &Emitter) -> Result<(TokenResponse, MockUser)> {
    let token = TokenResponse::generate();
    let user = MockUser::generated();
    emitter.narrate(format!("Token received: {}", serde_json::to_string(&token)?));
    emitter.narrate(format!("User profile: {}", serde_json::to_string(&user)?));
    Ok((token, user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU64;
    use std::sync::Arc;

    use crate::util::SystemClock;

    #[test]
    fn error_param_wins_over_code() {
        let params = CallbackParams {
            code: Some("abc".into()),
            error: Some("access_denied".into()),
        };
        assert_eq!(
            CallbackDecision::from_params(&params),
            CallbackDecision::Reject {
                message: "access_denied".into()
            }
        );
    }

    #[test]
    fn missing_code_is_rejected() {
        assert_eq!(
            CallbackDecision::from_params(&CallbackParams::default()),
            CallbackDecision::Reject {
                message: NO_CODE_MESSAGE.into()
            }
        );
    }

    #[test]
    fn code_alone_is_exchanged() {
        assert_eq!(
            CallbackDecision::from_params(&CallbackParams::with_code("abc")),
            CallbackDecision::Exchange { code: "abc".into() }
        );
    }

    fn failing_exchange(_emitter: &Emitter) -> Result<(TokenResponse, MockUser)> {
        Err(AcademyError::Serialization(
            serde_json::from_str::<serde_json::Value>("{").unwrap_err(),
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn failed_exchange_ends_in_error_without_redirect() {
        let emitter = Emitter::new(
            ScreenKind::Callback,
            None,
            Arc::new(SystemClock),
            Arc::new(AtomicU64::new(0)),
        );
        let (navigator, mut navigations) = Navigator::channel();
        let (tx, rx) = watch::channel(CallbackState::loading());

        run_exchange(
            failing_exchange,
            tx,
            Instant::now() + Duration::from_millis(2000),
            Duration::from_millis(1500),
            emitter,
            navigator,
            CancellationToken::new(),
        )
        .await;

        let state = rx.borrow().clone();
        assert_eq!(state.status, FlowStatus::Error);
        assert_eq!(state.error_message.as_deref(), Some(EXCHANGE_FAILED_MESSAGE));
        assert!(state.token.is_none());
        assert!(navigations.try_recv().is_err());
    }
}
