//! Dashboard screen: mock profile, token details and simulated actions.

use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::CancellationToken;

use super::status::AuthStatus;
use super::ScreenContext;
use crate::api::CalendarPayload;
use crate::auth::token::{TOKEN_SCOPE, TOKEN_TYPE};
use crate::auth::{Countdown, MockToken, MockUser};
use crate::error::{AcademyError, Result};
use crate::events::{Emitter, EventPayload, ToastLevel};
use crate::router::{Route, ScreenKind};
use crate::util::timer::{delay_until, Pending, TimerHandle};
use crate::util::Clock;

const PROVIDER_NAME: &str = "Google OAuth 2.0";

/// Progress of the "Test Google Calendar API" action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiTestState {
    Idle,
    Testing,
    Done(CalendarPayload),
}

/// Result of copying the token to the clipboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied,
    Failed { reason: String },
}

#[derive(Debug)]
pub struct DashboardScreen {
    ctx: ScreenContext,
    emitter: Emitter,
    cancel: CancellationToken,
    user: MockUser,
    token: Arc<watch::Sender<MockToken>>,
    countdown: watch::Receiver<Countdown>,
    api: Arc<watch::Sender<ApiTestState>>,
    show_token: bool,
    _countdown_task: TimerHandle,
    refresh_task: Option<TimerHandle>,
    api_task: Option<TimerHandle>,
}

impl DashboardScreen {
    /// Mount with the static user and the initial, minute-old token, and
    /// start the expiry countdown.
    pub fn mount(ctx: &ScreenContext) -> Self {
        let emitter = ctx.emitter(ScreenKind::Dashboard);
        emitter.emit(EventPayload::Mounted);
        let cancel = CancellationToken::new();

        let now = ctx.clock.now();
        let token = MockToken::initial(
            now,
            ctx.config.token_lifetime(),
            ctx.config.initial_token_age(),
        );
        let (countdown_tx, countdown_rx) = watch::channel(token.remaining_at(now));
        let (token_tx, token_rx) = watch::channel(token);

        let tick = ctx.config.countdown_tick();
        let countdown_task = TimerHandle::spawn(run_countdown(
            ctx.clock.clone(),
            Instant::now() + tick,
            tick,
            token_rx,
            countdown_tx,
            emitter.clone(),
            cancel.clone(),
        ));

        Self {
            ctx: ctx.clone(),
            emitter,
            cancel,
            user: MockUser::dashboard(),
            token: Arc::new(token_tx),
            countdown: countdown_rx,
            api: Arc::new(watch::channel(ApiTestState::Idle).0),
            show_token: false,
            _countdown_task: countdown_task,
            refresh_task: None,
            api_task: None,
        }
    }

    /// The static profile shown on the dashboard.
    pub fn user(&self) -> &MockUser {
        &self.user
    }

    /// The current access token, refreshed or not.
    pub fn token(&self) -> MockToken {
        self.token.borrow().clone()
    }

    /// Always authenticated once mounted.
    pub fn status(&self) -> AuthStatus {
        AuthStatus::Authenticated
    }

    /// The value last published by the countdown timer.
    pub fn countdown(&self) -> Countdown {
        *self.countdown.borrow()
    }

    /// Receiver notified on every countdown tick.
    pub fn subscribe_countdown(&self) -> watch::Receiver<Countdown> {
        self.countdown.clone()
    }

    /// Countdown updates as a stream, starting with the current value.
    pub fn countdown_stream(&self) -> WatchStream<Countdown> {
        WatchStream::new(self.countdown.clone())
    }

    /// Progress of the API test.
    pub fn api_state(&self) -> ApiTestState {
        self.api.borrow().clone()
    }

    /// Whether a token refresh is pending.
    pub fn is_refreshing(&self) -> bool {
        is_running(&self.refresh_task)
    }

    /// The API test is offered unless one is running or the token has expired.
    pub fn can_test_api(&self) -> bool {
        !matches!(*self.api.borrow(), ApiTestState::Testing) && !self.countdown().is_expired()
    }

    /// Flip between masked and full token; returns the new visibility.
    pub fn toggle_token_visibility(&mut self) -> bool {
        self.show_token = !self.show_token;
        self.show_token
    }

    /// The token as currently shown, masked unless revealed.
    pub fn displayed_token(&self) -> String {
        let token = self.token.borrow();
        if self.show_token {
            token.value.clone()
        } else {
            token.masked()
        }
    }

    /// Clears nothing; there is no real session. Returns to the landing page.
    pub fn logout(&self) {
        self.emitter.narrate("Logging out...");
        self.emitter.toast(ToastLevel::Success, "Logged out successfully");
        self.ctx.navigator.navigate(Route::Landing);
    }

    /// After the refresh delay, swap in a new random token expiring one
    /// lifetime from then. The countdown restarts against the new expiry.
    pub fn refresh_token(&mut self) -> Result<Pending<MockToken>> {
        if self.is_refreshing() {
            return Err(AcademyError::ActionUnavailable(
                "token refresh already in progress".to_string(),
            ));
        }
        self.emitter.narrate("Refreshing access token...");

        let deadline = Instant::now() + self.ctx.config.refresh_delay();
        let lifetime = self.ctx.config.token_lifetime();
        let clock = self.ctx.clock.clone();
        let token = self.token.clone();
        let emitter = self.emitter.clone();
        let cancel = self.cancel.clone();
        let (tx, pending) = Pending::channel("token refresh");

        self.refresh_task = Some(TimerHandle::spawn(async move {
            if !delay_until(deadline, &cancel).await {
                return;
            }
            let next = token.borrow().refreshed(clock.now(), lifetime);
            token.send_replace(next.clone());
            tracing::debug!(expires_at = %next.expires_at, "mock token refreshed");
            emitter.toast(ToastLevel::Success, "Token refreshed successfully");
            let _ = tx.send(next);
        }));
        Ok(pending)
    }

    /// Write the current token to the clipboard and report how it went.
    pub async fn copy_token(&self) -> CopyOutcome {
        let value = self.token.borrow().value.clone();
        if value.is_empty() {
            return CopyOutcome::Failed {
                reason: "no access token".to_string(),
            };
        }
        match self.ctx.clipboard.write_text(&value).await {
            Ok(()) => {
                self.emitter
                    .toast(ToastLevel::Info, "Access Token copied to clipboard!");
                CopyOutcome::Copied
            }
            Err(err) => {
                tracing::warn!(error = %err, "could not copy token");
                self.emitter.toast(ToastLevel::Error, "Failed to copy token.");
                CopyOutcome::Failed {
                    reason: err.to_string(),
                }
            }
        }
    }

    /// After the API delay, resolve with the canned calendar payload.
    pub fn test_api(&mut self) -> Result<Pending<CalendarPayload>> {
        if matches!(*self.api.borrow(), ApiTestState::Testing) {
            return Err(AcademyError::ActionUnavailable(
                "API test already running".to_string(),
            ));
        }
        if self.countdown().is_expired() {
            return Err(AcademyError::ActionUnavailable(
                Countdown::Expired.to_string(),
            ));
        }

        self.api.send_replace(ApiTestState::Testing);
        self.emitter.narrate("Testing Google API with access token...");

        let deadline = Instant::now() + self.ctx.config.api_test_delay();
        let api = self.api.clone();
        let emitter = self.emitter.clone();
        let cancel = self.cancel.clone();
        let (tx, pending) = Pending::channel("API test");

        self.api_task = Some(TimerHandle::spawn(async move {
            if !delay_until(deadline, &cancel).await {
                return;
            }
            let payload = CalendarPayload::demo();
            api.send_replace(ApiTestState::Done(payload.clone()));
            emitter.toast(ToastLevel::Success, "API test successful");
            match payload.to_pretty_json() {
                Ok(json) => emitter.narrate(format!("API Response: {json}")),
                Err(err) => tracing::debug!(error = %err, "could not render API response"),
            }
            let _ = tx.send(payload);
        }));
        Ok(pending)
    }

    /// Text rendering of the profile, token, API and debug panels.
    pub fn render(&self) -> String {
        let token = self.token.borrow();
        let mut out = String::new();
        let _ = writeln!(out, "OAuth 2.0 Academy                      [ Logout ]");
        let _ = writeln!(out);
        let _ = writeln!(out, "Welcome back!");
        let _ = writeln!(out, "Your OAuth 2.0 authentication is active");
        let _ = writeln!(out);
        let _ = writeln!(out, "User Profile");
        let _ = writeln!(out, "  ({}) {}  ✔ Verified", self.user.initial(), self.user.name);
        let _ = writeln!(out, "  Email:   {}", self.user.email);
        let _ = writeln!(out, "  User ID: {}", self.user.id);
        let _ = writeln!(out);
        let _ = writeln!(out, "Access Token");
        let shown = if self.show_token {
            token.value.clone()
        } else {
            token.masked()
        };
        let _ = writeln!(out, "  {shown}");
        let toggle = if self.show_token { "Hide" } else { "Show" };
        let _ = writeln!(out, "  [ {toggle} Token ] [ Copy Token ]");
        let _ = writeln!(out, "  Expires in: {}", self.countdown());
        let refresh = if self.is_refreshing() {
            "Refreshing..."
        } else {
            "Refresh Token"
        };
        let _ = writeln!(out, "  [ {refresh} ]");
        let _ = writeln!(out);
        let _ = writeln!(out, "API Testing");
        match &*self.api.borrow() {
            ApiTestState::Testing => {
                let _ = writeln!(out, "  [ Testing API... ]");
            }
            state => {
                let disabled = if self.countdown().is_expired() { " (disabled)" } else { "" };
                let _ = writeln!(out, "  [ Test Google Calendar API ]{disabled}");
                if let ApiTestState::Done(payload) = state {
                    let _ = writeln!(out, "  API Response  200 OK");
                    if let Ok(json) = payload.to_pretty_json() {
                        for line in json.lines() {
                            let _ = writeln!(out, "    {line}");
                        }
                    }
                }
            }
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "Debug Information");
        let _ = writeln!(out, "  Auth Status: {}", self.status().label());
        let _ = writeln!(out, "  Token Type:  {TOKEN_TYPE}");
        let _ = writeln!(out, "  Scope:       {TOKEN_SCOPE}");
        let _ = writeln!(out, "  Provider:    {PROVIDER_NAME}");
        out
    }
}

impl Drop for DashboardScreen {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.emitter.emit(EventPayload::Unmounted);
    }
}

fn is_running(task: &Option<TimerHandle>) -> bool {
    task.as_ref().is_some_and(|handle| !handle.is_finished())
}

/// Publish the remaining time once per tick until the token expires.
///
/// After expiry the timer stops; a refreshed token restarts it.
async fn run_countdown(
    clock: Arc<dyn Clock>,
    first_tick: Instant,
    tick: Duration,
    mut token: watch::Receiver<MockToken>,
    countdown: watch::Sender<Countdown>,
    emitter: Emitter,
    cancel: CancellationToken,
) {
    let mut start = first_tick;
    loop {
        let expires_at = token.borrow_and_update().expires_at;
        let mut ticker = tokio::time::interval_at(start, tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let refreshed = loop {
            tokio::select! {
                _ = cancel.cancelled() => return,
                changed = token.changed() => break changed.is_ok(),
                _ = ticker.tick() => {
                    let left = Countdown::between(clock.now(), expires_at);
                    countdown.send_replace(left);
                    if left.is_expired() {
                        emitter.narrate("Token expired");
                        tokio::select! {
                            _ = cancel.cancelled() => return,
                            changed = token.changed() => break changed.is_ok(),
                        }
                    }
                }
            }
        };
        if !refreshed {
            return;
        }

        let expires_at = token.borrow().expires_at;
        countdown.send_replace(Countdown::between(clock.now(), expires_at));
        start = Instant::now() + tick;
    }
}
