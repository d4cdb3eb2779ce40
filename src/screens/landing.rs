//! Landing screen: entry point that starts the simulated login.

use std::fmt::Write as _;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::status::AuthStatus;
use super::ScreenContext;
use crate::error::{AcademyError, Result};
use crate::events::{Emitter, EventPayload};
use crate::router::{CallbackParams, Route, ScreenKind};
use crate::util::timer::{delay_until, Pending, TimerHandle};

/// Authorization code the simulated provider hands back.
pub const MOCK_AUTH_CODE: &str = "mock_auth_code_12345";

/// One box of the educational flow diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowStep {
    pub id: u8,
    pub title: &'static str,
    pub description: &'static str,
}

pub const FLOW_STEPS: [FlowStep; 6] = [
    FlowStep { id: 1, title: "User Clicks Login", description: "Initiates OAuth flow" },
    FlowStep { id: 2, title: "Redirect to Provider", description: "Google/GitHub auth page" },
    FlowStep { id: 3, title: "User Authorizes", description: "Grants permissions" },
    FlowStep { id: 4, title: "Callback with Code", description: "Returns auth code" },
    FlowStep { id: 5, title: "Exchange Code", description: "Get access token" },
    FlowStep { id: 6, title: "Access Granted", description: "User authenticated" },
];

const WHAT_HAPPENS: [&str; 4] = [
    "You'll be redirected to Google's authorization server",
    "After granting permissions, Google sends an authorization code",
    "The code is exchanged for an access token",
    "You're redirected to the dashboard with your profile information",
];

/// Steps a real client would take, narrated when login starts.
const LOGIN_NARRATION: [&str; 3] = [
    "1. Redirect to Google OAuth URL with client_id, redirect_uri, scope",
    "2. User authenticates and grants permissions",
    "3. Google redirects back to /callback with authorization code",
];

#[derive(Debug)]
pub struct LandingScreen {
    ctx: ScreenContext,
    emitter: Emitter,
    cancel: CancellationToken,
    pending_login: Option<TimerHandle>,
}

impl LandingScreen {
    pub fn mount(ctx: &ScreenContext) -> Self {
        let emitter = ctx.emitter(ScreenKind::Landing);
        emitter.emit(EventPayload::Mounted);
        Self {
            ctx: ctx.clone(),
            emitter,
            cancel: CancellationToken::new(),
            pending_login: None,
        }
    }

    /// Landing never knows about a session.
    pub fn status(&self) -> AuthStatus {
        AuthStatus::Unauthenticated
    }

    /// The six steps of the flow diagram.
    pub fn flow_steps(&self) -> &'static [FlowStep] {
        &FLOW_STEPS
    }

    /// Whether a login redirect is pending.
    pub fn login_in_progress(&self) -> bool {
        self.pending_login
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Start the simulated login: after a short delay the "provider"
    /// redirects to `/callback` with [`MOCK_AUTH_CODE`].
    pub fn login(&mut self) -> Result<Pending<Route>> {
        if self.login_in_progress() {
            return Err(AcademyError::ActionUnavailable(
                "login already in progress".to_string(),
            ));
        }

        self.emitter.narrate("OAuth flow would start here:");
        for step in LOGIN_NARRATION {
            self.emitter.narrate(step);
        }

        let deadline = Instant::now() + self.ctx.config.login_redirect_delay();
        let target = Route::Callback(CallbackParams::with_code(MOCK_AUTH_CODE));
        let navigator = self.ctx.navigator.clone();
        let cancel = self.cancel.clone();
        let (tx, pending) = Pending::channel("login");

        self.pending_login = Some(TimerHandle::spawn(async move {
            if !delay_until(deadline, &cancel).await {
                return;
            }
            navigator.navigate(target.clone());
            let _ = tx.send(target);
        }));
        Ok(pending)
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "OAuth 2.0 Academy {}", self.status().badge());
        let _ = writeln!(out);
        let _ = writeln!(out, "OAuth 2.0 Learning Platform");
        let _ = writeln!(
            out,
            "Understand OAuth 2.0 Authorization Code Flow through interactive demonstration"
        );
        let _ = writeln!(out);
        let _ = writeln!(out, "Get Started: click below to initiate the OAuth 2.0 flow");
        if self.login_in_progress() {
            let _ = writeln!(out, "  [ Redirecting to Google... ]");
        } else {
            let _ = writeln!(out, "  [ Sign in with Google ]");
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "What happens when you click login?");
        for (n, line) in WHAT_HAPPENS.iter().enumerate() {
            let _ = writeln!(out, "  {}. {line}", n + 1);
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "OAuth 2.0 Authorization Flow");
        for step in self.flow_steps() {
            let _ = writeln!(out, "  ({}) {}: {}", step.id, step.title, step.description);
        }
        let _ = writeln!(out, "Educational Demo - No Real Authentication");
        out
    }
}

impl Drop for LandingScreen {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.emitter.emit(EventPayload::Unmounted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AcademyConfig;
    use crate::router::Navigator;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn login_redirects_to_callback_with_mock_code() {
        let (navigator, mut rx) = Navigator::channel();
        let ctx = ScreenContext::new(AcademyConfig::default(), navigator);
        let mut landing = LandingScreen::mount(&ctx);

        let start = Instant::now();
        let route = landing.login().unwrap().wait().await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(1000));
        assert_eq!(route.to_target(), "/callback?code=mock_auth_code_12345");
        assert_eq!(rx.recv().await.unwrap().to, route);
    }

    #[tokio::test(start_paused = true)]
    async fn second_login_while_pending_is_refused() {
        let (navigator, _rx) = Navigator::channel();
        let ctx = ScreenContext::new(AcademyConfig::default(), navigator);
        let mut landing = LandingScreen::mount(&ctx);
        let _pending = landing.login().unwrap();
        assert!(landing.login_in_progress());
        assert!(matches!(landing.login(), Err(AcademyError::ActionUnavailable(_))));
        assert!(landing.render().contains("Redirecting"));
    }

    #[tokio::test(start_paused = true)]
    async fn unmount_cancels_pending_redirect() {
        let (navigator, mut rx) = Navigator::channel();
        let ctx = ScreenContext::new(AcademyConfig::default(), navigator);
        let mut landing = LandingScreen::mount(&ctx);
        let pending = landing.login().unwrap();
        drop(landing);
        assert!(matches!(pending.wait().await, Err(AcademyError::Canceled(_))));
        drop(ctx);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn render_lists_the_six_flow_steps() {
        let (navigator, _rx) = Navigator::channel();
        let landing = LandingScreen::mount(&ScreenContext::new(AcademyConfig::default(), navigator));
        let text = landing.render();
        assert!(text.contains("[✖ Not Authenticated]"));
        assert!(text.contains("(6) Access Granted: User authenticated"));
        assert!(text.contains("Sign in with Google"));
    }
}
