//! Route guard for protected routes.
//!
//! The intended contract is to hold protected content back until an
//! authentication check completes, then render it or redirect home. No
//! check exists, so the guard is fixed in its loading state and never
//! renders its children.

use super::ScreenContext;
use crate::events::{Emitter, EventPayload};
use crate::router::{Route, ScreenKind};

pub const CHECKING_MESSAGE: &str = "Checking authentication...";

/// What the guard does with its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Loading,
    Redirect(Route),
    Allow,
}

#[derive(Debug)]
pub struct ProtectedRoute {
    is_loading: bool,
    is_authenticated: bool,
    emitter: Emitter,
}

impl ProtectedRoute {
    pub fn mount(ctx: &ScreenContext) -> Self {
        Self::with_state(ctx, true, false)
    }

    fn with_state(ctx: &ScreenContext, is_loading: bool, is_authenticated: bool) -> Self {
        let emitter = ctx.emitter(ScreenKind::Guard);
        emitter.emit(EventPayload::Mounted);
        emitter.narrate(CHECKING_MESSAGE);
        Self {
            is_loading,
            is_authenticated,
            emitter,
        }
    }

    /// What to do with the protected children right now.
    pub fn decide(&self) -> GuardDecision {
        if self.is_loading {
            return GuardDecision::Loading;
        }
        if !self.is_authenticated {
            return GuardDecision::Redirect(Route::Landing);
        }
        GuardDecision::Allow
    }

    /// Render `children` only if the guard allows it. Children are built
    /// lazily so a blocked screen is never mounted.
    pub fn render<F>(&self, children: F) -> String
    where
        F: FnOnce() -> String,
    {
        match self.decide() {
            GuardDecision::Loading => format!("… {CHECKING_MESSAGE}\n"),
            GuardDecision::Redirect(route) => format!("Redirecting to {route}\n"),
            GuardDecision::Allow => children(),
        }
    }
}

impl Drop for ProtectedRoute {
    fn drop(&mut self) {
        self.emitter.emit(EventPayload::Unmounted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AcademyConfig;
    use crate::router::Navigator;

    fn ctx() -> ScreenContext {
        let (navigator, _rx) = Navigator::channel();
        ScreenContext::new(AcademyConfig::default(), navigator)
    }

    #[test]
    fn mounted_guard_never_renders_children() {
        let guard = ProtectedRoute::mount(&ctx());
        assert_eq!(guard.decide(), GuardDecision::Loading);
        let mut rendered_children = false;
        let text = guard.render(|| {
            rendered_children = true;
            "dashboard".to_string()
        });
        assert!(!rendered_children);
        assert!(text.contains(CHECKING_MESSAGE));
    }

    #[test]
    fn finished_check_redirects_or_allows() {
        let ctx = ctx();
        let anonymous = ProtectedRoute::with_state(&ctx, false, false);
        assert_eq!(anonymous.decide(), GuardDecision::Redirect(Route::Landing));
        let signed_in = ProtectedRoute::with_state(&ctx, false, true);
        assert_eq!(signed_in.render(|| "dashboard".to_string()), "dashboard");
    }
}
