//! Catch-all screen for unknown paths.

use super::ScreenContext;
use crate::events::{Emitter, EventPayload};
use crate::router::{Navigator, Route, ScreenKind};

#[derive(Debug)]
pub struct NotFoundScreen {
    path: String,
    navigator: Navigator,
    emitter: Emitter,
}

impl NotFoundScreen {
    pub fn mount(ctx: &ScreenContext, path: impl Into<String>) -> Self {
        let path = path.into();
        let emitter = ctx.emitter(ScreenKind::NotFound);
        emitter.emit(EventPayload::Mounted);
        tracing::warn!(%path, "404: user attempted to access non-existent route");
        Self {
            path,
            navigator: ctx.navigator.clone(),
            emitter,
        }
    }

    /// The unknown path that was requested.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The "Return to Home" action.
    pub fn return_home(&self) {
        self.navigator.navigate(Route::Landing);
    }

    pub fn render(&self) -> String {
        format!(
            "404\nOops! Page not found: {}\n  [ Return to Home ]\n",
            self.path
        )
    }
}

impl Drop for NotFoundScreen {
    fn drop(&mut self) {
        self.emitter.emit(EventPayload::Unmounted);
    }
}
