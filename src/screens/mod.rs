//! The simulated app's screens.
//!
//! Each screen is mounted with a [`ScreenContext`], owns its timers, and
//! cancels them when dropped. Screens never navigate directly; they ask the
//! app shell through the context's [`Navigator`].

pub mod callback;
pub mod dashboard;
pub mod guard;
pub mod landing;
pub mod not_found;
pub mod status;

pub use callback::{CallbackScreen, CallbackState, FlowStatus};
pub use dashboard::{ApiTestState, CopyOutcome, DashboardScreen};
pub use guard::{GuardDecision, ProtectedRoute};
pub use landing::LandingScreen;
pub use not_found::NotFoundScreen;
pub use status::AuthStatus;

use std::fmt;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;

use crate::clipboard::{Clipboard, MemoryClipboard};
use crate::config::AcademyConfig;
use crate::events::{Emitter, EventSink};
use crate::router::{Navigator, ScreenKind};
use crate::util::{Clock, TokioClock};

/// Everything a screen needs from its surroundings.
#[derive(Clone)]
pub struct ScreenContext {
    pub config: Arc<AcademyConfig>,
    pub clock: Arc<dyn Clock>,
    pub clipboard: Arc<dyn Clipboard>,
    pub navigator: Navigator,
    sink: Option<EventSink>,
    seq: Arc<AtomicU64>,
}

impl fmt::Debug for ScreenContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScreenContext")
            .field("config", &self.config)
            .field("clock", &self.clock)
            .field("navigator", &self.navigator)
            .field("sink", &self.sink.as_ref().map(|_| ".."))
            .finish()
    }
}

impl ScreenContext {
    /// Context with a tokio-anchored clock and an in-memory clipboard.
    pub fn new(config: AcademyConfig, navigator: Navigator) -> Self {
        Self {
            config: Arc::new(config),
            clock: Arc::new(TokioClock::new()),
            clipboard: Arc::new(MemoryClipboard::new()),
            navigator,
            sink: None,
            seq: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_clipboard(mut self, clipboard: Arc<dyn Clipboard>) -> Self {
        self.clipboard = clipboard;
        self
    }

    pub fn with_event_sink(mut self, sink: EventSink) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn emitter(&self, screen: ScreenKind) -> Emitter {
        Emitter::new(
            screen,
            self.sink.clone(),
            self.clock.clone(),
            self.seq.clone(),
        )
    }
}
