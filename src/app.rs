//! App shell: owns the mounted screen and follows navigation requests.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::clipboard::Clipboard;
use crate::config::AcademyConfig;
use crate::events::{EventPayload, EventSink};
use crate::router::{Navigation, Navigator, Route, ScreenKind};
use crate::screens::{
    CallbackScreen, DashboardScreen, FlowStatus, LandingScreen, NotFoundScreen, ProtectedRoute,
    ScreenContext,
};
use crate::util::Clock;

/// The currently mounted screen.
#[derive(Debug)]
pub enum Mounted {
    Landing(LandingScreen),
    Callback(CallbackScreen),
    /// `/dashboard`: the guard, whose dashboard child is never mounted.
    Protected(ProtectedRoute),
    NotFound(NotFoundScreen),
}

impl Mounted {
    pub fn kind(&self) -> ScreenKind {
        match self {
            Self::Landing(_) => ScreenKind::Landing,
            Self::Callback(_) => ScreenKind::Callback,
            Self::Protected(_) => ScreenKind::Guard,
            Self::NotFound(_) => ScreenKind::NotFound,
        }
    }

    pub fn render(&self) -> String {
        match self {
            Self::Landing(screen) => screen.render(),
            Self::Callback(screen) => screen.render(),
            Self::Protected(guard) => guard.render(|| {
                // Unreachable while the guard is stuck loading.
                "Dashboard".to_string()
            }),
            Self::NotFound(screen) => screen.render(),
        }
    }
}

/// Single-page app simulator.
///
/// # Example
/// ```no_run
/// use oauth_academy::app::App;
/// use oauth_academy::config::AcademyConfig;
/// use oauth_academy::router::Route;
///
/// # async fn example() -> oauth_academy::error::Result<()> {
/// let mut app = App::new(AcademyConfig::default());
/// app.open(Route::parse("/callback?code=abc")?);
/// let next = app.follow().await; // Some(Route::Dashboard) after ~3.5s
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct App {
    ctx: ScreenContext,
    navigations: mpsc::UnboundedReceiver<Navigation>,
    current: Option<Mounted>,
    history: Vec<Route>,
    generation: u64,
    /// A live navigation pulled off the channel by [`App::awaiting_navigation`].
    queued: Option<Navigation>,
}

impl App {
    pub fn new(config: AcademyConfig) -> Self {
        let (navigator, navigations) = Navigator::channel();
        Self {
            ctx: ScreenContext::new(config, navigator),
            navigations,
            current: None,
            history: Vec::new(),
            generation: 0,
            queued: None,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.ctx = self.ctx.with_clock(clock);
        self
    }

    pub fn with_clipboard(mut self, clipboard: Arc<dyn Clipboard>) -> Self {
        self.ctx = self.ctx.with_clipboard(clipboard);
        self
    }

    pub fn with_event_sink(mut self, sink: EventSink) -> Self {
        self.ctx = self.ctx.with_event_sink(sink);
        self
    }

    pub fn context(&self) -> &ScreenContext {
        &self.ctx
    }

    /// Tear down the current screen, then mount the one for `route`.
    pub fn open(&mut self, route: Route) -> &mut Mounted {
        self.navigate(Navigation {
            to: route,
            replace: false,
            generation: self.generation,
        })
    }

    fn navigate(&mut self, navigation: Navigation) -> &mut Mounted {
        let Navigation { to, replace, .. } = navigation;
        let from = self.history.last().cloned();
        tracing::debug!(from = ?from.as_ref().map(Route::to_target), to = %to, replace, "navigate");

        // Drop first so the old screen's timers are cancelled before the new one starts.
        self.current = None;
        self.queued = None;
        while let Ok(stale) = self.navigations.try_recv() {
            tracing::debug!(to = %stale.to, "discarding navigation from unmounted screen");
        }
        self.generation += 1;
        self.ctx.navigator = self.ctx.navigator.for_generation(self.generation);

        if replace {
            self.history.pop();
        }
        self.history.push(to.clone());

        let mounted = match &to {
            Route::Landing => Mounted::Landing(LandingScreen::mount(&self.ctx)),
            Route::Callback(params) => {
                Mounted::Callback(CallbackScreen::mount(&self.ctx, params.clone()))
            }
            Route::Dashboard => Mounted::Protected(ProtectedRoute::mount(&self.ctx)),
            Route::NotFound { path } => Mounted::NotFound(NotFoundScreen::mount(&self.ctx, path)),
        };
        self.ctx
            .emitter(mounted.kind())
            .emit(EventPayload::Navigated { from, to });
        self.current.insert(mounted)
    }

    /// Wait for the mounted screen to ask for navigation, then perform it.
    ///
    /// Requests from screens that were already torn down are dropped.
    /// Pends forever if nothing will navigate (see [`App::awaiting_navigation`]).
    pub async fn follow(&mut self) -> Option<Route> {
        let navigation = match self.queued.take() {
            Some(navigation) => navigation,
            None => loop {
                let navigation = self.navigations.recv().await?;
                if self.is_current(&navigation) {
                    break navigation;
                }
                tracing::debug!(to = %navigation.to, "discarding navigation from unmounted screen");
            },
        };
        let route = navigation.to.clone();
        self.navigate(navigation);
        Some(route)
    }

    /// Whether the mounted screen has asked, or has a timer that will ask,
    /// for navigation.
    pub fn awaiting_navigation(&mut self) -> bool {
        while self.queued.is_none() {
            match self.navigations.try_recv() {
                Ok(navigation) if self.is_current(&navigation) => self.queued = Some(navigation),
                Ok(stale) => {
                    tracing::debug!(to = %stale.to, "discarding navigation from unmounted screen")
                }
                Err(_) => break,
            }
        }
        if self.queued.is_some() {
            return true;
        }
        match &self.current {
            Some(Mounted::Landing(landing)) => landing.login_in_progress(),
            Some(Mounted::Callback(callback)) => callback.status() != FlowStatus::Error,
            _ => false,
        }
    }

    fn is_current(&self, navigation: &Navigation) -> bool {
        navigation.generation == self.generation
    }

    /// The route of the mounted screen.
    pub fn route(&self) -> Option<&Route> {
        self.history.last()
    }

    /// Every route visited, oldest first.
    pub fn history(&self) -> &[Route] {
        &self.history
    }

    /// The mounted screen, if any.
    pub fn current(&self) -> Option<&Mounted> {
        self.current.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut Mounted> {
        self.current.as_mut()
    }

    /// Mount a dashboard outside the guard, for exploring its actions.
    pub fn unguarded_dashboard(&self) -> DashboardScreen {
        DashboardScreen::mount(&self.ctx)
    }

    pub fn render(&self) -> String {
        self.current
            .as_ref()
            .map(Mounted::render)
            .unwrap_or_default()
    }
}
