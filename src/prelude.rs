//! Convenience re-exports for common use.

pub use crate::app::{App, Mounted};
pub use crate::auth::{Countdown, MockToken, MockUser, TokenResponse};
pub use crate::clipboard::{Clipboard, MemoryClipboard};
pub use crate::config::AcademyConfig;
pub use crate::error::{AcademyError, Result};
pub use crate::events::{AcademyEvent, EventPayload, EventSink, Toast, ToastLevel};
pub use crate::router::{CallbackParams, Navigation, Route};
pub use crate::screens::{
    ApiTestState, CallbackScreen, CallbackState, CopyOutcome, DashboardScreen, FlowStatus,
    LandingScreen, ProtectedRoute, ScreenContext,
};
