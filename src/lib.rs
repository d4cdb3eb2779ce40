//! OAuth 2.0 Academy: an educational simulator of the OAuth 2.0
//! authorization code flow.
//!
//! Nothing here authenticates anyone. Tokens, users and API responses are
//! hard-coded or randomly generated placeholders; no provider is contacted.
//! The crate models the three screens of the demo app (landing, callback,
//! dashboard) as small state machines driven by tokio timers, plus a route
//! guard that never finishes its check.
//!
//! # Quick Start
//!
//! ```no_run
//! use oauth_academy::prelude::*;
//!
//! # async fn example() -> oauth_academy::error::Result<()> {
//! let mut app = App::new(AcademyConfig::default());
//! app.open(Route::parse("/callback?code=mock_auth_code_12345")?);
//! if let Some(Mounted::Callback(callback)) = app.current_mut() {
//!     let state = callback.settled().await;
//!     assert_eq!(state.status, FlowStatus::Success);
//! }
//! assert_eq!(app.follow().await, Some(Route::Dashboard));
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod app;
pub mod auth;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod events;
pub mod prelude;
pub mod router;
pub mod screens;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;
