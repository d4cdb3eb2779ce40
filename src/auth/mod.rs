//! Mock identity data: users, tokens and the token endpoint response.
//!
//! Nothing here is cryptographic. Values are placeholders for display.

pub mod random;
pub mod token;
pub mod user;

pub use token::{Countdown, MockToken, TokenResponse};
pub use user::MockUser;
