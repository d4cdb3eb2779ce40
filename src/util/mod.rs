//! Utility modules: clocks and cancellable timers.

pub mod clock;
pub mod timer;

pub use clock::{Clock, SystemClock, TokioClock};
pub use timer::{Pending, TimerHandle};
