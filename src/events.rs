//! Event stream types.
//!
//! Screens narrate what a real OAuth flow would be doing at each step. Every
//! narration is logged through `tracing` and, when a sink is installed,
//! delivered as an [`AcademyEvent`].

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::router::{Route, ScreenKind};
use crate::screens::callback::FlowStatus;
use crate::util::Clock;

/// Severity of a user notification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ToastLevel {
    Success,
    Info,
    Error,
}

/// A short user-facing notification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

/// Concrete event payloads emitted by screens and the app shell.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventPayload {
    Mounted,
    Unmounted,
    Narration { message: String },
    Toast { toast: Toast },
    FlowStatusChanged { status: FlowStatus },
    Navigated { from: Option<Route>, to: Route },
}

/// Envelope for events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcademyEvent {
    pub seq: u64,
    pub timestamp: DateTime<Utc>,
    pub screen: ScreenKind,
    pub payload: EventPayload,
}

/// Callback receiving every event.
pub type EventSink = Arc<dyn Fn(AcademyEvent) + Send + Sync>;

/// Per-screen handle that logs and forwards events.
#[derive(Clone)]
pub struct Emitter {
    screen: ScreenKind,
    sink: Option<EventSink>,
    clock: Arc<dyn Clock>,
    seq: Arc<AtomicU64>,
}

impl fmt::Debug for Emitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("screen", &self.screen)
            .field("sink", &self.sink.as_ref().map(|_| ".."))
            .field("seq", &self.seq)
            .finish()
    }
}

impl Emitter {
    pub fn new(
        screen: ScreenKind,
        sink: Option<EventSink>,
        clock: Arc<dyn Clock>,
        seq: Arc<AtomicU64>,
    ) -> Self {
        Self {
            screen,
            sink,
            clock,
            seq,
        }
    }

    pub fn screen(&self) -> ScreenKind {
        self.screen
    }

    pub fn narrate(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!(screen = %self.screen, "{message}");
        self.emit(EventPayload::Narration { message });
    }

    pub fn toast(&self, level: ToastLevel, message: impl Into<String>) {
        let message = message.into();
        match level {
            ToastLevel::Error => tracing::warn!(screen = %self.screen, %level, "{message}"),
            _ => tracing::debug!(screen = %self.screen, %level, "{message}"),
        }
        self.emit(EventPayload::Toast {
            toast: Toast { level, message },
        });
    }

    pub fn emit(&self, payload: EventPayload) {
        let Some(sink) = &self.sink else {
            return;
        };
        let event = AcademyEvent {
            seq: self.seq.fetch_add(1, Ordering::Relaxed),
            timestamp: self.clock.now(),
            screen: self.screen,
            payload,
        };
        sink(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::SystemClock;
    use std::sync::Mutex;

    #[test]
    fn events_are_sequenced_across_emitters() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink: EventSink = {
            let seen = seen.clone();
            Arc::new(move |event: AcademyEvent| seen.lock().unwrap().push(event))
        };
        let seq = Arc::new(AtomicU64::new(0));
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let landing = Emitter::new(ScreenKind::Landing, Some(sink.clone()), clock.clone(), seq.clone());
        let callback = Emitter::new(ScreenKind::Callback, Some(sink), clock, seq);

        landing.narrate("one");
        callback.toast(ToastLevel::Info, "two");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].seq, 0);
        assert_eq!(seen[1].seq, 1);
        assert_eq!(seen[1].screen, ScreenKind::Callback);
        assert!(matches!(
            &seen[1].payload,
            EventPayload::Toast { toast } if toast.message == "two"
        ));
    }

    #[test]
    fn emitting_without_sink_is_a_no_op() {
        let emitter = Emitter::new(
            ScreenKind::Landing,
            None,
            Arc::new(SystemClock),
            Arc::new(AtomicU64::new(0)),
        );
        emitter.narrate("quiet");
    }

    #[test]
    fn payload_serializes_with_type_tag() {
        let json = serde_json::to_value(EventPayload::Narration {
            message: "hi".into(),
        })
        .unwrap();
        assert_eq!(json["type"], "narration");
    }
}
