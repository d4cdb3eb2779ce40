//! Shared test helpers: event collection and screen contexts.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use oauth_academy::config::AcademyConfig;
use oauth_academy::events::{AcademyEvent, EventPayload, EventSink, Toast};
use oauth_academy::router::{Navigation, Navigator};
use oauth_academy::screens::ScreenContext;

/// Collects every event delivered to its sink.
#[derive(Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<AcademyEvent>>>,
}

impl EventLog {
    pub fn sink(&self) -> EventSink {
        let events = self.events.clone();
        Arc::new(move |event: AcademyEvent| events.lock().unwrap().push(event))
    }

    pub fn events(&self) -> Vec<AcademyEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.events()
            .into_iter()
            .filter_map(|event| match event.payload {
                EventPayload::Toast { toast } => Some(toast),
                _ => None,
            })
            .collect()
    }

    pub fn narrations(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event.payload {
                EventPayload::Narration { message } => Some(message),
                _ => None,
            })
            .collect()
    }
}

/// A screen context wired to an event log and a navigation receiver.
pub fn context(
    config: AcademyConfig,
) -> (ScreenContext, mpsc::UnboundedReceiver<Navigation>, EventLog) {
    let (navigator, navigations) = Navigator::channel();
    let log = EventLog::default();
    let ctx = ScreenContext::new(config, navigator).with_event_sink(log.sink());
    (ctx, navigations, log)
}
