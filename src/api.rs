//! Canned "protected resource" returned by the dashboard's API test.

use serde::{Deserialize, Serialize};

/// Calendar events listing, shaped like the Google Calendar API response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarPayload {
    pub kind: String,
    pub summary: String,
    pub items: Vec<CalendarEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub summary: String,
    pub start: EventTime,
    pub end: EventTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTime {
    #[serde(rename = "dateTime")]
    pub date_time: String,
}

impl EventTime {
    fn at(date_time: &str) -> Self {
        Self {
            date_time: date_time.to_string(),
        }
    }
}

impl CalendarPayload {
    /// The fixed two-event demo calendar.
    pub fn demo() -> Self {
        Self {
            kind: "calendar#events".to_string(),
            summary: "Demo Calendar".to_string(),
            items: vec![
                CalendarEvent {
                    id: "event1".to_string(),
                    summary: "OAuth 2.0 Study Session".to_string(),
                    start: EventTime::at("2025-10-17T10:00:00Z"),
                    end: EventTime::at("2025-10-17T11:00:00Z"),
                },
                CalendarEvent {
                    id: "event2".to_string(),
                    summary: "React Learning".to_string(),
                    start: EventTime::at("2025-10-18T14:00:00Z"),
                    end: EventTime::at("2025-10-18T15:30:00Z"),
                },
            ],
        }
    }

    pub fn to_pretty_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
