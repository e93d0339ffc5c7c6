//! Structured pod events extracted from cluster event logs.

use chrono::{DateTime, Utc};

/// Kind of a pod lifecycle event (token 4 of a log line).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// Pod object created by the controller.
    Created,
    /// Pod bound to a node by the scheduler.
    Scheduled,
    /// Any other event reason (Pulled, Started, Killing, ...). Ignored by the timeline.
    Other(String),
}

impl EventKind {
    pub fn from_token(token: &str) -> Self {
        match token {
            "Created" => EventKind::Created,
            "Scheduled" => EventKind::Scheduled,
            other => EventKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            EventKind::Created => "Created",
            EventKind::Scheduled => "Scheduled",
            EventKind::Other(name) => name,
        }
    }
}

/// One observed log occurrence.
///
/// `node_id` is only populated for `Scheduled` events.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub timestamp: DateTime<Utc>,
    pub kind: EventKind,
    pub pod_id: String,
    pub node_id: Option<String>,
}
