//! Per-pod timing record.

use chrono::{DateTime, Utc};

/// Creation and scheduling timestamps of one pod within a batch.
///
/// Each timestamp is written at most once; the first event of a kind wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PodRecord {
    pub creation_time: Option<DateTime<Utc>>,
    pub scheduled_time: Option<DateTime<Utc>>,
    pub node_id: Option<String>,
}

impl PodRecord {
    /// Records the creation time unless one is already set. Returns whether it was stored.
    pub fn record_creation(&mut self, at: DateTime<Utc>) -> bool {
        if self.creation_time.is_some() {
            return false;
        }
        self.creation_time = Some(at);
        true
    }

    /// Records the scheduling time and node unless already scheduled.
    pub fn record_scheduling(&mut self, at: DateTime<Utc>, node_id: Option<String>) -> bool {
        if self.scheduled_time.is_some() {
            return false;
        }
        self.scheduled_time = Some(at);
        self.node_id = node_id;
        true
    }

    /// Both timestamps, if the pod was seen created and scheduled.
    pub fn complete(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        self.creation_time.zip(self.scheduled_time)
    }

    /// Start-up latency in fractional seconds. Negative when the scheduled event
    /// carries an earlier timestamp than the creation event.
    pub fn startup_latency(&self) -> Option<f64> {
        self.complete()
            .map(|(created, scheduled)| seconds_between(created, scheduled))
    }
}

/// `to - from` in fractional seconds, at microsecond resolution.
pub fn seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    let delta = to - from;
    match delta.num_microseconds() {
        Some(us) => us as f64 / 1_000_000.0,
        None => delta.num_milliseconds() as f64 / 1_000.0,
    }
}
