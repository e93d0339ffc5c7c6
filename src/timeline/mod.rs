//! Timeline reconstruction: folds a batch's events into per-pod records.
//!
//! Records are kept in first-seen order. That order, not the order in which pods
//! were scheduled, defines which pod counts as "previous" when deriving queue times.

pub mod record;

use indexmap::IndexMap;
use log::{debug, trace};

use crate::parser::{Event, EventKind};

pub use record::{PodRecord, seconds_between};

/// Order-preserving map of pod id to [`PodRecord`] for one batch.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    pods: IndexMap<String, PodRecord>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a timeline from events in log-emission order.
    pub fn from_events<I>(events: I) -> Self
    where
        I: IntoIterator<Item = Event>,
    {
        let mut timeline = Self::new();
        for event in events {
            timeline.record(event);
        }
        timeline
    }

    /// Folds one event into the timeline.
    ///
    /// `Created`/`Scheduled` events create the pod's record on first sight; repeated
    /// events of the same kind are dropped. Other kinds are ignored entirely.
    pub fn record(&mut self, event: Event) {
        let Event {
            timestamp,
            kind,
            pod_id,
            node_id,
        } = event;

        let stored = match &kind {
            EventKind::Created => self
                .pods
                .entry(pod_id.clone())
                .or_default()
                .record_creation(timestamp),
            EventKind::Scheduled => self
                .pods
                .entry(pod_id.clone())
                .or_default()
                .record_scheduling(timestamp, node_id),
            EventKind::Other(name) => {
                trace!("ignoring {name} event for {pod_id}");
                return;
            }
        };

        if !stored {
            debug!("duplicate {} event for {pod_id} dropped", kind.as_str());
        }
    }

    pub fn len(&self) -> usize {
        self.pods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pods.is_empty()
    }

    pub fn get(&self, pod_id: &str) -> Option<&PodRecord> {
        self.pods.get(pod_id)
    }

    /// Records in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PodRecord)> {
        self.pods.iter().map(|(id, record)| (id.as_str(), record))
    }

    pub fn records(&self) -> impl Iterator<Item = &PodRecord> {
        self.pods.values()
    }

    /// Number of pods with both timestamps.
    pub fn complete_count(&self) -> usize {
        self.pods.values().filter(|r| r.complete().is_some()).count()
    }
}
