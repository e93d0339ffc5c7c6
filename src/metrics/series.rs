//! Derivation of start-up latency, queue time and scheduling latency series.

use chrono::{DateTime, Utc};
use log::{debug, warn};

use crate::timeline::{PodRecord, Timeline, seconds_between};

/// Per-pod metric series of one batch, in record (first-seen) order.
///
/// `queue_times` is always as long as `durations`: the first complete pod with no
/// earlier scheduling to compare against contributes a `0.0` entry.
/// `scheduling_latencies[k]` is `durations[k + 1] - queue_times[k]`, i.e. each pod's
/// start-up latency reduced by the queue time of the pod before it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricSeries {
    pub durations: Vec<f64>,
    pub queue_times: Vec<f64>,
    pub scheduling_latencies: Vec<f64>,
}

impl MetricSeries {
    pub fn from_timeline(timeline: &Timeline) -> Self {
        Self::from_records(timeline.records())
    }

    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a PodRecord>,
    {
        let (durations, queue_times) = startup_and_queue_times(records);
        let scheduling_latencies = scheduling_latencies(&durations, &queue_times);
        Self {
            durations,
            queue_times,
            scheduling_latencies,
        }
    }

    /// Number of complete pod records the series was built from.
    pub fn len(&self) -> usize {
        self.durations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }
}

/// Walks the records once, carrying the previous scheduling timestamp across every
/// pod that has one (complete or not).
///
/// A pod created before the previous pod was scheduled had to wait for the
/// scheduler; the part of its start-up latency not explained by the gap between
/// the two schedulings is its queue time.
pub(crate) fn startup_and_queue_times<'a, I>(records: I) -> (Vec<f64>, Vec<f64>)
where
    I: IntoIterator<Item = &'a PodRecord>,
{
    let mut durations = Vec::new();
    let mut queue_times = Vec::new();
    let mut previous_scheduled: Option<DateTime<Utc>> = None;

    for record in records {
        if let Some((created, scheduled)) = record.complete() {
            let startup = seconds_between(created, scheduled);
            if startup < 0.0 {
                warn!(
                    "pod scheduled {:.6}s before it was created (node {:?}); keeping negative latency",
                    -startup, record.node_id
                );
            }

            let queue = match previous_scheduled {
                Some(previous) if created < previous => {
                    startup - seconds_between(previous, scheduled)
                }
                _ => 0.0,
            };
            debug!("startup={startup:.6}s queue={queue:.6}s");

            durations.push(startup);
            queue_times.push(queue);
        }

        if let Some(scheduled) = record.scheduled_time {
            previous_scheduled = Some(scheduled);
        }
    }

    (durations, queue_times)
}

/// `durations[i] - queue_times[i - 1]` for every `i` from 1.
pub fn scheduling_latencies(durations: &[f64], queue_times: &[f64]) -> Vec<f64> {
    durations
        .iter()
        .skip(1)
        .zip(queue_times)
        .map(|(duration, previous_queue)| duration - previous_queue)
        .collect()
}
