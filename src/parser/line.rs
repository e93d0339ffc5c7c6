//! Positional parser for pod event log lines.
//!
//! Log lines are comma/space delimited with a fixed field layout:
//!
//! ```text
//! <t0> <t1> <t2> <t3> <EventKind> <t5> <PodID> <t7> <t8> <t9> [<NodeID>] <t11> <EpochTimestamp> ...
//! ```
//!
//! Commas are stripped before splitting on whitespace, so `"pod-a,"` and `"pod-a"`
//! yield the same token.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::parser::event::{Event, EventKind};

const KIND_TOKEN: usize = 4;
const POD_TOKEN: usize = 6;
const NODE_TOKEN: usize = 10;
const TIMESTAMP_TOKEN: usize = 12;

/// Minimum number of tokens a parsable line carries.
pub const MIN_TOKENS: usize = TIMESTAMP_TOKEN + 1;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MalformedLineError {
    #[error("expected at least {min} tokens, found {found}", min = MIN_TOKENS)]
    TooFewTokens { found: usize },
    #[error("invalid epoch timestamp `{token}`")]
    InvalidTimestamp { token: String },
}

/// Parses one raw log line into an [`Event`].
///
/// The timestamp token is read as floating-point Unix seconds (UTC) and kept at
/// microsecond resolution. The node token is only read for `Scheduled` events.
pub fn parse_line(line: &str) -> Result<Event, MalformedLineError> {
    let cleaned = line.replace(',', "");
    let tokens: Vec<&str> = cleaned.split_whitespace().collect();

    if tokens.len() < MIN_TOKENS {
        return Err(MalformedLineError::TooFewTokens {
            found: tokens.len(),
        });
    }

    let kind = EventKind::from_token(tokens[KIND_TOKEN]);
    let node_id = match kind {
        EventKind::Scheduled => Some(tokens[NODE_TOKEN].to_string()),
        _ => None,
    };
    let timestamp = parse_epoch(tokens[TIMESTAMP_TOKEN])?;

    Ok(Event {
        timestamp,
        kind,
        pod_id: tokens[POD_TOKEN].to_string(),
        node_id,
    })
}

/// Converts epoch seconds (e.g. `1718035642.123456`) to a UTC timestamp,
/// rounded to the nearest microsecond.
pub fn parse_epoch(token: &str) -> Result<DateTime<Utc>, MalformedLineError> {
    let invalid = || MalformedLineError::InvalidTimestamp {
        token: token.to_string(),
    };

    let secs: f64 = token.parse().map_err(|_| invalid())?;
    if !secs.is_finite() {
        return Err(invalid());
    }

    let micros = (secs * 1_000_000.0).round();
    if micros < i64::MIN as f64 || micros > i64::MAX as f64 {
        return Err(invalid());
    }

    DateTime::from_timestamp_micros(micros as i64).ok_or_else(invalid)
}
