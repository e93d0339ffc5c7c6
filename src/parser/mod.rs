// Line Parser: turns one raw pod-event log line into a structured Event.
// Lines are selected per batch with a PodPrefix before they reach parse_line;
// anything that fails to parse after matching the prefix is a schema mismatch.

pub mod event;
pub mod line;
pub mod prefix;

pub use event::{Event, EventKind};
pub use line::{MalformedLineError, parse_line};
pub use prefix::PodPrefix;
