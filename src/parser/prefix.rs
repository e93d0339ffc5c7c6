//! Batch selection by pod-name prefix.

use std::fmt;

/// Pod-name prefix (`hello-<N>-`) selecting the log lines of one instance-count batch.
///
/// A match must start at a name boundary: `hello-1-` selects `hello-1-abc` and
/// `pod/hello-1-abc` but not `othello-1-abc`. The trailing `-` keeps `hello-1-`
/// from selecting `hello-10-abc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodPrefix {
    instances: u32,
    pattern: String,
}

impl PodPrefix {
    pub fn new(instances: u32) -> Self {
        Self {
            instances,
            pattern: format!("hello-{instances}-"),
        }
    }

    pub fn instances(&self) -> u32 {
        self.instances
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// True if the line mentions a pod of this batch.
    pub fn matches(&self, line: &str) -> bool {
        line.match_indices(&self.pattern).any(|(idx, _)| {
            line[..idx]
                .chars()
                .next_back()
                .is_none_or(|c| !is_name_char(c))
        })
    }
}

impl fmt::Display for PodPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

// Characters that may appear inside a pod name.
fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')
}
