//! User-facing analysis log.
//!
//! Every entry is also emitted as a `tracing` event, so a host with a
//! subscriber installed sees the same messages in its own logs.

use serde::Serialize;
use tracing::{info, warn};

/// How an entry should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackEntry {
    pub severity: Severity,
    pub message: String,
}

/// Ordered feedback messages of one analysis.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Feedback {
    entries: Vec<FeedbackEntry>,
}

impl Feedback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!(target: "voltlab::feedback", "{}", message);
        self.push(Severity::Info, message);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!(target: "voltlab::feedback", "{}", message);
        self.push(Severity::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!(target: "voltlab::feedback", "{}", message);
        self.push(Severity::Error, message);
    }

    fn push(&mut self, severity: Severity, message: String) {
        self.entries.push(FeedbackEntry { severity, message });
    }

    pub fn entries(&self) -> &[FeedbackEntry] {
        &self.entries
    }

    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|e| e.severity == Severity::Error)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_keep_order_and_severity() {
        let mut fb = Feedback::new();
        fb.info("Analyzing circuit");
        fb.success("Circuit is closed");
        fb.error("No power source");

        let severities: Vec<Severity> = fb.entries().iter().map(|e| e.severity).collect();
        assert_eq!(severities, vec![Severity::Info, Severity::Success, Severity::Error]);
        assert_eq!(fb.entries()[1].message, "Circuit is closed");
        assert!(fb.has_errors());
    }

    #[test]
    fn test_no_errors_by_default() {
        let fb = Feedback::new();
        assert!(fb.is_empty());
        assert!(!fb.has_errors());
    }
}
