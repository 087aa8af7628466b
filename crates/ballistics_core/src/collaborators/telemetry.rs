//! Optional analytics reporting
//!
//! Nothing is reported unless a sink is installed. Error events are sent at
//! most once per identifier for the lifetime of the session.

use std::collections::HashSet;

/// Severity attached to error events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorSeverity {
    /// Diagnostic detail
    Debug,
    /// Informational
    Info,
    /// Something recoverable went wrong
    Warning,
    /// Something went wrong
    Error,
}

/// Analytics backend
pub trait TelemetrySink {
    /// Record a design event, optionally with a value
    fn design_event(&mut self, event_id: &str, value: Option<f64>);

    /// Record an error event
    fn error_event(&mut self, severity: ErrorSeverity, message: &str);
}

/// Session-side telemetry front end
#[derive(Default)]
pub struct Telemetry {
    sink: Option<Box<dyn TelemetrySink>>,
    sent_errors: HashSet<String>,
}

impl std::fmt::Debug for Telemetry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Telemetry")
            .field("enabled", &self.sink.is_some())
            .field("sent_errors", &self.sent_errors.len())
            .finish()
    }
}

impl Telemetry {
    /// Telemetry that reports to `sink`
    pub fn new(sink: Box<dyn TelemetrySink>) -> Self {
        Self {
            sink: Some(sink),
            sent_errors: HashSet::new(),
        }
    }

    /// Whether a sink is installed
    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Record a design event
    pub fn design_event(&mut self, event_id: &str, value: Option<f64>) {
        if let Some(sink) = self.sink.as_mut() {
            sink.design_event(event_id, value);
        }
    }

    /// Record an error event unless one with the same identifier was already sent
    pub fn error_event_once(&mut self, identifier: &str, severity: ErrorSeverity, message: &str) {
        let Some(sink) = self.sink.as_mut() else {
            return;
        };
        if self.sent_errors.insert(identifier.to_owned()) {
            sink.error_event(severity, message);
        }
    }
}
