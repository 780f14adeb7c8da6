//! Injected diagnostics for the map controller.
//!
//! Controllers write to a [`DiagnosticSink`] handed to them at mount rather
//! than to a global logger. The default [`TracingSink`] forwards to `tracing`;
//! [`RecordingSink`] keeps entries in memory so tests can assert on them.

use std::fmt;

use parking_lot::Mutex;

/// Severity of a diagnostic entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
        };
        f.write_str(s)
    }
}

/// Destination for controller diagnostics.
pub trait DiagnosticSink: Send + Sync {
    /// Record one entry. `mount_id` identifies the controller instance.
    fn record(&self, severity: Severity, mount_id: u64, message: &str);
}

/// Forwards diagnostics to `tracing` under the `ridemap::map` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, severity: Severity, mount_id: u64, message: &str) {
        match severity {
            Severity::Debug => tracing::debug!(target: "ridemap::map", mount_id, "{}", message),
            Severity::Info => tracing::info!(target: "ridemap::map", mount_id, "{}", message),
            Severity::Warn => tracing::warn!(target: "ridemap::map", mount_id, "{}", message),
            Severity::Error => tracing::error!(target: "ridemap::map", mount_id, "{}", message),
        }
    }
}

/// One captured diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticEntry {
    pub severity: Severity,
    pub mount_id: u64,
    pub message: String,
}

/// Keeps every entry in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    entries: Mutex<Vec<DiagnosticEntry>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all entries so far.
    pub fn entries(&self) -> Vec<DiagnosticEntry> {
        self.entries.lock().clone()
    }

    /// Entries at or above `severity`.
    pub fn at_least(&self, severity: Severity) -> Vec<DiagnosticEntry> {
        self.entries
            .lock()
            .iter()
            .filter(|e| e.severity >= severity)
            .cloned()
            .collect()
    }

    /// Whether any entry message contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.entries.lock().iter().any(|e| e.message.contains(needle))
    }
}

impl DiagnosticSink for RecordingSink {
    fn record(&self, severity: Severity, mount_id: u64, message: &str) {
        self.entries.lock().push(DiagnosticEntry {
            severity,
            mount_id,
            message: message.to_string(),
        });
    }
}
