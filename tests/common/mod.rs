//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use ocserv_log::telemetry::{Severity, Sink, SinkBackend, SinkMode};

/// Lines captured by a [`Recorder`].
pub type Lines = Arc<Mutex<Vec<(Severity, String)>>>;

/// Backend that keeps every line in memory.
pub struct Recorder(pub Lines);

impl SinkBackend for Recorder {
    fn mode(&self) -> SinkMode {
        SinkMode::Stderr
    }

    fn emit(&self, severity: Severity, line: &str) {
        self.0.lock().unwrap().push((severity, line.to_string()));
    }
}

/// A sink over a fresh recorder.
pub fn recording_sink() -> (Sink, Lines) {
    let lines = Lines::default();
    (Sink::with_backend(Box::new(Recorder(lines.clone()))), lines)
}
