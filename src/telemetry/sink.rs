//! Sink routing: system log or standard error.
//!
//! The sink mode is fixed when the process builds its [`Sink`] and never
//! changes afterwards. Every log call ends here after filtering, so nothing in
//! this module inspects priorities or thresholds.

use std::fmt;
use std::io::Write;
use std::sync::{Mutex, OnceLock};

use syslog::{Facility, Formatter3164};
use tracing::{debug, error};

use super::buffer::BoundedBuf;
use super::error::TelemetryError;
use super::priority::Severity;

/// Default syslog process tag.
pub const SYSLOG_TAG: &str = "ocserv";

/// Size of the rendered line buffer, terminator included. Fits the longest
/// tag, a full identity and a full body, with the rest left for the address.
pub const LINE_CAPACITY: usize = 1024;

/// Process-wide sink, installed once during startup.
static SINK: OnceLock<Sink> = OnceLock::new();

/// Where finished lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkMode {
    /// The local syslog daemon.
    Syslog,
    /// The process's standard error stream.
    Stderr,
}

/// One fully filtered log line on its way to the sink.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    /// Channel tag (`worker`, `main`, `sec-mod`).
    pub tag: &'a str,
    /// Identity prefix, possibly empty.
    pub identity: &'a str,
    /// Address token placed between the identity and the body.
    pub address: Option<AddressToken<'a>>,
    /// Formatted message body.
    pub body: &'a str,
    /// Severity to report.
    pub severity: Severity,
}

/// How a channel lays out the remote address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressToken<'a> {
    /// `"<tag><identity>: <address> <body>"`
    Spaced(&'a str),
    /// `"<tag><identity>:<address> <body>"`
    Attached(&'a str),
}

impl fmt::Display for Record<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}:", self.tag, self.identity)?;
        match self.address {
            Some(AddressToken::Spaced(addr)) => write!(f, " {addr} {}", self.body),
            Some(AddressToken::Attached(addr)) => write!(f, "{addr} {}", self.body),
            None => write!(f, " {}", self.body),
        }
    }
}

/// Destination for rendered lines.
pub trait SinkBackend: Send + Sync {
    /// The mode this backend implements.
    fn mode(&self) -> SinkMode;

    /// Write one line. Failures are the backend's to report; they never reach
    /// the caller of a log function.
    fn emit(&self, severity: Severity, line: &str);
}

/// Writes to syslog over the local Unix socket.
pub struct SyslogBackend {
    writer: Mutex<syslog::Logger<syslog::LoggerBackend, Formatter3164>>,
}

impl SyslogBackend {
    /// Connect to the local syslog daemon.
    pub fn connect(facility: Facility, process: &str) -> Result<Self, TelemetryError> {
        let formatter = Formatter3164 {
            facility,
            hostname: None,
            process: process.to_string(),
            pid: std::process::id(),
        };

        let writer = syslog::unix(formatter)
            .map_err(|e| TelemetryError::SyslogConnection(e.to_string()))?;

        debug!("Connected to syslog as '{}'", process);
        Ok(Self {
            writer: Mutex::new(writer),
        })
    }
}

impl SinkBackend for SyslogBackend {
    fn mode(&self) -> SinkMode {
        SinkMode::Syslog
    }

    fn emit(&self, severity: Severity, line: &str) {
        let mut writer = match self.writer.lock() {
            Ok(writer) => writer,
            Err(e) => {
                error!("Failed to acquire syslog writer lock: {}", e);
                return;
            }
        };

        let result = match severity {
            Severity::Error => writer.err(line),
            Severity::Warning => writer.warning(line),
            Severity::Notice => writer.notice(line),
            Severity::Info => writer.info(line),
            Severity::Debug => writer.debug(line),
        };

        if let Err(e) = result {
            error!("Failed to write to syslog: {}", e);
        }
    }
}

/// Writes one line per record to standard error. Severity is not encoded.
pub struct StderrBackend {
    stream: Mutex<Box<dyn Write + Send>>,
}

impl StderrBackend {
    /// Write to the process's standard error.
    pub fn new() -> Self {
        Self::with_writer(Box::new(std::io::stderr()))
    }

    /// Write to an arbitrary stream in place of standard error.
    pub fn with_writer(stream: Box<dyn Write + Send>) -> Self {
        Self {
            stream: Mutex::new(stream),
        }
    }
}

impl Default for StderrBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SinkBackend for StderrBackend {
    fn mode(&self) -> SinkMode {
        SinkMode::Stderr
    }

    fn emit(&self, _severity: Severity, line: &str) {
        let Ok(mut stream) = self.stream.lock() else {
            return;
        };
        // Nowhere left to report a failing stderr.
        let _ = writeln!(stream, "{line}").and_then(|()| stream.flush());
    }
}

/// The process's log sink.
pub struct Sink {
    backend: Box<dyn SinkBackend>,
}

impl Sink {
    /// A sink writing to standard error.
    pub fn stderr() -> Self {
        Self::with_backend(Box::new(StderrBackend::new()))
    }

    /// A sink connected to the local syslog daemon.
    pub fn syslog(facility: Facility, process: &str) -> Result<Self, TelemetryError> {
        Ok(Self::with_backend(Box::new(SyslogBackend::connect(
            facility, process,
        )?)))
    }

    /// A sink over a custom backend.
    pub fn with_backend(backend: Box<dyn SinkBackend>) -> Self {
        Self { backend }
    }

    /// The mode chosen at construction.
    pub fn mode(&self) -> SinkMode {
        self.backend.mode()
    }

    /// Render and deliver a record. No filtering happens here.
    ///
    /// The line is rendered on the stack; an oversized address is truncated.
    pub fn route(&self, record: &Record<'_>) {
        let mut line = BoundedBuf::<LINE_CAPACITY>::new();
        let _ = fmt::Write::write_fmt(&mut line, format_args!("{record}"));
        self.backend.emit(record.severity, line.as_str());
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sink").field("mode", &self.mode()).finish()
    }
}

/// Install the process-wide sink.
///
/// Must happen before any thread that logs is started. Fails if a sink is
/// already installed, including the stderr fallback pinned by an earlier
/// call to [`sink`].
pub fn init_sink(sink: Sink) -> Result<(), TelemetryError> {
    let mode = sink.mode();
    SINK.set(sink)
        .map_err(|_| TelemetryError::AlreadyInitialized)?;
    debug!("Installed {:?} log sink", mode);
    Ok(())
}

/// The process-wide sink.
///
/// If startup never installed one, standard error is pinned as the sink for
/// the rest of the process.
pub fn sink() -> &'static Sink {
    SINK.get_or_init(Sink::stderr)
}

/// The process-wide sink, if one has been installed or pinned.
pub fn try_sink() -> Option<&'static Sink> {
    SINK.get()
}
