//! Telemetry error types.

use thiserror::Error;

/// Errors that can occur while setting up the log sink.
///
/// Log calls themselves never fail; these only surface during startup.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Failed to connect to syslog.
    #[error("Failed to connect to syslog: {0}")]
    SyslogConnection(String),

    /// A process-wide sink is already installed.
    #[error("Log sink already initialized")]
    AlreadyInitialized,
}
