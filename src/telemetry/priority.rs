//! Priority taxonomy and threshold gating.
//!
//! Callers request one of the standard syslog levels or one of the
//! server-specific debug categories. Standard levels always pass; debug
//! categories are gated by the channel's configured verbosity and most of them
//! are reported to the sink as plain `Debug`.

use std::fmt;
use std::str::FromStr;

/// Minimum verbosity at which plain `Debug` messages pass.
pub const LOG_LEVEL_DEFAULT: i32 = 1;
/// Minimum verbosity for `Info` messages.
pub const LOG_LEVEL_INFO: i32 = 2;
/// Minimum verbosity for HTTP tracing.
pub const LOG_LEVEL_HTTP: i32 = 3;
/// Minimum verbosity for per-transfer tracing.
pub const LOG_LEVEL_TRANSFERRED: i32 = 4;
/// Minimum verbosity for payloads carrying credentials or key material.
pub const LOG_LEVEL_SENSITIVE: i32 = 5;

/// A requested log priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Priority {
    /// Error conditions. Always emitted, tagged with the call site.
    Error,
    /// Warning conditions. Always emitted.
    Warning,
    /// Normal but significant conditions. Always emitted.
    Notice,
    /// Informational messages.
    Info,
    /// Debug messages.
    Debug,
    /// HTTP request/response tracing.
    HttpDebug,
    /// Data transfer tracing.
    TransferDebug,
    /// Credentials, keys and other sensitive material.
    Sensitive,
    /// A raw priority code outside the known table. Known codes wrapped here
    /// are treated as their named level.
    Other(i32),
}

impl Priority {
    /// Raw code of `Error` (syslog `LOG_ERR`).
    pub const CODE_ERROR: i32 = 3;
    /// Raw code of `Warning` (syslog `LOG_WARNING`).
    pub const CODE_WARNING: i32 = 4;
    /// Raw code of `Notice` (syslog `LOG_NOTICE`).
    pub const CODE_NOTICE: i32 = 5;
    /// Raw code of `Info` (syslog `LOG_INFO`).
    pub const CODE_INFO: i32 = 6;
    /// Raw code of `Debug` (syslog `LOG_DEBUG`).
    pub const CODE_DEBUG: i32 = 7;
    /// Raw code of `HttpDebug`.
    pub const CODE_HTTP_DEBUG: i32 = 2001;
    /// Raw code of `TransferDebug`.
    pub const CODE_TRANSFER_DEBUG: i32 = 2002;
    /// Raw code of `Sensitive`.
    pub const CODE_SENSITIVE: i32 = 2003;

    /// Map a raw priority code, keeping unknown codes as `Other`.
    pub fn from_code(code: i32) -> Self {
        match code {
            Self::CODE_ERROR => Self::Error,
            Self::CODE_WARNING => Self::Warning,
            Self::CODE_NOTICE => Self::Notice,
            Self::CODE_INFO => Self::Info,
            Self::CODE_DEBUG => Self::Debug,
            Self::CODE_HTTP_DEBUG => Self::HttpDebug,
            Self::CODE_TRANSFER_DEBUG => Self::TransferDebug,
            Self::CODE_SENSITIVE => Self::Sensitive,
            other => Self::Other(other),
        }
    }

    /// The raw code of this priority.
    pub fn code(self) -> i32 {
        match self {
            Self::Error => Self::CODE_ERROR,
            Self::Warning => Self::CODE_WARNING,
            Self::Notice => Self::CODE_NOTICE,
            Self::Info => Self::CODE_INFO,
            Self::Debug => Self::CODE_DEBUG,
            Self::HttpDebug => Self::CODE_HTTP_DEBUG,
            Self::TransferDebug => Self::CODE_TRANSFER_DEBUG,
            Self::Sensitive => Self::CODE_SENSITIVE,
            Self::Other(code) => code,
        }
    }

    /// Map an `Other` that carries a known code to its named level.
    pub fn normalize(self) -> Self {
        match self {
            Self::Other(code) => Self::from_code(code),
            known => known,
        }
    }
}

impl From<i32> for Priority {
    fn from(code: i32) -> Self {
        Self::from_code(code)
    }
}

impl FromStr for Priority {
    type Err = String;

    /// Accepts a level name or a raw integer code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(code) = s.parse::<i32>() {
            return Ok(Self::from_code(code));
        }

        match s.to_ascii_lowercase().as_str() {
            "err" | "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warning),
            "notice" => Ok(Self::Notice),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "http" | "http-debug" => Ok(Self::HttpDebug),
            "transfer" | "transfer-debug" => Ok(Self::TransferDebug),
            "sensitive" => Ok(Self::Sensitive),
            other => Err(format!("unknown priority '{other}'")),
        }
    }
}

/// Severity reported to the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// `LOG_ERR`
    Error,
    /// `LOG_WARNING`
    Warning,
    /// `LOG_NOTICE`
    Notice,
    /// `LOG_INFO`
    Info,
    /// `LOG_DEBUG`
    Debug,
}

impl Severity {
    /// Lowercase syslog-style name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "err",
            Self::Warning => "warning",
            Self::Notice => "notice",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of gating a priority against a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Below the configured verbosity; drop without formatting.
    Suppressed,
    /// Emit at the given severity.
    Emit(Severity),
    /// Unknown priority code. Always emitted at `Debug`, after a warning.
    Unrecognized(i32),
}

impl Verdict {
    /// Severity to report, or `None` when suppressed.
    pub fn severity(self) -> Option<Severity> {
        match self {
            Self::Suppressed => None,
            Self::Emit(severity) => Some(severity),
            Self::Unrecognized(_) => Some(Severity::Debug),
        }
    }

    /// Whether the message should be emitted.
    pub fn emits(self) -> bool {
        self.severity().is_some()
    }
}

/// Gate `priority` against a channel's configured `threshold`.
pub fn classify(priority: Priority, threshold: i32) -> Verdict {
    let gate = |min: i32, severity: Severity| {
        if threshold >= min {
            Verdict::Emit(severity)
        } else {
            Verdict::Suppressed
        }
    };

    match priority.normalize() {
        Priority::Error => Verdict::Emit(Severity::Error),
        Priority::Warning => Verdict::Emit(Severity::Warning),
        Priority::Notice => Verdict::Emit(Severity::Notice),
        Priority::Debug => gate(LOG_LEVEL_DEFAULT, Severity::Debug),
        Priority::Info => gate(LOG_LEVEL_INFO, Severity::Info),
        Priority::HttpDebug => gate(LOG_LEVEL_HTTP, Severity::Debug),
        Priority::TransferDebug => gate(LOG_LEVEL_TRANSFERRED, Severity::Debug),
        Priority::Sensitive => gate(LOG_LEVEL_SENSITIVE, Severity::Debug),
        Priority::Other(code) => Verdict::Unrecognized(code),
    }
}
