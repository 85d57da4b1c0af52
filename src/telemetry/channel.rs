//! Channel facades for the worker, main-process and security-module loggers.
//!
//! A facade gates the call, formats the body into a fixed stack buffer,
//! attaches the caller's identity and hands the line to the sink. A call that
//! is filtered out costs one comparison; none of the format arguments are
//! touched.

use std::fmt::{self, Write};
use std::panic::Location;

use tracing::debug;

use super::buffer::BoundedBuf;
use super::context::LogContext;
use super::encode::{ENCODE_CAPACITY, Encoding, encode};
use super::identity::{Identity, format_identity};
use super::priority::{Priority, Severity, Verdict, classify};
use super::sink::{AddressToken, Record, Sink};

/// Size of the message body buffer, terminator included.
pub const BODY_CAPACITY: usize = 512;

/// A formatted message body.
pub type Body = BoundedBuf<BODY_CAPACITY>;

/// Placeholder for a worker whose client address is unknown.
const UNKNOWN_ADDRESS: &str = "[unknown]";

/// The logical emitters of a server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// A worker process serving one client.
    Worker,
    /// The main server process.
    Main,
    /// The security module.
    SecMod,
}

impl Channel {
    /// Tag that starts every line of this channel.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Worker => "worker",
            Self::Main => "main",
            Self::SecMod => "sec-mod",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Logger for one channel, borrowing the process sink.
#[derive(Debug, Clone, Copy)]
pub struct ChannelLogger<'s> {
    sink: &'s Sink,
    channel: Channel,
}

impl Sink {
    /// Logger for worker processes.
    pub fn worker(&self) -> ChannelLogger<'_> {
        ChannelLogger::new(self, Channel::Worker)
    }

    /// Logger for the main process.
    pub fn main(&self) -> ChannelLogger<'_> {
        ChannelLogger::new(self, Channel::Main)
    }

    /// Logger for the security module.
    pub fn sec_mod(&self) -> ChannelLogger<'_> {
        ChannelLogger::new(self, Channel::SecMod)
    }
}

impl<'s> ChannelLogger<'s> {
    /// Bind a channel to a sink.
    pub fn new(sink: &'s Sink, channel: Channel) -> Self {
        Self { sink, channel }
    }

    /// The channel this logger writes for.
    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Log a formatted message.
    ///
    /// `Error` lines are prefixed with the caller's `file:line`. Bodies longer
    /// than one byte short of [`BODY_CAPACITY`] are truncated.
    #[track_caller]
    pub fn log(&self, ctx: &dyn LogContext, priority: Priority, args: fmt::Arguments<'_>) {
        let priority = priority.normalize();
        let severity = match classify(priority, ctx.log_threshold()) {
            Verdict::Suppressed => return,
            Verdict::Emit(severity) => severity,
            Verdict::Unrecognized(code) => {
                self.report_unknown_priority(code);
                Severity::Debug
            }
        };

        let mut body = Body::new();
        if priority == Priority::Error {
            let location = Location::caller();
            let _ = write!(body, "{}:{}: ", location.file(), location.line());
        }
        let _ = body.write_fmt(args);

        self.dispatch(ctx, severity, body.as_str());
    }

    /// Log a binary payload as `"<prefix> <encoded>"`.
    ///
    /// The payload is dropped, without any line reaching the sink, when its
    /// encoding does not fit the encode buffer.
    #[track_caller]
    pub fn log_hex(
        &self,
        ctx: &dyn LogContext,
        priority: Priority,
        prefix: &str,
        data: &[u8],
        encoding: Encoding,
    ) {
        if !classify(priority, ctx.log_threshold()).emits() {
            return;
        }

        let mut out = [0u8; ENCODE_CAPACITY];
        match encode(data, encoding, &mut out) {
            Ok(text) => self.log(ctx, priority, format_args!("{prefix} {text}")),
            Err(e) => debug!(channel = %self.channel, "Dropped binary payload: {}", e),
        }
    }

    fn report_unknown_priority(&self, code: i32) {
        let mut body = BoundedBuf::<64>::new();
        let _ = write!(body, "unknown log level {code}");
        self.sink.route(&Record {
            tag: self.channel.tag(),
            identity: "",
            address: None,
            body: body.as_str(),
            severity: Severity::Debug,
        });
    }

    fn dispatch(&self, ctx: &dyn LogContext, severity: Severity, body: &str) {
        let identity = match self.channel {
            Channel::Worker | Channel::Main => {
                format_identity(ctx.multi_tenancy(), ctx.username(), ctx.vhost())
            }
            Channel::SecMod => Identity::new(),
        };

        let address = match self.channel {
            Channel::Worker => Some(AddressToken::Spaced(
                ctx.remote_address().unwrap_or(UNKNOWN_ADDRESS),
            )),
            Channel::Main => Some(AddressToken::Attached(ctx.remote_address().unwrap_or(""))),
            Channel::SecMod => None,
        };

        self.sink.route(&Record {
            tag: self.channel.tag(),
            identity: identity.as_str(),
            address,
            body,
            severity,
        });
    }
}

/// Log through a [`ChannelLogger`] with compile-time checked formatting.
///
/// ```ignore
/// channel_log!(sink.worker(), &ctx, Priority::Info, "user {} connected", name);
/// ```
#[macro_export]
macro_rules! channel_log {
    ($logger:expr, $ctx:expr, $priority:expr, $($arg:tt)+) => {
        $logger.log($ctx, $priority, ::std::format_args!($($arg)+))
    };
}

/// Log on the worker channel of the process-wide sink.
#[macro_export]
macro_rules! worker_log {
    ($ctx:expr, $priority:expr, $($arg:tt)+) => {
        $crate::channel_log!($crate::telemetry::sink().worker(), $ctx, $priority, $($arg)+)
    };
}

/// Log on the main-process channel of the process-wide sink.
#[macro_export]
macro_rules! main_log {
    ($ctx:expr, $priority:expr, $($arg:tt)+) => {
        $crate::channel_log!($crate::telemetry::sink().main(), $ctx, $priority, $($arg)+)
    };
}

/// Log on the security-module channel of the process-wide sink.
#[macro_export]
macro_rules! sec_mod_log {
    ($ctx:expr, $priority:expr, $($arg:tt)+) => {
        $crate::channel_log!($crate::telemetry::sink().sec_mod(), $ctx, $priority, $($arg)+)
    };
}
