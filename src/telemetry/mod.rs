//! Priority-filtered logging for the server's processes.
//!
//! Each process (worker, main, security module) logs through a channel
//! facade. A facade decides per call whether the message passes the
//! caller's configured verbosity, which severity the sink sees, and which
//! identity prefix the line carries, then hands the finished line to the
//! process-wide sink.
//!
//! # Architecture
//!
//! - **Priorities** (`priority`): standard syslog levels always pass; the
//!   debug categories are gated against the caller's threshold
//! - **Identity** (`identity`): `[user]`, `[<vhost>:user]`, `[vhost:<name>]`
//! - **Binary payloads** (`encode`): hex or base64 into a fixed buffer
//! - **Sink** (`sink`): syslog or stderr, chosen once per process
//!
//! Log calls never return errors. Filtered calls cost one comparison; payloads
//! too large to encode are dropped.
//!
//! # Usage
//!
//! ```ignore
//! use ocserv_log::telemetry::{self, Priority, Sink, WorkerContext};
//!
//! // Install the sink at startup, before spawning threads
//! telemetry::init_sink(Sink::stderr())?;
//!
//! let ctx = WorkerContext::new(2).with_username("alice");
//! ocserv_log::worker_log!(&ctx, Priority::Info, "tunnel up after {} ms", 12);
//! ```

mod buffer;
mod channel;
mod context;
mod encode;
mod error;
mod identity;
mod priority;
mod sink;

pub use buffer::BoundedBuf;
pub use channel::{BODY_CAPACITY, Body, Channel, ChannelLogger};
pub use context::{
    ClientSession, LogContext, ProcessContext, SecurityModuleContext, WorkerContext,
};
pub use encode::{ENCODE_CAPACITY, EncodeError, Encoding, encode};
pub use error::TelemetryError;
pub use identity::{
    IDENTITY_CAPACITY, Identity, MAX_HOSTNAME_SIZE, MAX_USERNAME_SIZE, Vhost, format_identity,
    vhost_prefix,
};
pub use priority::{
    LOG_LEVEL_DEFAULT, LOG_LEVEL_HTTP, LOG_LEVEL_INFO, LOG_LEVEL_SENSITIVE, LOG_LEVEL_TRANSFERRED,
    Priority, Severity, Verdict, classify,
};
pub use sink::{
    AddressToken, LINE_CAPACITY, Record, SYSLOG_TAG, Sink, SinkBackend, SinkMode, StderrBackend,
    SyslogBackend, init_sink, sink, try_sink,
};
