//! ocserv-log: priority-filtered logging for a multi-process VPN server
//!
//! Worker processes, the main process and the security module all log through
//! the same facade. Each call is gated against the caller's configured
//! verbosity, tagged with the session identity and routed to syslog or stderr.
//!
//! # Architecture
//!
//! - **Telemetry**: priority gating, identity prefixes, binary payloads, sinks
//! - **Config**: hierarchical TOML configuration (levels, vhosts, sink)
//! - **CLI**: a `logger(1)`-style front end over the same channels

#![warn(clippy::all)]
#![warn(missing_docs)]

pub mod cli;
pub mod cli_handler;
pub mod config;
pub mod telemetry;
