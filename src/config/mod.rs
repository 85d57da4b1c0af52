//! Configuration system for ocserv-log.
//!
//! This module provides TOML configuration loading with hierarchy merging.
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded from multiple sources and merged in order:
//!
//! 1. System config: `/etc/ocserv-log/config.toml`
//! 2. User config: `~/.config/ocserv-log/config.toml`
//! 3. Additional config file (via `--config` flag)
//! 4. CLI flags (highest priority)
//!
//! Missing system and user files are fine; built-in defaults apply.
//!
//! # Merge Behavior
//!
//! - **Scalars** (level, sink, facility, ident) are **overridden**
//! - **Vhosts** are merged by name, field by field
//!
//! # Virtual Hosts
//!
//! Defining any `[vhosts.<name>]` section turns on multi-tenant identity
//! prefixes. A vhost may carry its own verbosity for worker sessions:
//!
//! ```toml
//! [vhosts.corp]
//! level = 4
//! default = true
//! ```

mod error;
mod loader;
mod schema;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{Config, DEFAULT_FACILITY, LogConfig, SinkKind, VhostConfig};
