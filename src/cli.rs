//! Command-line interface definitions for ocserv-log.
//!
//! Uses clap's derive API for type-safe argument parsing.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::telemetry::{Channel, Encoding, Priority};

/// Send a line through the server's logging channels.
///
/// ocserv-log applies the same filtering, identity prefixes and sink
/// selection as the server processes, which makes it useful from scripts
/// (connect/disconnect hooks) and for checking a logging configuration.
#[derive(Parser, Debug)]
#[command(name = "ocserv-log")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Message to log. With --hex or --base64 this becomes the payload prefix.
    #[arg(required = true, trailing_var_arg = true)]
    pub message: Vec<String>,

    /// Channel to log on.
    #[arg(long = "channel", value_enum, default_value_t = ChannelArg::Worker)]
    pub channel: ChannelArg,

    /// Priority name (err, warning, notice, info, debug, http, transfer,
    /// sensitive) or raw numeric code.
    #[arg(short = 'p', long = "priority", default_value = "notice")]
    pub priority: Priority,

    /// Authenticated username of the session.
    #[arg(short = 'u', long = "user", value_name = "USER")]
    pub user: Option<String>,

    /// Virtual host of the session (must be configured).
    #[arg(long = "vhost", value_name = "NAME")]
    pub vhost: Option<String>,

    /// Remote address of the client.
    #[arg(long = "remote", value_name = "ADDR")]
    pub remote: Option<String>,

    /// Read a binary payload from stdin and log it as hex.
    #[arg(long = "hex", conflicts_with = "base64")]
    pub hex: bool,

    /// Read a binary payload from stdin and log it as base64.
    #[arg(long = "base64")]
    pub base64: bool,

    /// Path to additional config file.
    ///
    /// This config file is merged on top of system and user configs,
    /// giving it the highest priority (except for CLI flags).
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the configured verbosity threshold.
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<i32>,

    /// Write to stderr instead of syslog.
    #[arg(long = "stderr")]
    pub stderr: bool,

    /// Increase diagnostic verbosity.
    ///
    /// Can be specified multiple times:
    /// -v    = info level
    /// -vv   = debug level
    /// -vvv  = trace level
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Channel names accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChannelArg {
    /// Worker process.
    Worker,
    /// Main process.
    Main,
    /// Security module.
    #[value(name = "sec-mod")]
    SecMod,
}

impl From<ChannelArg> for Channel {
    fn from(arg: ChannelArg) -> Self {
        match arg {
            ChannelArg::Worker => Channel::Worker,
            ChannelArg::Main => Channel::Main,
            ChannelArg::SecMod => Channel::SecMod,
        }
    }
}

impl Cli {
    /// Binary payload encoding, if a payload was requested.
    pub fn encoding(&self) -> Option<Encoding> {
        if self.base64 {
            Some(Encoding::Base64)
        } else if self.hex {
            Some(Encoding::Hex)
        } else {
            None
        }
    }

    /// Message words joined by single spaces.
    pub fn message_text(&self) -> String {
        self.message.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_basic() {
        let cli = Cli::parse_from(["ocserv-log", "hello", "world"]);
        assert_eq!(cli.message_text(), "hello world");
        assert_eq!(cli.channel, ChannelArg::Worker);
        assert_eq!(cli.priority, Priority::Notice);
        assert_eq!(cli.encoding(), None);
        assert!(!cli.stderr);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_cli_parse_with_options() {
        let cli = Cli::parse_from([
            "ocserv-log",
            "--channel",
            "sec-mod",
            "-p",
            "sensitive",
            "-u",
            "alice",
            "--vhost",
            "corp",
            "--remote",
            "192.0.2.1",
            "--base64",
            "-l",
            "5",
            "--stderr",
            "-vv",
            "session",
            "key:",
        ]);

        assert_eq!(Channel::from(cli.channel), Channel::SecMod);
        assert_eq!(cli.priority, Priority::Sensitive);
        assert_eq!(cli.user.as_deref(), Some("alice"));
        assert_eq!(cli.vhost.as_deref(), Some("corp"));
        assert_eq!(cli.remote.as_deref(), Some("192.0.2.1"));
        assert_eq!(cli.encoding(), Some(Encoding::Base64));
        assert_eq!(cli.log_level, Some(5));
        assert!(cli.stderr);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.message_text(), "session key:");
    }

    #[test]
    fn test_cli_numeric_priority() {
        let cli = Cli::parse_from(["ocserv-log", "-p", "999", "odd"]);
        assert_eq!(cli.priority, Priority::Other(999));
    }

    #[test]
    fn test_cli_rejects_unknown_priority_name() {
        assert!(Cli::try_parse_from(["ocserv-log", "-p", "loud", "x"]).is_err());
    }

    #[test]
    fn test_cli_hex_conflicts_with_base64() {
        assert!(Cli::try_parse_from(["ocserv-log", "--hex", "--base64", "x"]).is_err());
    }

    #[test]
    fn test_cli_requires_message() {
        assert!(Cli::try_parse_from(["ocserv-log"]).is_err());
    }
}
