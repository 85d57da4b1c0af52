//! Command handling for ocserv-log.
//!
//! Builds the caller context the chosen channel expects and sends the
//! message (or stdin payload) through it.

use std::io::Read;

use anyhow::{Context, Result};
use tracing::debug;

use crate::cli::Cli;
use crate::config::Config;
use crate::telemetry::{Channel, ChannelLogger, ClientSession, LogContext, Sink};

/// Build the context for the requested channel from config and CLI flags.
pub fn build_context(cli: &Cli, config: &Config) -> Result<Box<dyn LogContext>> {
    let ctx: Box<dyn LogContext> = match Channel::from(cli.channel) {
        Channel::Worker => {
            let mut ctx = config
                .worker_context(cli.vhost.as_deref())
                .context("Failed to resolve worker vhost")?;
            if let Some(ref user) = cli.user {
                ctx = ctx.with_username(user.clone());
            }
            if let Some(ref remote) = cli.remote {
                ctx = ctx.with_remote_address(remote.clone());
            }
            Box::new(ctx)
        }
        Channel::Main => {
            let ctx = config.process_context();
            if cli.user.is_none() && cli.vhost.is_none() && cli.remote.is_none() {
                Box::new(ctx)
            } else {
                Box::new(ctx.with_client(client_session(cli, config)?))
            }
        }
        Channel::SecMod => Box::new(config.sec_mod_context()),
    };

    Ok(ctx)
}

/// The client a main-process line refers to.
fn client_session(cli: &Cli, config: &Config) -> Result<ClientSession> {
    let mut session = ClientSession::new();
    if let Some(ref user) = cli.user {
        session = session.with_username(user.clone());
    }
    if let Some(ref name) = cli.vhost {
        let vhost = config
            .vhost(name)
            .with_context(|| format!("Unknown vhost: {name}"))?;
        session = session.with_vhost(vhost);
    }
    if let Some(ref remote) = cli.remote {
        session = session.with_remote_address(remote.clone());
    }
    Ok(session)
}

/// Log the CLI's message, or its stdin payload, on `sink`.
pub fn run(cli: &Cli, config: &Config, sink: &Sink) -> Result<()> {
    let ctx = build_context(cli, config)?;
    let logger = ChannelLogger::new(sink, cli.channel.into());

    match cli.encoding() {
        Some(encoding) => {
            let mut payload = Vec::new();
            std::io::stdin()
                .read_to_end(&mut payload)
                .context("Failed to read payload from stdin")?;
            debug!("Read {} payload bytes from stdin", payload.len());
            logger.log_hex(
                ctx.as_ref(),
                cli.priority,
                &cli.message_text(),
                &payload,
                encoding,
            );
        }
        None => {
            let text = cli.message_text();
            logger.log(ctx.as_ref(), cli.priority, format_args!("{text}"));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn config(toml_str: &str) -> Config {
        toml::from_str(toml_str).unwrap()
    }

    #[test]
    fn test_worker_context_carries_cli_identity() {
        let cli = Cli::parse_from([
            "ocserv-log",
            "-u",
            "alice",
            "--vhost",
            "corp",
            "--remote",
            "192.0.2.5",
            "hi",
        ]);
        let config = config("[log]\nlevel = 2\n[vhosts.corp]\nlevel = 4\n");

        let ctx = build_context(&cli, &config).unwrap();

        assert_eq!(ctx.log_threshold(), 4);
        assert_eq!(ctx.username(), Some("alice"));
        assert_eq!(ctx.vhost().map(|v| v.name), Some("corp"));
        assert_eq!(ctx.remote_address(), Some("192.0.2.5"));
        assert!(ctx.multi_tenancy());
    }

    #[test]
    fn test_main_context_without_client() {
        let cli = Cli::parse_from(["ocserv-log", "--channel", "main", "hi"]);
        let ctx = build_context(&cli, &config("[log]\nlevel = 3\n")).unwrap();

        assert_eq!(ctx.log_threshold(), 3);
        assert_eq!(ctx.username(), None);
        assert_eq!(ctx.remote_address(), None);
    }

    #[test]
    fn test_sec_mod_ignores_identity_flags() {
        let cli = Cli::parse_from(["ocserv-log", "--channel", "sec-mod", "-u", "bob", "hi"]);
        let ctx = build_context(&cli, &config("")).unwrap();

        assert_eq!(ctx.username(), None);
    }

    #[test]
    fn test_unknown_vhost_is_error() {
        let cli = Cli::parse_from(["ocserv-log", "--channel", "main", "--vhost", "nope", "hi"]);
        assert!(build_context(&cli, &config("[vhosts.corp]\n")).is_err());
    }
}
