//! Configuration schema definitions.
//!
//! ```toml
//! [log]
//! level = 2
//! sink = "syslog"
//! facility = "daemon"
//! ident = "ocserv"
//!
//! [vhosts.corp]
//! level = 4
//! default = true
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;

use syslog::Facility;

use super::error::ConfigError;
use crate::telemetry::{
    LOG_LEVEL_DEFAULT, ProcessContext, SYSLOG_TAG, SecurityModuleContext, SinkMode, Vhost,
    WorkerContext,
};

/// Default syslog facility name.
pub const DEFAULT_FACILITY: &str = "daemon";

/// Top-level configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Log settings shared by every channel.
    #[serde(default)]
    pub log: LogConfig,

    /// Virtual hosts, keyed by name.
    ///
    /// Defining any vhost enables multi-tenant identity prefixes.
    #[serde(default)]
    pub vhosts: BTreeMap<String, VhostConfig>,
}

impl Config {
    /// Merge another config into this one.
    ///
    /// Scalars are overridden when set. Vhosts are merged by key.
    pub fn merge(&mut self, other: Config) {
        self.log.merge(other.log);

        for (name, other_vhost) in other.vhosts {
            if let Some(existing) = self.vhosts.get_mut(&name) {
                existing.merge(other_vhost);
            } else {
                self.vhosts.insert(name, other_vhost);
            }
        }
    }

    /// Check values that deserialization alone cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.facility()?;

        let defaults: Vec<&str> = self
            .vhosts
            .iter()
            .filter(|(_, v)| v.is_default())
            .map(|(name, _)| name.as_str())
            .collect();
        if defaults.len() > 1 {
            return Err(ConfigError::InvalidValue {
                field: "vhosts.default".to_string(),
                message: format!("more than one default vhost: {}", defaults.join(", ")),
            });
        }

        Ok(())
    }

    /// Whether sessions are routed through virtual hosts.
    pub fn multi_tenancy(&self) -> bool {
        !self.vhosts.is_empty()
    }

    /// Global verbosity threshold.
    pub fn log_level(&self) -> i32 {
        self.log.level.unwrap_or(LOG_LEVEL_DEFAULT)
    }

    /// Verbosity for a session on `vhost`, falling back to the global level.
    pub fn log_level_for(&self, vhost: Option<&str>) -> i32 {
        vhost
            .and_then(|name| self.vhosts.get(name))
            .and_then(|v| v.level)
            .unwrap_or_else(|| self.log_level())
    }

    /// Read-only view of a configured vhost.
    pub fn vhost<'a>(&'a self, name: &str) -> Option<Vhost<'a>> {
        self.vhosts.get_key_value(name).map(|(name, v)| Vhost {
            name: name.as_str(),
            is_default: v.is_default(),
        })
    }

    /// Sink requested by the configuration.
    pub fn sink_mode(&self) -> SinkMode {
        match self.log.sink.unwrap_or_default() {
            SinkKind::Syslog => SinkMode::Syslog,
            SinkKind::Stderr => SinkMode::Stderr,
        }
    }

    /// Syslog facility.
    pub fn facility(&self) -> Result<Facility, ConfigError> {
        let name = self.log.facility.as_deref().unwrap_or(DEFAULT_FACILITY);
        name.parse::<Facility>()
            .map_err(|_| ConfigError::InvalidValue {
                field: "log.facility".to_string(),
                message: format!("unknown syslog facility '{name}'"),
            })
    }

    /// Syslog process tag.
    pub fn ident(&self) -> &str {
        self.log.ident.as_deref().unwrap_or(SYSLOG_TAG)
    }

    /// Context for a worker serving a session on `vhost`.
    pub fn worker_context(&self, vhost: Option<&str>) -> Result<WorkerContext, ConfigError> {
        let ctx = WorkerContext::new(self.log_level_for(vhost))
            .with_multi_tenancy(self.multi_tenancy());

        match vhost {
            Some(name) => {
                let view = self
                    .vhost(name)
                    .ok_or_else(|| ConfigError::UnknownVhost(name.to_string()))?;
                Ok(ctx.with_vhost(view))
            }
            None => Ok(ctx),
        }
    }

    /// Context for the main process.
    pub fn process_context(&self) -> ProcessContext {
        ProcessContext::new(self.log_level(), self.multi_tenancy())
    }

    /// Context for the security module.
    pub fn sec_mod_context(&self) -> SecurityModuleContext {
        SecurityModuleContext::new(self.log_level())
    }
}

/// Log settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogConfig {
    /// Verbosity threshold (1 = debug, 2 = info, 3 = http, 4 = transfers,
    /// 5 = sensitive).
    #[serde(default)]
    pub level: Option<i32>,

    /// Where lines are written.
    #[serde(default)]
    pub sink: Option<SinkKind>,

    /// Syslog facility name (`daemon`, `user`, `local0`, ...).
    #[serde(default)]
    pub facility: Option<String>,

    /// Syslog process tag.
    #[serde(default)]
    pub ident: Option<String>,
}

impl LogConfig {
    fn merge(&mut self, other: LogConfig) {
        if other.level.is_some() {
            self.level = other.level;
        }
        if other.sink.is_some() {
            self.sink = other.sink;
        }
        if other.facility.is_some() {
            self.facility = other.facility;
        }
        if other.ident.is_some() {
            self.ident = other.ident;
        }
    }
}

/// Configured sink.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// The local syslog daemon.
    #[default]
    Syslog,
    /// Standard error.
    Stderr,
}

/// Per-vhost settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VhostConfig {
    /// Verbosity override for workers on this vhost.
    #[serde(default)]
    pub level: Option<i32>,

    /// Marks the default vhost. Its name is not prefixed to usernames.
    #[serde(default)]
    pub default: Option<bool>,
}

impl VhostConfig {
    fn merge(&mut self, other: VhostConfig) {
        if other.level.is_some() {
            self.level = other.level;
        }
        if other.default.is_some() {
            self.default = other.default;
        }
    }

    /// Whether this is the default vhost.
    pub fn is_default(&self) -> bool {
        self.default.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::LogContext;

    fn parse(toml_str: &str) -> Config {
        toml::from_str(toml_str).unwrap()
    }

    #[test]
    fn test_empty_config_defaults() {
        let config = parse("");
        assert_eq!(config.log_level(), LOG_LEVEL_DEFAULT);
        assert_eq!(config.sink_mode(), SinkMode::Syslog);
        assert_eq!(config.ident(), SYSLOG_TAG);
        assert!(!config.multi_tenancy());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_vhost_level_override() {
        let config = parse(
            r#"
            [log]
            level = 2

            [vhosts.corp]
            level = 5

            [vhosts.lab]
            "#,
        );

        assert!(config.multi_tenancy());
        assert_eq!(config.log_level_for(Some("corp")), 5);
        assert_eq!(config.log_level_for(Some("lab")), 2);
        assert_eq!(config.log_level_for(Some("missing")), 2);
        assert_eq!(config.log_level_for(None), 2);
    }

    #[test]
    fn test_merge_overrides_scalars_and_merges_vhosts() {
        let mut base = parse(
            r#"
            [log]
            level = 1
            facility = "daemon"

            [vhosts.corp]
            level = 3
            "#,
        );
        base.merge(parse(
            r#"
            [log]
            level = 4
            sink = "stderr"

            [vhosts.corp]
            default = true

            [vhosts.lab]
            level = 2
            "#,
        ));

        assert_eq!(base.log_level(), 4);
        assert_eq!(base.sink_mode(), SinkMode::Stderr);
        assert_eq!(base.log.facility.as_deref(), Some("daemon"));
        assert_eq!(base.vhosts["corp"].level, Some(3));
        assert!(base.vhosts["corp"].is_default());
        assert_eq!(base.vhosts.len(), 2);
    }

    #[test]
    fn test_invalid_facility_rejected() {
        let config = parse(
            r#"
            [log]
            facility = "nonsense"
            "#,
        );
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "log.facility"
        ));
    }

    #[test]
    fn test_two_default_vhosts_rejected() {
        let config = parse(
            r#"
            [vhosts.a]
            default = true

            [vhosts.b]
            default = true
            "#,
        );
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_sink_is_parse_error() {
        let result: Result<Config, _> = toml::from_str(
            r#"
            [log]
            sink = "carrier-pigeon"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_worker_context_from_config() {
        let config = parse(
            r#"
            [log]
            level = 2

            [vhosts.corp]
            level = 4
            default = true
            "#,
        );

        let ctx = config.worker_context(Some("corp")).unwrap();
        assert_eq!(ctx.log_threshold(), 4);
        assert!(ctx.multi_tenancy());
        assert_eq!(ctx.vhost(), Some(Vhost::default_named("corp")));

        assert!(matches!(
            config.worker_context(Some("nope")),
            Err(ConfigError::UnknownVhost(_))
        ));
    }
}
