//! Read-only views of the objects a log call is made on behalf of.
//!
//! The session and process layers own the real state; the facades only need
//! a threshold and, for worker and main-process lines, who the line is about.

use super::identity::Vhost;
use super::priority::LOG_LEVEL_DEFAULT;

/// What a channel facade needs to know about the caller.
///
/// Everything but the threshold defaults to absent.
pub trait LogContext {
    /// Configured verbosity for this caller.
    fn log_threshold(&self) -> i32;

    /// Authenticated username, if any.
    fn username(&self) -> Option<&str> {
        None
    }

    /// Virtual host the session belongs to.
    fn vhost(&self) -> Option<Vhost<'_>> {
        None
    }

    /// Printable remote address of the client.
    fn remote_address(&self) -> Option<&str> {
        None
    }

    /// Whether the server routes sessions through virtual hosts.
    fn multi_tenancy(&self) -> bool {
        false
    }
}

/// Vhost membership carried by worker and main-process contexts.
#[derive(Debug, Clone, PartialEq, Eq)]
struct VhostRef {
    name: String,
    is_default: bool,
}

impl VhostRef {
    fn view(&self) -> Vhost<'_> {
        Vhost {
            name: &self.name,
            is_default: self.is_default,
        }
    }
}

/// A worker process serving one client session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerContext {
    log_threshold: i32,
    multi_tenancy: bool,
    username: String,
    vhost: Option<VhostRef>,
    remote_address: Option<String>,
}

impl WorkerContext {
    /// A worker with the given threshold and no session details yet.
    pub fn new(log_threshold: i32) -> Self {
        Self {
            log_threshold,
            multi_tenancy: false,
            username: String::new(),
            vhost: None,
            remote_address: None,
        }
    }

    /// Set the authenticated username.
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    /// Attach the session's virtual host.
    #[must_use]
    pub fn with_vhost(mut self, vhost: Vhost<'_>) -> Self {
        self.vhost = Some(VhostRef {
            name: vhost.name.to_string(),
            is_default: vhost.is_default,
        });
        self
    }

    /// Set the client's printable address.
    #[must_use]
    pub fn with_remote_address(mut self, address: impl Into<String>) -> Self {
        self.remote_address = Some(address.into());
        self
    }

    /// Enable or disable multi-tenancy.
    #[must_use]
    pub fn with_multi_tenancy(mut self, enabled: bool) -> Self {
        self.multi_tenancy = enabled;
        self
    }
}

impl LogContext for WorkerContext {
    fn log_threshold(&self) -> i32 {
        self.log_threshold
    }

    fn username(&self) -> Option<&str> {
        Some(self.username.as_str()).filter(|u| !u.is_empty())
    }

    fn vhost(&self) -> Option<Vhost<'_>> {
        self.vhost.as_ref().map(VhostRef::view)
    }

    fn remote_address(&self) -> Option<&str> {
        self.remote_address.as_deref()
    }

    fn multi_tenancy(&self) -> bool {
        self.multi_tenancy
    }
}

/// The client session a main-process line refers to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientSession {
    username: String,
    vhost: Option<VhostRef>,
    remote_address: Option<String>,
}

impl ClientSession {
    /// An unauthenticated session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the authenticated username.
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    /// Attach the session's virtual host.
    #[must_use]
    pub fn with_vhost(mut self, vhost: Vhost<'_>) -> Self {
        self.vhost = Some(VhostRef {
            name: vhost.name.to_string(),
            is_default: vhost.is_default,
        });
        self
    }

    /// Set the client's printable address.
    #[must_use]
    pub fn with_remote_address(mut self, address: impl Into<String>) -> Self {
        self.remote_address = Some(address.into());
        self
    }
}

/// The main server process, optionally logging about one client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessContext {
    log_threshold: i32,
    multi_tenancy: bool,
    client: Option<ClientSession>,
}

impl ProcessContext {
    /// The main process with its configured threshold.
    pub fn new(log_threshold: i32, multi_tenancy: bool) -> Self {
        Self {
            log_threshold,
            multi_tenancy,
            client: None,
        }
    }

    /// Logging before the server configuration is available.
    pub fn detached() -> Self {
        Self::new(LOG_LEVEL_DEFAULT, false)
    }

    /// Scope the context to a client session.
    #[must_use]
    pub fn with_client(mut self, client: ClientSession) -> Self {
        self.client = Some(client);
        self
    }
}

impl LogContext for ProcessContext {
    fn log_threshold(&self) -> i32 {
        self.log_threshold
    }

    fn username(&self) -> Option<&str> {
        self.client
            .as_ref()
            .map(|c| c.username.as_str())
            .filter(|u| !u.is_empty())
    }

    fn vhost(&self) -> Option<Vhost<'_>> {
        self.client.as_ref()?.vhost.as_ref().map(VhostRef::view)
    }

    fn remote_address(&self) -> Option<&str> {
        self.client.as_ref()?.remote_address.as_deref()
    }

    fn multi_tenancy(&self) -> bool {
        self.multi_tenancy
    }
}

/// The security module. It has no notion of a session identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecurityModuleContext {
    log_threshold: i32,
}

impl SecurityModuleContext {
    /// The security module with its configured threshold.
    pub fn new(log_threshold: i32) -> Self {
        Self { log_threshold }
    }
}

impl Default for SecurityModuleContext {
    fn default() -> Self {
        Self::new(LOG_LEVEL_DEFAULT)
    }
}

impl LogContext for SecurityModuleContext {
    fn log_threshold(&self) -> i32 {
        self.log_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_empty_username_is_absent() {
        let ctx = WorkerContext::new(2).with_username("");
        assert_eq!(ctx.username(), None);
    }

    #[test]
    fn test_process_without_client_has_no_identity() {
        let ctx = ProcessContext::new(3, true);
        assert_eq!(ctx.log_threshold(), 3);
        assert_eq!(ctx.username(), None);
        assert_eq!(ctx.vhost(), None);
        assert_eq!(ctx.remote_address(), None);
        assert!(ctx.multi_tenancy());
    }

    #[test]
    fn test_process_with_client() {
        let ctx = ProcessContext::detached().with_client(
            ClientSession::new()
                .with_username("bob")
                .with_vhost(Vhost::named("corp"))
                .with_remote_address("10.0.0.7"),
        );
        assert_eq!(ctx.log_threshold(), LOG_LEVEL_DEFAULT);
        assert_eq!(ctx.username(), Some("bob"));
        assert_eq!(ctx.vhost(), Some(Vhost::named("corp")));
        assert_eq!(ctx.remote_address(), Some("10.0.0.7"));
    }

    #[test]
    fn test_security_module_exposes_only_threshold() {
        let ctx = SecurityModuleContext::new(5);
        assert_eq!(ctx.log_threshold(), 5);
        assert_eq!(ctx.username(), None);
        assert!(!ctx.multi_tenancy());
    }
}
