//! Caller identity prefixes.
//!
//! Worker and main-process lines carry a short bracketed tag naming the
//! session: the authenticated user, the virtual host, or both.

use std::fmt::Write;

use super::buffer::BoundedBuf;

/// Longest username the server accepts.
pub const MAX_USERNAME_SIZE: usize = 64;

/// Longest virtual host name the server accepts.
pub const MAX_HOSTNAME_SIZE: usize = 64;

/// Identity buffer size: both names plus brackets, separator and terminator.
pub const IDENTITY_CAPACITY: usize = MAX_USERNAME_SIZE + MAX_HOSTNAME_SIZE + 3;

/// A formatted identity prefix.
pub type Identity = BoundedBuf<IDENTITY_CAPACITY>;

/// Read-only view of a virtual host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vhost<'a> {
    /// Configured name.
    pub name: &'a str,
    /// Whether this is the default vhost, which carries no name prefix.
    pub is_default: bool,
}

impl<'a> Vhost<'a> {
    /// A named, non-default vhost.
    pub fn named(name: &'a str) -> Self {
        Self {
            name,
            is_default: false,
        }
    }

    /// The default vhost.
    pub fn default_named(name: &'a str) -> Self {
        Self {
            name,
            is_default: true,
        }
    }
}

/// Prefix placed before the username when multi-tenancy is enabled.
pub fn vhost_prefix(vhost: Option<Vhost<'_>>) -> VhostPrefix<'_> {
    VhostPrefix(vhost.filter(|v| !v.is_default).map(|v| v.name))
}

/// `"<name>:"` for a non-default vhost, nothing otherwise.
#[derive(Debug, Clone, Copy)]
pub struct VhostPrefix<'a>(Option<&'a str>);

impl std::fmt::Display for VhostPrefix<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(name) => write!(f, "{name}:"),
            None => Ok(()),
        }
    }
}

/// Build the identity prefix for a session.
///
/// The first matching rule wins:
///
/// 1. multi-tenancy with a user: `[<vhost-prefix><user>]`
/// 2. multi-tenancy, no user, a vhost: `[vhost:<name>]`
/// 3. a user: `[<user>]`
/// 4. nothing
///
/// An empty username counts as absent.
pub fn format_identity(
    multi_tenancy: bool,
    username: Option<&str>,
    vhost: Option<Vhost<'_>>,
) -> Identity {
    let mut out = Identity::new();
    let username = username.filter(|u| !u.is_empty());

    // Writes into a BoundedBuf never fail.
    let _ = match (multi_tenancy, username, vhost) {
        (true, Some(user), _) => write!(out, "[{}{}]", vhost_prefix(vhost), user),
        (true, None, Some(vhost)) => write!(out, "[vhost:{}]", vhost.name),
        (_, Some(user), _) => write!(out, "[{user}]"),
        _ => Ok(()),
    };

    out
}
