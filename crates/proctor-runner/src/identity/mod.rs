//! Resolution of the unprivileged account a submission runs as.
//!
//! The account database is consulted on every call; identities are small
//! `Copy` values and are never cached.

use std::fmt;

use nix::unistd::{self, User};
use tracing::debug;

use crate::error::RunError;

const IDENTITY_TARGET: &str = "proctor_runner::identity";

/// Numeric user and group identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identity {
    uid: u32,
    gid: u32,
}

impl Identity {
    /// Creates an identity from raw ids.
    #[must_use]
    pub const fn new(uid: u32, gid: u32) -> Self {
        Self { uid, gid }
    }

    /// Returns the effective identity of the current process.
    #[must_use]
    pub fn current() -> Self {
        Self::new(
            unistd::geteuid().as_raw(),
            unistd::getegid().as_raw(),
        )
    }

    /// Returns the user id.
    #[must_use]
    pub const fn uid(self) -> u32 {
        self.uid
    }

    /// Returns the primary group id.
    #[must_use]
    pub const fn gid(self) -> u32 {
        self.gid
    }

    /// Returns whether either id belongs to the superuser.
    #[must_use]
    pub const fn is_privileged(self) -> bool {
        self.uid == 0 || self.gid == 0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.uid, self.gid)
    }
}

/// Looks up accounts by name.
///
/// The production implementation is [`SystemAccounts`]. Tests substitute a
/// double to avoid depending on the host's user database.
pub trait AccountResolver {
    /// Resolves `account` to an unprivileged identity.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::AccountNotFound`] if no such account exists,
    /// [`RunError::AccountLookup`] if the database cannot be queried, and
    /// [`RunError::PrivilegedAccount`] if the account is the superuser or in
    /// the superuser group.
    fn resolve(&self, account: &str) -> Result<Identity, RunError>;
}

/// Resolves accounts through the host's passwd database.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemAccounts;

impl AccountResolver for SystemAccounts {
    fn resolve(&self, account: &str) -> Result<Identity, RunError> {
        let user = User::from_name(account)
            .map_err(|errno| RunError::AccountLookup {
                account: account.to_owned(),
                message: errno.desc().to_owned(),
            })?
            .ok_or_else(|| RunError::AccountNotFound {
                account: account.to_owned(),
            })?;
        let identity = Identity::new(user.uid.as_raw(), user.gid.as_raw());
        debug!(
            target: IDENTITY_TARGET,
            account,
            uid = identity.uid(),
            gid = identity.gid(),
            "resolved account"
        );
        ensure_unprivileged(account, identity)
    }
}

/// Rejects identities that would not lower privilege.
///
/// # Errors
///
/// Returns [`RunError::PrivilegedAccount`] when `identity` has uid 0 or gid 0.
pub fn ensure_unprivileged(account: &str, identity: Identity) -> Result<Identity, RunError> {
    if identity.is_privileged() {
        return Err(RunError::PrivilegedAccount {
            account: account.to_owned(),
            uid: identity.uid(),
            gid: identity.gid(),
        });
    }
    Ok(identity)
}
