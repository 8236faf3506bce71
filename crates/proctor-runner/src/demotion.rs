//! Privilege demotion applied between fork and exec.
//!
//! A [`Demotion`] is installed on a [`Command`] as a pre-exec hook. The hook
//! runs in the forked child only, so the agent process itself never changes
//! identity. Inside the child the supplementary groups are replaced (only
//! possible while still privileged), then the group id is set, then the user
//! id. Group must precede user: once the user id is lowered the process may
//! no longer change its group.
//!
//! If any step fails the child exits before exec and `spawn` returns the OS
//! error, which the runner reports as a spawn failure.

use std::io;
use std::os::unix::process::CommandExt;
use std::process::Command;

use nix::unistd::{self, Gid, Uid};

use crate::identity::Identity;

/// A pending change of identity for one child process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Demotion {
    identity: Identity,
}

impl Demotion {
    /// Prepares a demotion to `identity`.
    #[must_use]
    pub const fn new(identity: Identity) -> Self {
        Self { identity }
    }

    /// Returns the identity the child will run as.
    #[must_use]
    pub const fn identity(&self) -> Identity {
        self.identity
    }

    /// Registers the demotion as a pre-exec hook on `command`.
    pub fn install(self, command: &mut Command) {
        let uid = Uid::from_raw(self.identity.uid());
        let gid = Gid::from_raw(self.identity.gid());
        // SAFETY: the hook runs in the forked child before exec and only
        // issues the geteuid, setgroups, setgid and setuid system calls,
        // none of which allocate or take locks.
        unsafe {
            command.pre_exec(move || lower_privileges(uid, gid));
        }
    }
}

fn lower_privileges(uid: Uid, gid: Gid) -> io::Result<()> {
    if unistd::geteuid().is_root() {
        unistd::setgroups(&[gid])?;
    }
    unistd::setgid(gid)?;
    unistd::setuid(uid)?;
    Ok(())
}
