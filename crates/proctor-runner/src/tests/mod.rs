//! Crate-level integration and BDD tests.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use tempfile::TempDir;

use crate::error::RunError;
use crate::identity::{AccountResolver, Identity};


/// Resolves every account to an identity the test process may assume.
///
/// When the tests run as root the target is `nobody`, which exercises a real
/// change of identity; otherwise it is the current identity.
struct TestAccounts;

impl TestAccounts {
    fn target() -> Identity {
        if Identity::current().uid() == 0 {
            Identity::new(65534, 65534)
        } else {
            Identity::current()
        }
    }
}

impl AccountResolver for TestAccounts {
    fn resolve(&self, account: &str) -> Result<Identity, RunError> {
        if account == "missing" {
            return Err(RunError::AccountNotFound {
                account: account.to_owned(),
            });
        }
        Ok(Self::target())
    }
}

/// Writes a script readable by the demoted child.
fn write_script(dir: &TempDir, name: &str, body: &str) -> PathBuf {
    fs::set_permissions(dir.path(), fs::Permissions::from_mode(0o755)).expect("chmod dir");
    let path = dir.path().join(name);
    fs::write(&path, body).expect("write script");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).expect("chmod script");
    path
}

#[test]
fn system_agent_wires_the_process_runner() {
    use crate::agent::{AgentSettings, ExecutionAgent};

    let agent = ExecutionAgent::system(AgentSettings::new("hacker", None), "/bin/sh");
    assert_eq!(agent.settings().account(), "hacker");
    assert_eq!(agent.settings().timeout(), None);
}
