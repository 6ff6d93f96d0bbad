pub mod access;
pub mod complete;
pub mod edit;
pub mod export;
pub mod init;
pub mod plan;
pub mod report;
pub mod ui;

use anyhow::anyhow;
use mandala_core::types::Role;

/// Parse an optional `--role` flag; absence means a standard account.
pub fn parse_role(role: Option<&str>) -> anyhow::Result<Role> {
    match role {
        Some(s) => s.parse::<Role>().map_err(|e| anyhow!("{e}")),
        None => Ok(Role::Standard),
    }
}
