use crate::error::{MandalaError, Result};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const MANDALA_DIR: &str = ".mandala";
pub const PLANS_DIR: &str = ".mandala/plans";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn mandala_dir(root: &Path) -> PathBuf {
    root.join(MANDALA_DIR)
}

pub fn plans_dir(root: &Path) -> PathBuf {
    root.join(PLANS_DIR)
}

pub fn owner_dir(root: &Path, owner: &str) -> PathBuf {
    root.join(PLANS_DIR).join(owner)
}

pub fn plan_path(root: &Path, owner: &str, year: i32) -> PathBuf {
    owner_dir(root, owner).join(format!("{year}.yaml"))
}

// ---------------------------------------------------------------------------
// Owner id validation
// ---------------------------------------------------------------------------

/// Owner ids follow the same rule as slugs elsewhere in the tree:
/// lowercase alphanumeric with interior hyphens, at most 64 chars.
pub fn validate_owner_id(owner: &str) -> Result<()> {
    let valid = !owner.is_empty()
        && owner.len() <= 64
        && !owner.starts_with('-')
        && !owner.ends_with('-')
        && owner
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !valid {
        return Err(MandalaError::InvalidOwnerId(owner.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
