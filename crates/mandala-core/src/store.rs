use crate::error::{MandalaError, Result};
use crate::paths;
use crate::plan::PlanRecord;
use std::path::Path;

// ---------------------------------------------------------------------------
// Read / write primitives
// ---------------------------------------------------------------------------

fn read_record(path: &Path) -> Result<PlanRecord> {
    let data = std::fs::read_to_string(path)?;
    let record: PlanRecord = serde_yaml::from_str(&data)?;
    Ok(record)
}

fn write_record(root: &Path, record: &PlanRecord) -> Result<()> {
    let path = paths::plan_path(root, &record.owner_id, record.year);
    let data = serde_yaml::to_string(record)?;
    crate::io::atomic_write(&path, data.as_bytes())
}

// ---------------------------------------------------------------------------
// Store operations
// ---------------------------------------------------------------------------

/// Fetch the record for (owner, year), or `None` if it does not exist.
pub fn get(root: &Path, owner: &str, year: i32) -> Result<Option<PlanRecord>> {
    paths::validate_owner_id(owner)?;
    let path = paths::plan_path(root, owner, year);
    if !path.exists() {
        return Ok(None);
    }
    Ok(Some(read_record(&path)?))
}

/// Create the record for (owner, year), or return the existing one.
///
/// Idempotent: two racing creators both end up with the same record — the
/// loser's write is resolved by re-reading what landed on disk.
pub fn create(root: &Path, owner: &str, year: i32, marketing_consent: bool) -> Result<PlanRecord> {
    paths::validate_owner_id(owner)?;
    if let Some(existing) = get(root, owner, year)? {
        return Ok(existing);
    }

    let record = PlanRecord::new(owner, year, marketing_consent);
    write_record(root, &record)?;

    // Resolve a create race in favour of whatever is now stored.
    let stored = read_record(&paths::plan_path(root, owner, year))?;
    Ok(stored)
}

/// Conditionally persist `record`: rejected with `VersionConflict` when the
/// stored version no longer matches `expected_version`. On success the
/// stored (and returned) record carries `expected_version + 1`.
pub fn update(root: &Path, record: &PlanRecord, expected_version: u64) -> Result<PlanRecord> {
    paths::validate_owner_id(&record.owner_id)?;
    let path = paths::plan_path(root, &record.owner_id, record.year);
    if !path.exists() {
        return Err(MandalaError::PlanNotFound {
            owner: record.owner_id.clone(),
            year: record.year,
        });
    }

    let stored = read_record(&path)?;
    if stored.version != expected_version {
        return Err(MandalaError::VersionConflict {
            expected: expected_version,
            actual: stored.version,
        });
    }

    let mut next = record.clone();
    next.version = expected_version + 1;
    write_record(root, &next)?;
    Ok(next)
}

/// All plan years stored for one owner, sorted by year.
pub fn list(root: &Path, owner: &str) -> Result<Vec<PlanRecord>> {
    paths::validate_owner_id(owner)?;
    let dir = paths::owner_dir(root, owner);
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut records = Vec::new();
    for entry in std::fs::read_dir(&dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("yaml") {
            records.push(read_record(&path)?);
        }
    }
    records.sort_by_key(|r| r.year);
    Ok(records)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn create_then_get() {
        let dir = TempDir::new().unwrap();
        let record = create(dir.path(), "user-1", 2026, true).unwrap();
        assert_eq!(record.owner_id, "user-1");
        assert_eq!(record.year, 2026);
        assert!(record.marketing_consent);

        let fetched = get(dir.path(), "user-1", 2026).unwrap().unwrap();
        assert_eq!(fetched.id, record.id);
    }

    #[test]
    fn create_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let first = create(dir.path(), "user-1", 2026, true).unwrap();
        let second = create(dir.path(), "user-1", 2026, false).unwrap();
        assert_eq!(first.id, second.id);
        // The original consent flag survives the second call.
        assert!(second.marketing_consent);
    }

    #[test]
    fn get_missing_is_none() {
        let dir = TempDir::new().unwrap();
        assert!(get(dir.path(), "user-1", 2026).unwrap().is_none());
    }

    #[test]
    fn invalid_owner_rejected() {
        let dir = TempDir::new().unwrap();
        assert!(create(dir.path(), "Bad Owner", 2026, false).is_err());
        assert!(get(dir.path(), "", 2026).is_err());
    }

    #[test]
    fn update_bumps_version() {
        let dir = TempDir::new().unwrap();
        let mut record = create(dir.path(), "user-1", 2026, false).unwrap();
        record.center_goal = Some("goal".to_string());

        let updated = update(dir.path(), &record, 1).unwrap();
        assert_eq!(updated.version, 2);

        let stored = get(dir.path(), "user-1", 2026).unwrap().unwrap();
        assert_eq!(stored.version, 2);
        assert_eq!(stored.center_goal.as_deref(), Some("goal"));
    }

    #[test]
    fn stale_writer_gets_conflict() {
        let dir = TempDir::new().unwrap();
        let record = create(dir.path(), "user-1", 2026, false).unwrap();

        // Two tabs read version 1; the first update wins.
        let mut tab_a = record.clone();
        tab_a.center_goal = Some("from tab a".to_string());
        update(dir.path(), &tab_a, 1).unwrap();

        let mut tab_b = record.clone();
        tab_b.center_goal = Some("from tab b".to_string());
        let result = update(dir.path(), &tab_b, 1);
        assert!(matches!(
            result,
            Err(MandalaError::VersionConflict {
                expected: 1,
                actual: 2
            })
        ));

        let stored = get(dir.path(), "user-1", 2026).unwrap().unwrap();
        assert_eq!(stored.center_goal.as_deref(), Some("from tab a"));
    }

    #[test]
    fn update_missing_record_errors() {
        let dir = TempDir::new().unwrap();
        let record = PlanRecord::new("user-1", 2026, false);
        assert!(matches!(
            update(dir.path(), &record, 1),
            Err(MandalaError::PlanNotFound { .. })
        ));
    }

    #[test]
    fn list_sorted_by_year() {
        let dir = TempDir::new().unwrap();
        create(dir.path(), "user-1", 2027, false).unwrap();
        create(dir.path(), "user-1", 2025, false).unwrap();
        create(dir.path(), "user-1", 2026, false).unwrap();

        let records = list(dir.path(), "user-1").unwrap();
        let years: Vec<i32> = records.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![2025, 2026, 2027]);
    }

    #[test]
    fn list_unknown_owner_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(list(dir.path(), "nobody").unwrap().is_empty());
    }
}
