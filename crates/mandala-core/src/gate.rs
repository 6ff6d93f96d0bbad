use crate::types::{Role, Step};
use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Civil timezone
// ---------------------------------------------------------------------------

/// Fixed civil timezone for the midnight boundary (UTC+9, no DST).
const GATE_UTC_OFFSET_SECS: i32 = 9 * 3600;

fn gate_zone() -> FixedOffset {
    FixedOffset::east_opt(GATE_UTC_OFFSET_SECS).expect("valid fixed offset")
}

// ---------------------------------------------------------------------------
// GateStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GateStatus {
    Passed,
    Wait { until: DateTime<Utc> },
}

impl GateStatus {
    pub fn passed(self) -> bool {
        matches!(self, GateStatus::Passed)
    }
}

// ---------------------------------------------------------------------------
// Gate rules
// ---------------------------------------------------------------------------

/// Whether completing `step` starts a midnight gate before its successor.
///
/// Gates are not uniform: the notes review (2), the center goal (3), the
/// second sub-goal batch (5) and each action-plan day except the last
/// (6-12) are followed by a gate. 1->2, 4->5 and 13->14 are open.
pub fn gated(step: Step) -> bool {
    matches!(step.get(), 2 | 3 | 5 | 6..=12)
}

/// The next civil-midnight boundary strictly after `after`, as UTC.
pub fn next_midnight(after: DateTime<Utc>) -> DateTime<Utc> {
    let zone = gate_zone();
    let local = after.with_timezone(&zone);
    let next_day = local.date_naive() + Duration::days(1);
    let boundary = next_day.and_hms_opt(0, 0, 0).expect("midnight exists");
    zone.from_local_datetime(&boundary)
        .single()
        .expect("fixed offset is unambiguous")
        .with_timezone(&Utc)
}

/// Evaluate the midnight gate for a step completed at `completed_at`.
///
/// Standard accounts pass once a civil midnight has elapsed since the
/// completion moment. Reviewers always pass. The gate only passes on
/// positive evidence; callers without a completion timestamp must treat
/// the gate as not passed.
pub fn gate_status(completed_at: DateTime<Utc>, now: DateTime<Utc>, role: Role) -> GateStatus {
    if role == Role::Reviewer {
        return GateStatus::Passed;
    }
    let boundary = next_midnight(completed_at);
    if now >= boundary {
        GateStatus::Passed
    } else {
        GateStatus::Wait { until: boundary }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn gated_steps() {
        let gated_steps: Vec<u8> = Step::all().filter(|s| gated(*s)).map(Step::get).collect();
        assert_eq!(gated_steps, vec![2, 3, 5, 6, 7, 8, 9, 10, 11, 12]);
    }

    #[test]
    fn next_midnight_same_civil_day() {
        // 2026-03-01 10:00 UTC = 19:00 UTC+9 -> boundary 2026-03-02 00:00+09:00
        // = 2026-03-01 15:00 UTC.
        let boundary = next_midnight(utc("2026-03-01T10:00:00Z"));
        assert_eq!(boundary, utc("2026-03-01T15:00:00Z"));
    }

    #[test]
    fn next_midnight_crosses_civil_date_line() {
        // 2026-03-01 20:00 UTC is already 2026-03-02 05:00 UTC+9, so the
        // boundary is 2026-03-03 00:00+09:00 = 2026-03-02 15:00 UTC.
        let boundary = next_midnight(utc("2026-03-01T20:00:00Z"));
        assert_eq!(boundary, utc("2026-03-02T15:00:00Z"));
    }

    #[test]
    fn next_midnight_is_strictly_after() {
        // Exactly at the civil midnight, the next boundary is a full day out.
        let at_midnight = utc("2026-03-01T15:00:00Z"); // 2026-03-02 00:00+09:00
        let boundary = next_midnight(at_midnight);
        assert_eq!(boundary, utc("2026-03-02T15:00:00Z"));
    }

    #[test]
    fn gate_waits_before_boundary() {
        let completed = utc("2026-03-01T10:00:00Z");
        let now = utc("2026-03-01T12:00:00Z");
        match gate_status(completed, now, Role::Standard) {
            GateStatus::Wait { until } => assert_eq!(until, utc("2026-03-01T15:00:00Z")),
            GateStatus::Passed => panic!("gate should not pass before the boundary"),
        }
    }

    #[test]
    fn gate_passes_after_boundary() {
        let completed = utc("2026-03-01T10:00:00Z");
        let now = utc("2026-03-01T15:00:00Z");
        assert!(gate_status(completed, now, Role::Standard).passed());
    }

    #[test]
    fn reviewer_always_passes() {
        let completed = utc("2026-03-01T10:00:00Z");
        let now = completed;
        assert!(gate_status(completed, now, Role::Reviewer).passed());
    }
}
