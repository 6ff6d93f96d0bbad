use crate::error::{MandalaError, Result};
use crate::gate::{self, GateStatus};
use crate::intent::PlanIntent;
use crate::plan::PlanRecord;
use crate::types::{Role, Step};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Access
// ---------------------------------------------------------------------------

/// Decision for a requested step: enterable now, enterable after the next
/// midnight boundary, or not enterable at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Access {
    Granted,
    Wait { until: DateTime<Utc> },
    Locked { reason: String },
}

impl Access {
    pub fn is_granted(&self) -> bool {
        matches!(self, Access::Granted)
    }

    fn locked(reason: impl Into<String>) -> Self {
        Access::Locked {
            reason: reason.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// evaluate_access
// ---------------------------------------------------------------------------

/// Decide whether `step` may be entered. Pure over the record, the role and
/// the injected clock; no side effects.
///
/// Rules: step 1 is always open; completed and historical steps stay open
/// for review; the current step requires the predecessor to actually be
/// complete and, when the predecessor is gated, a midnight boundary to have
/// elapsed since its completion. Reviewers skip both the predecessor check
/// and the gate. Everything beyond the current step is locked.
pub fn evaluate_access(
    record: Option<&PlanRecord>,
    step: Step,
    role: Role,
    now: DateTime<Utc>,
) -> Access {
    if step == Step::FIRST {
        return Access::Granted;
    }

    let Some(record) = record else {
        return Access::locked("no plan record yet; start at step 1");
    };

    if record.is_step_completed(step) {
        return Access::Granted;
    }

    if step < record.current_step {
        return Access::Granted;
    }

    if step == record.current_step {
        if role == Role::Reviewer {
            return Access::Granted;
        }
        let prev = step.prev().expect("step > 1 has a predecessor");
        if !record.is_step_completed(prev) {
            return Access::locked(format!("step {prev} is not completed"));
        }
        if gate::gated(prev) {
            // Fail closed: a completed predecessor without a timestamp
            // cannot prove the boundary has passed.
            let status = match record.completed_at(prev) {
                Some(at) => gate::gate_status(at, now, role),
                None => GateStatus::Wait {
                    until: gate::next_midnight(now),
                },
            };
            if let GateStatus::Wait { until } = status {
                return Access::Wait { until };
            }
        }
        return Access::Granted;
    }

    Access::locked(format!(
        "step {step} is ahead of the current step {}",
        record.current_step
    ))
}

// ---------------------------------------------------------------------------
// complete_step
// ---------------------------------------------------------------------------

/// Validate and apply an intent, then advance progression state.
///
/// Re-completing an already-completed step merges the payload without
/// touching progression (edits stay possible after the fact). Completing a
/// new step requires access to be granted: a locked step errors with
/// `StepLocked`, an un-elapsed gate with `StepGated`. Monotonic by
/// construction — `completed_steps` only grows and `current_step` never
/// regresses. Persistence is the caller's job.
pub fn complete_step(
    record: &mut PlanRecord,
    intent: &PlanIntent,
    role: Role,
    now: DateTime<Utc>,
) -> Result<()> {
    let step = intent.step()?;

    if record.is_step_completed(step) {
        intent.apply(record)?;
        record.updated_at = now;
        return Ok(());
    }

    match evaluate_access(Some(record), step, role, now) {
        Access::Granted => {}
        Access::Wait { until } => {
            return Err(MandalaError::StepGated {
                step: step.get(),
                until: until.to_rfc3339(),
            });
        }
        Access::Locked { reason } => {
            return Err(MandalaError::StepLocked {
                step: step.get(),
                reason,
            });
        }
    }

    intent.apply(record)?;
    record.mark_step_completed(step, now);
    tracing::debug!(step = step.get(), owner = %record.owner_id, "step completed");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
