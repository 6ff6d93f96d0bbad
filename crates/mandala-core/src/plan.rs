use crate::error::{MandalaError, Result};
use crate::types::{Step, ThemeKey, STEP_COUNT};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// ReportSummary
// ---------------------------------------------------------------------------

/// AI-generated synthesis, present only after step 14. All four fields are
/// required; an incomplete generator response is never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub reflection_summary: String,
    pub goal_analysis: String,
    pub keywords: Vec<String>,
    pub insights: String,
}

impl ReportSummary {
    /// Reject summaries with blank prose fields. Missing fields are already
    /// rejected at deserialization (none carry serde defaults).
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("reflection_summary", &self.reflection_summary),
            ("goal_analysis", &self.goal_analysis),
            ("insights", &self.insights),
        ] {
            if value.trim().is_empty() {
                return Err(MandalaError::IncompleteSummary(field.to_string()));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// PlanRecord
// ---------------------------------------------------------------------------

/// The single per-owner-per-year document: reflection, goals, action plans,
/// summary, and progression state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRecord {
    pub id: Uuid,
    pub owner_id: String,
    pub year: i32,

    // Reflection phase
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<ThemeKey>,
    #[serde(default)]
    pub reflection_answers: BTreeMap<u8, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reflection_notes: Option<String>,

    // Goal phase
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center_goal: Option<String>,
    #[serde(default)]
    pub sub_goals: Vec<String>,

    // Action phase: sub-goal index (0-7) -> exactly 8 plans
    #[serde(default)]
    pub action_plans: BTreeMap<u8, Vec<String>>,

    // Synthesis phase
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<ReportSummary>,

    // Progression state
    pub current_step: Step,
    #[serde(default)]
    pub completed_steps: Vec<u8>,
    #[serde(default)]
    pub step_completed_at: BTreeMap<u8, DateTime<Utc>>,

    pub marketing_consent: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Optimistic concurrency token, incremented on every store update.
    #[serde(default = "default_version")]
    pub version: u64,
}

fn default_version() -> u64 {
    1
}

impl PlanRecord {
    pub fn new(owner_id: impl Into<String>, year: i32, marketing_consent: bool) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id: owner_id.into(),
            year,
            theme: None,
            reflection_answers: BTreeMap::new(),
            reflection_notes: None,
            center_goal: None,
            sub_goals: Vec::new(),
            action_plans: BTreeMap::new(),
            summary: None,
            current_step: Step::FIRST,
            completed_steps: Vec::new(),
            step_completed_at: BTreeMap::new(),
            marketing_consent,
            created_at: now,
            updated_at: now,
            version: 1,
        }
    }

    pub fn is_step_completed(&self, step: Step) -> bool {
        self.completed_steps.contains(&step.get())
    }

    /// Terminal state: all 14 steps completed.
    pub fn is_complete(&self) -> bool {
        (1..=STEP_COUNT).all(|n| self.completed_steps.contains(&n))
    }

    /// Append a step to `completed_steps` (no duplicates, kept sorted) and
    /// record its completion moment. Advances `current_step` monotonically.
    pub fn mark_step_completed(&mut self, step: Step, now: DateTime<Utc>) {
        if !self.completed_steps.contains(&step.get()) {
            self.completed_steps.push(step.get());
            self.completed_steps.sort_unstable();
            self.step_completed_at.insert(step.get(), now);
        }
        if let Some(next) = step.next() {
            if next > self.current_step {
                self.current_step = next;
            }
        }
        self.updated_at = now;
    }

    pub fn completed_at(&self, step: Step) -> Option<DateTime<Utc>> {
        self.step_completed_at.get(&step.get()).copied()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
