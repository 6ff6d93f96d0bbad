use crate::error::{MandalaError, Result};
use crate::plan::{PlanRecord, ReportSummary};
use crate::types::{Step, ThemeKey};
use crate::validate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// SubGoalBatch
// ---------------------------------------------------------------------------

/// Sub-goals are written in two ordered batches of 4 (steps 4 and 5), so a
/// record never exposes a partially-written batch: the list length is always
/// 0, 4 or 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubGoalBatch {
    First,
    Second,
}

/// Deserialize a `BTreeMap<u8, String>` whose keys may arrive as either
/// integers or strings. Internally tagged enums buffer their content, and the
/// buffered deserializer cannot parse the string keys serde_json emits for
/// integer-keyed maps, so the keys must be decoded by hand here.
fn deserialize_answer_map<'de, D>(
    deserializer: D,
) -> std::result::Result<BTreeMap<u8, String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(PartialEq, Eq, PartialOrd, Ord)]
    struct Key(u8);

    impl<'de> Deserialize<'de> for Key {
        fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            struct KeyVisitor;

            impl serde::de::Visitor<'_> for KeyVisitor {
                type Value = Key;

                fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                    f.write_str("a u8 map key, as an integer or a string")
                }

                fn visit_u64<E: serde::de::Error>(
                    self,
                    v: u64,
                ) -> std::result::Result<Key, E> {
                    u8::try_from(v)
                        .map(Key)
                        .map_err(|_| E::custom(format!("map key {v} out of range for u8")))
                }

                fn visit_i64<E: serde::de::Error>(
                    self,
                    v: i64,
                ) -> std::result::Result<Key, E> {
                    u8::try_from(v)
                        .map(Key)
                        .map_err(|_| E::custom(format!("map key {v} out of range for u8")))
                }

                fn visit_str<E: serde::de::Error>(
                    self,
                    v: &str,
                ) -> std::result::Result<Key, E> {
                    v.parse::<u8>()
                        .map(Key)
                        .map_err(|_| E::custom(format!("invalid u8 map key {v:?}")))
                }
            }

            deserializer.deserialize_any(KeyVisitor)
        }
    }

    let map = BTreeMap::<Key, String>::deserialize(deserializer)?;
    Ok(map.into_iter().map(|(Key(k), v)| (k, v)).collect())
}

// ---------------------------------------------------------------------------
// PlanIntent
// ---------------------------------------------------------------------------

/// The closed set of step mutations. Each intent owns exactly one step,
/// carries its own payload, and maps to an explicit validated transition —
/// there is no generic partial-field merge path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlanIntent {
    ReflectionSubmitted {
        theme: ThemeKey,
        #[serde(deserialize_with = "deserialize_answer_map")]
        answers: BTreeMap<u8, String>,
        #[serde(default)]
        notes: Option<String>,
    },
    NotesReviewed {
        #[serde(default)]
        notes: Option<String>,
    },
    CenterGoalSet {
        goal: String,
    },
    SubGoalsSet {
        batch: SubGoalBatch,
        entries: Vec<String>,
    },
    ActionPlansSet {
        index: u8,
        entries: Vec<String>,
    },
    ReportGenerated {
        summary: ReportSummary,
    },
}

impl PlanIntent {
    /// The step this intent completes.
    pub fn step(&self) -> Result<Step> {
        let n = match self {
            PlanIntent::ReflectionSubmitted { .. } => 1,
            PlanIntent::NotesReviewed { .. } => 2,
            PlanIntent::CenterGoalSet { .. } => 3,
            PlanIntent::SubGoalsSet { batch, .. } => match batch {
                SubGoalBatch::First => 4,
                SubGoalBatch::Second => 5,
            },
            PlanIntent::ActionPlansSet { index, .. } => {
                if *index > 7 {
                    return Err(MandalaError::InvalidField {
                        field: "action_plans".to_string(),
                        reason: format!("sub-goal index {index} out of range (0-7)"),
                    });
                }
                6 + u32::from(*index)
            }
            PlanIntent::ReportGenerated { .. } => 14,
        };
        Step::new(n)
    }

    /// Validate the payload and write it into the record. Field-level
    /// validation happens here, before any progression change.
    pub fn apply(&self, record: &mut PlanRecord) -> Result<()> {
        match self {
            PlanIntent::ReflectionSubmitted {
                theme,
                answers,
                notes,
            } => {
                let answers = validate::reflection_answers(answers)?;
                let notes = validate::optional_text(
                    "reflection_notes",
                    notes.as_deref(),
                    validate::LONG_TEXT_MAX_CHARS,
                )?;
                record.theme = Some(*theme);
                record.reflection_answers = answers;
                record.reflection_notes = notes;
            }
            PlanIntent::NotesReviewed { notes } => {
                // The review step may amend the notes; an absent payload
                // leaves the step-1 notes in place.
                if notes.is_some() {
                    record.reflection_notes = validate::optional_text(
                        "reflection_notes",
                        notes.as_deref(),
                        validate::LONG_TEXT_MAX_CHARS,
                    )?;
                }
            }
            PlanIntent::CenterGoalSet { goal } => {
                record.center_goal = Some(validate::required_text(
                    "center_goal",
                    goal,
                    validate::CENTER_GOAL_MAX_CHARS,
                )?);
            }
            PlanIntent::SubGoalsSet { batch, entries } => {
                let entries = validate::sub_goal_batch(entries)?;
                match batch {
                    SubGoalBatch::First => {
                        if record.sub_goals.is_empty() {
                            record.sub_goals = entries;
                        } else {
                            record.sub_goals.splice(0..4, entries);
                        }
                    }
                    SubGoalBatch::Second => {
                        if record.sub_goals.len() < 4 {
                            return Err(MandalaError::BatchOutOfOrder(
                                "second batch requires the first batch to be saved".to_string(),
                            ));
                        }
                        record.sub_goals.truncate(4);
                        record.sub_goals.extend(entries);
                    }
                }
            }
            PlanIntent::ActionPlansSet { index, entries } => {
                let entries = validate::action_plan_batch(*index, entries)?;
                record.action_plans.insert(*index, entries);
            }
            PlanIntent::ReportGenerated { summary } => {
                summary.validate()?;
                record.summary = Some(summary.clone());
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MandalaEdit
// ---------------------------------------------------------------------------

/// Bulk free-edit of the chart after the guided steps. Overwrites only the
/// fields present, each batch-validated; progression state is untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MandalaEdit {
    #[serde(default)]
    pub center_goal: Option<String>,
    #[serde(default)]
    pub sub_goals: Option<Vec<String>>,
    #[serde(default)]
    pub action_plans: Option<BTreeMap<u8, Vec<String>>>,
}

impl MandalaEdit {
    pub fn apply(&self, record: &mut PlanRecord) -> Result<()> {
        if let Some(goal) = &self.center_goal {
            record.center_goal = Some(validate::required_text(
                "center_goal",
                goal,
                validate::CENTER_GOAL_MAX_CHARS,
            )?);
        }
        if let Some(sub_goals) = &self.sub_goals {
            // Free edit replaces the full set at once; no partial lengths.
            if sub_goals.len() != validate::SUB_GOAL_COUNT {
                return Err(MandalaError::InvalidField {
                    field: "sub_goals".to_string(),
                    reason: format!("must contain exactly {} entries", validate::SUB_GOAL_COUNT),
                });
            }
            let mut validated = Vec::with_capacity(8);
            for chunk in sub_goals.chunks(validate::SUB_GOAL_BATCH_SIZE) {
                validated.extend(validate::sub_goal_batch(chunk)?);
            }
            record.sub_goals = validated;
        }
        if let Some(action_plans) = &self.action_plans {
            let mut validated = BTreeMap::new();
            for (index, entries) in action_plans {
                validated.insert(*index, validate::action_plan_batch(*index, entries)?);
            }
            // Validate everything before touching the record.
            for (index, entries) in validated {
                record.action_plans.insert(index, entries);
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
