use crate::output::print_json;
use anyhow::anyhow;
use chrono::Utc;
use clap::Subcommand;
use mandala_core::intent::{PlanIntent, SubGoalBatch};
use mandala_core::plan::PlanRecord;
use std::collections::BTreeMap;
use std::path::Path;

// ---------------------------------------------------------------------------
// Subcommand definition
// ---------------------------------------------------------------------------

#[derive(Subcommand, Debug)]
pub enum CompleteSubcommand {
    /// Step 1: submit the reflection (theme + three answers)
    Reflection {
        owner: String,
        year: i32,
        /// Reflection theme (career, health, relationships, learning, finance, lifestyle)
        #[arg(long)]
        theme: String,
        /// Answer to one reflection question (repeat three times, in order)
        #[arg(long = "answer")]
        answers: Vec<String>,
        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
        /// Account role (standard or reviewer)
        #[arg(long)]
        role: Option<String>,
    },
    /// Step 2: review (and optionally amend) the reflection notes
    Notes {
        owner: String,
        year: i32,
        /// Replacement notes; omit to keep the step-1 notes
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        role: Option<String>,
    },
    /// Step 3: set the center goal
    Goal {
        owner: String,
        year: i32,
        goal: String,
        #[arg(long)]
        role: Option<String>,
    },
    /// Steps 4-5: save a batch of four sub-goals
    Subgoals {
        owner: String,
        year: i32,
        /// Which batch: first (step 4) or second (step 5)
        #[arg(long)]
        batch: String,
        /// The four sub-goal entries
        entries: Vec<String>,
        #[arg(long)]
        role: Option<String>,
    },
    /// Steps 6-13: save the eight action plans for one sub-goal
    Plans {
        owner: String,
        year: i32,
        /// Sub-goal index (0-7)
        #[arg(long)]
        index: u8,
        /// The eight action-plan entries
        entries: Vec<String>,
        #[arg(long)]
        role: Option<String>,
    },
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn run(root: &Path, subcommand: CompleteSubcommand, json: bool) -> anyhow::Result<()> {
    match subcommand {
        CompleteSubcommand::Reflection {
            owner,
            year,
            theme,
            answers,
            notes,
            role,
        } => {
            let theme = theme.parse()?;
            let answers: BTreeMap<u8, String> = answers
                .into_iter()
                .enumerate()
                .map(|(i, a)| (i as u8, a))
                .collect();
            let intent = PlanIntent::ReflectionSubmitted {
                theme,
                answers,
                notes,
            };
            apply(root, &owner, year, intent, role.as_deref(), json)
        }
        CompleteSubcommand::Notes {
            owner,
            year,
            notes,
            role,
        } => apply(
            root,
            &owner,
            year,
            PlanIntent::NotesReviewed { notes },
            role.as_deref(),
            json,
        ),
        CompleteSubcommand::Goal {
            owner,
            year,
            goal,
            role,
        } => apply(
            root,
            &owner,
            year,
            PlanIntent::CenterGoalSet { goal },
            role.as_deref(),
            json,
        ),
        CompleteSubcommand::Subgoals {
            owner,
            year,
            batch,
            entries,
            role,
        } => {
            let batch = parse_batch(&batch)?;
            let intent = PlanIntent::SubGoalsSet { batch, entries };
            apply(root, &owner, year, intent, role.as_deref(), json)
        }
        CompleteSubcommand::Plans {
            owner,
            year,
            index,
            entries,
            role,
        } => apply(
            root,
            &owner,
            year,
            PlanIntent::ActionPlansSet { index, entries },
            role.as_deref(),
            json,
        ),
    }
}

fn parse_batch(s: &str) -> anyhow::Result<SubGoalBatch> {
    match s {
        "first" => Ok(SubGoalBatch::First),
        "second" => Ok(SubGoalBatch::Second),
        other => Err(anyhow!("unknown batch '{other}' (expected first or second)")),
    }
}

// ---------------------------------------------------------------------------
// Shared apply path
// ---------------------------------------------------------------------------

/// Load, complete, conditionally persist, report.
pub fn apply(
    root: &Path,
    owner: &str,
    year: i32,
    intent: PlanIntent,
    role: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let role = super::parse_role(role)?;
    let step = intent.step()?;

    let mut record = mandala_core::store::get(root, owner, year)?.ok_or_else(|| {
        anyhow!("no plan for {owner}/{year} — run `mandala create {owner} {year}` first")
    })?;
    let expected_version = record.version;
    mandala_core::progression::complete_step(&mut record, &intent, role, Utc::now())?;
    let stored = mandala_core::store::update(root, &record, expected_version)?;

    report_progress(&stored, step.get(), json)
}

fn report_progress(record: &PlanRecord, step: u8, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(&serde_json::json!({
            "owner_id": record.owner_id,
            "year": record.year,
            "step": step,
            "current_step": record.current_step,
            "completed_steps": record.completed_steps,
            "complete": record.is_complete(),
            "version": record.version,
        }));
    }
    if record.is_complete() {
        println!("Step {step} saved. The plan is complete.");
    } else {
        println!(
            "Step {step} saved. Current step: {} of 14",
            record.current_step
        );
    }
    Ok(())
}
