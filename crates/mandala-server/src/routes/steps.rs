use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use mandala_core::intent::{MandalaEdit, PlanIntent};
use mandala_core::progression;
use mandala_core::types::{Role, Step};

use crate::error::AppError;
use crate::state::AppState;

fn progression_json(record: &mandala_core::plan::PlanRecord) -> serde_json::Value {
    serde_json::json!({
        "owner_id": record.owner_id,
        "year": record.year,
        "current_step": record.current_step,
        "completed_steps": record.completed_steps,
        "complete": record.is_complete(),
        "version": record.version,
    })
}

#[derive(serde::Deserialize)]
pub struct CompleteStepBody {
    #[serde(default)]
    pub role: Role,
    pub intent: PlanIntent,
}

/// POST /api/plans/:owner/:year/steps/:step — validate and complete a step.
///
/// The path step must match the step owned by the intent payload; the
/// mutation is persisted with a conditional write so an external writer
/// racing this request surfaces as a 409.
pub async fn complete_step(
    State(app): State<AppState>,
    Path((owner, year, step)): Path<(String, i32, u32)>,
    Json(body): Json<CompleteStepBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let step = Step::new(step)?;
    let intent_step = body.intent.step()?;
    if intent_step != step {
        return Err(AppError::bad_request(format!(
            "intent belongs to step {intent_step}, not step {step}"
        )));
    }

    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut record = mandala_core::store::get(&root, &owner, year)?.ok_or(
            mandala_core::MandalaError::PlanNotFound { owner, year },
        )?;
        let expected_version = record.version;
        progression::complete_step(&mut record, &body.intent, body.role, Utc::now())?;
        let stored = mandala_core::store::update(&root, &record, expected_version)?;
        Ok::<_, mandala_core::MandalaError>(progression_json(&stored))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// PUT /api/plans/:owner/:year/mandala — bulk free-edit of the chart.
///
/// Overwrites only the fields present in the body; progression state is
/// untouched.
pub async fn edit_mandala(
    State(app): State<AppState>,
    Path((owner, year)): Path<(String, i32)>,
    Json(edit): Json<MandalaEdit>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut record = mandala_core::store::get(&root, &owner, year)?.ok_or(
            mandala_core::MandalaError::PlanNotFound { owner, year },
        )?;
        let expected_version = record.version;
        edit.apply(&mut record)?;
        record.updated_at = Utc::now();
        let stored = mandala_core::store::update(&root, &record, expected_version)?;
        Ok::<_, mandala_core::MandalaError>(serde_json::json!({
            "owner_id": stored.owner_id,
            "year": stored.year,
            "center_goal": stored.center_goal,
            "sub_goals": stored.sub_goals,
            "action_plans": stored.action_plans,
            "version": stored.version,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
