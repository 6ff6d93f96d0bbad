use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use mandala_core::progression;
use mandala_core::types::{Role, Step};

use crate::error::AppError;
use crate::state::AppState;

/// Full record as the API sees it (the store's native shape).
fn plan_json(record: &mandala_core::plan::PlanRecord) -> serde_json::Value {
    serde_json::json!({
        "id": record.id,
        "owner_id": record.owner_id,
        "year": record.year,
        "theme": record.theme,
        "reflection_answers": record.reflection_answers,
        "reflection_notes": record.reflection_notes,
        "center_goal": record.center_goal,
        "sub_goals": record.sub_goals,
        "action_plans": record.action_plans,
        "summary": record.summary,
        "current_step": record.current_step,
        "completed_steps": record.completed_steps,
        "complete": record.is_complete(),
        "marketing_consent": record.marketing_consent,
        "created_at": record.created_at,
        "updated_at": record.updated_at,
        "version": record.version,
    })
}

#[derive(serde::Deserialize)]
pub struct CreatePlanBody {
    pub owner_id: String,
    pub year: i32,
    #[serde(default)]
    pub marketing_consent: bool,
}

/// POST /api/plans — idempotent create for (owner, year).
pub async fn create_plan(
    State(app): State<AppState>,
    Json(body): Json<CreatePlanBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let record =
            mandala_core::store::create(&root, &body.owner_id, body.year, body.marketing_consent)?;
        Ok::<_, mandala_core::MandalaError>(plan_json(&record))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// GET /api/plans/:owner/:year — full plan record.
pub async fn get_plan(
    State(app): State<AppState>,
    Path((owner, year)): Path<(String, i32)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let record = mandala_core::store::get(&root, &owner, year)?.ok_or(
            mandala_core::MandalaError::PlanNotFound { owner, year },
        )?;
        Ok::<_, mandala_core::MandalaError>(plan_json(&record))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct AccessQuery {
    #[serde(default)]
    pub role: Option<String>,
}

/// GET /api/plans/:owner/:year/access/:step — evaluate step access.
///
/// A missing record is not an error here: a fresh user asking about step 1
/// gets `granted`, everything else `locked`.
pub async fn evaluate_step_access(
    State(app): State<AppState>,
    Path((owner, year, step)): Path<(String, i32, u32)>,
    Query(query): Query<AccessQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let step = Step::new(step)?;
    let role: Role = match query.role.as_deref() {
        Some(s) => s.parse()?,
        None => Role::Standard,
    };

    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let record = mandala_core::store::get(&root, &owner, year)?;
        let access = progression::evaluate_access(record.as_ref(), step, role, Utc::now());
        let mut body = serde_json::to_value(&access)?;
        body["step"] = serde_json::json!(step);
        body["role"] = serde_json::json!(role);
        Ok::<_, mandala_core::MandalaError>(body)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
