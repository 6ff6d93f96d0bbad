use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use gemini_agent::{GeminiClient, ReportContext};
use mandala_core::intent::PlanIntent;
use mandala_core::plan::{PlanRecord, ReportSummary};
use mandala_core::progression;
use mandala_core::types::Role;

use crate::error::AppError;
use crate::state::AppState;

#[derive(serde::Deserialize, Default)]
pub struct GenerateReportBody {
    #[serde(default)]
    pub role: Role,
}

fn report_context(record: &PlanRecord) -> ReportContext {
    ReportContext {
        theme: record
            .theme
            .map(|t| t.to_string())
            .unwrap_or_default(),
        reflection_answers: record.reflection_answers.values().cloned().collect(),
        reflection_notes: record.reflection_notes.clone(),
        center_goal: record.center_goal.clone().unwrap_or_default(),
        sub_goals: record.sub_goals.clone(),
        action_plans: (0..8)
            .map(|i| record.action_plans.get(&i).cloned().unwrap_or_default())
            .collect(),
    }
}

/// POST /api/plans/:owner/:year/report — generate the AI summary and
/// complete step 14.
///
/// The generator call is all-or-nothing: an upstream failure or an
/// incomplete response stores nothing and leaves progression untouched.
pub async fn generate_report(
    State(app): State<AppState>,
    Path((owner, year)): Path<(String, i32)>,
    body: Option<Json<GenerateReportBody>>,
) -> Result<Json<serde_json::Value>, AppError> {
    let role = body.map(|Json(b)| b.role).unwrap_or_default();

    // Load and check accessibility before spending an AI call.
    let root = app.root.clone();
    let load_owner = owner.clone();
    let record = tokio::task::spawn_blocking(move || {
        mandala_core::store::get(&root, &load_owner, year)?.ok_or(
            mandala_core::MandalaError::PlanNotFound {
                owner: load_owner,
                year,
            },
        )
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    let step_14 = mandala_core::types::Step::LAST;
    if !record.is_step_completed(step_14) {
        match progression::evaluate_access(Some(&record), step_14, role, Utc::now()) {
            progression::Access::Granted => {}
            progression::Access::Wait { until } => {
                return Err(mandala_core::MandalaError::StepGated {
                    step: step_14.get(),
                    until: until.to_rfc3339(),
                }
                .into());
            }
            progression::Access::Locked { reason } => {
                return Err(mandala_core::MandalaError::StepLocked {
                    step: step_14.get(),
                    reason,
                }
                .into());
            }
        }
    }

    let mut client = match &app.gemini_api_key {
        Some(key) => GeminiClient::new(key),
        None => GeminiClient::from_env()?,
    };
    if let Some(base_url) = &app.gemini_base_url {
        client = client.with_base_url(base_url.clone());
    }

    let generated = client.generate(&report_context(&record)).await?;
    let summary = ReportSummary {
        reflection_summary: generated.reflection_summary,
        goal_analysis: generated.goal_analysis,
        keywords: generated.keywords,
        insights: generated.insights,
    };

    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut record = record;
        let expected_version = record.version;
        let intent = PlanIntent::ReportGenerated { summary };
        progression::complete_step(&mut record, &intent, role, Utc::now())?;
        let stored = mandala_core::store::update(&root, &record, expected_version)?;
        Ok::<_, mandala_core::MandalaError>(serde_json::json!({
            "owner_id": stored.owner_id,
            "year": stored.year,
            "summary": stored.summary,
            "current_step": stored.current_step,
            "completed_steps": stored.completed_steps,
            "complete": stored.is_complete(),
            "version": stored.version,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
