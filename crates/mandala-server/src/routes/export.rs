use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/plans/:owner/:year/export.csv — download the chart as CSV.
pub async fn export_csv(
    State(app): State<AppState>,
    Path((owner, year)): Path<(String, i32)>,
) -> Result<Response, AppError> {
    let root = app.root.clone();
    let (filename, csv) = tokio::task::spawn_blocking(move || {
        let record = mandala_core::store::get(&root, &owner, year)?.ok_or(
            mandala_core::MandalaError::PlanNotFound { owner, year },
        )?;
        let filename = format!("mandala-{}-{}.csv", record.owner_id, record.year);
        Ok::<_, mandala_core::MandalaError>((filename, mandala_core::export::to_csv(&record)))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        csv,
    )
        .into_response())
}
