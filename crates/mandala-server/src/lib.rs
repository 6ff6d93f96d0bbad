pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, post, put};
use axum::Router;
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(root: PathBuf) -> Router {
    build_with_state(state::AppState::new(root))
}

/// Router with explicit generator overrides, for tests that point the
/// report route at a stub server.
pub fn build_router_for_test(
    root: PathBuf,
    gemini_base_url: Option<String>,
    gemini_api_key: Option<String>,
) -> Router {
    let mut app_state = state::AppState::new(root);
    app_state.gemini_base_url = gemini_base_url;
    app_state.gemini_api_key = gemini_api_key;
    build_with_state(app_state)
}

fn build_with_state(app_state: state::AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Plans
        .route("/api/plans", post(routes::plans::create_plan))
        .route("/api/plans/{owner}/{year}", get(routes::plans::get_plan))
        .route(
            "/api/plans/{owner}/{year}/access/{step}",
            get(routes::plans::evaluate_step_access),
        )
        // Steps
        .route(
            "/api/plans/{owner}/{year}/steps/{step}",
            post(routes::steps::complete_step),
        )
        .route(
            "/api/plans/{owner}/{year}/mandala",
            put(routes::steps::edit_mandala),
        )
        // Report
        .route(
            "/api/plans/{owner}/{year}/report",
            post(routes::report::generate_report),
        )
        // Export
        .route(
            "/api/plans/{owner}/{year}/export.csv",
            get(routes::export::export_csv),
        )
        .layer(cors)
        .with_state(app_state)
}

/// Start the plan API server.
pub async fn serve(root: PathBuf, port: u16, open_browser: bool) -> anyhow::Result<()> {
    let app = build_router(root);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("mandala server listening on http://localhost:{port}");

    if open_browser {
        let url = format!("http://localhost:{port}");
        let _ = open::that(&url);
    }

    axum::serve(listener, app).await?;
    Ok(())
}

/// Start the plan API server on a pre-bound listener.
///
/// Unlike `serve`, this accepts a `TcpListener` that was already bound so the
/// caller can read the actual port before starting (useful when `port = 0` and
/// the OS picks a free port).
pub async fn serve_on(
    root: PathBuf,
    listener: tokio::net::TcpListener,
    open_browser: bool,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = build_router(root);

    tracing::info!("mandala server listening on http://localhost:{actual_port}");

    if open_browser {
        let url = format!("http://localhost:{actual_port}");
        let _ = open::that(&url);
    }

    axum::serve(listener, app).await?;
    Ok(())
}
