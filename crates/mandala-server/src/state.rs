use std::path::PathBuf;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub root: PathBuf,
    /// Base-URL override for the report generator (tests point this at a
    /// stub server). `None` means the public endpoint.
    pub gemini_base_url: Option<String>,
    /// API-key override; `None` defers to `GEMINI_API_KEY` at call time.
    pub gemini_api_key: Option<String>,
}

impl AppState {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            gemini_base_url: None,
            gemini_api_key: None,
        }
    }
}
