use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeminiAgentError {
    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("Gemini API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Gemini response contained no candidate text")]
    EmptyResponse,

    #[error("failed to parse report JSON: {source}\n  text: {text}")]
    Parse {
        text: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("report incomplete: missing or blank '{0}'")]
    IncompleteSummary(String),
}
