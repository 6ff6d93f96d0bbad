use crate::error::GeminiAgentError;
use crate::types::{
    Content, GenerateContentRequest, GenerateContentResponse, GeneratedReport, GenerationConfig,
    Part, ReportContext,
};
use crate::Result;
use std::fmt::Write as _;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

// ---------------------------------------------------------------------------
// GeminiClient
// ---------------------------------------------------------------------------

/// Thin typed client for the `generateContent` endpoint. One report call in,
/// one validated [`GeneratedReport`] out; no retry, no partial result.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Read the key from `GEMINI_API_KEY`. Absence is an error here, at call
    /// time — startup does not require the key.
    pub fn from_env() -> Result<Self> {
        let api_key =
            std::env::var("GEMINI_API_KEY").map_err(|_| GeminiAgentError::MissingApiKey)?;
        if api_key.trim().is_empty() {
            return Err(GeminiAgentError::MissingApiKey);
        }
        Ok(Self::new(api_key))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Generate the synthesis report for a completed plan.
    pub async fn generate(&self, ctx: &ReportContext) -> Result<GeneratedReport> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: build_prompt(ctx),
                }],
            }],
            generation_config: GenerationConfig::default(),
        };

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        tracing::debug!(model = %self.model, "requesting plan summary report");
        let response = self.http.post(&url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeminiAgentError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: GenerateContentResponse = response.json().await?;
        let text = envelope
            .first_text()
            .ok_or(GeminiAgentError::EmptyResponse)?;

        let report: GeneratedReport =
            serde_json::from_str(&text).map_err(|source| GeminiAgentError::Parse {
                text: text.clone(),
                source,
            })?;
        validate_report(&report)?;
        Ok(report)
    }
}

// ---------------------------------------------------------------------------
// Prompt / validation
// ---------------------------------------------------------------------------

fn build_prompt(ctx: &ReportContext) -> String {
    let mut p = String::new();
    p.push_str(
        "You are reviewing a completed 14-day Mandala Chart goal plan. \
         Respond with a single JSON object containing exactly these keys: \
         \"reflection_summary\" (string), \"goal_analysis\" (string), \
         \"keywords\" (array of strings), \"insights\" (string).\n\n",
    );

    let _ = writeln!(p, "Reflection theme: {}", ctx.theme);
    for (i, answer) in ctx.reflection_answers.iter().enumerate() {
        let _ = writeln!(p, "Reflection answer {}: {}", i + 1, answer);
    }
    if let Some(notes) = &ctx.reflection_notes {
        let _ = writeln!(p, "Reflection notes: {notes}");
    }
    let _ = writeln!(p, "\nCenter goal: {}", ctx.center_goal);
    for (i, sub_goal) in ctx.sub_goals.iter().enumerate() {
        let _ = writeln!(p, "Sub-goal {}: {}", i + 1, sub_goal);
        if let Some(plans) = ctx.action_plans.get(i) {
            for plan in plans {
                let _ = writeln!(p, "  - {plan}");
            }
        }
    }
    p
}

/// Missing keys are already a parse error; blank prose fields are rejected
/// here so nothing partial reaches the record.
fn validate_report(report: &GeneratedReport) -> Result<()> {
    for (field, value) in [
        ("reflection_summary", &report.reflection_summary),
        ("goal_analysis", &report.goal_analysis),
        ("insights", &report.insights),
    ] {
        if value.trim().is_empty() {
            return Err(GeminiAgentError::IncompleteSummary(field.to_string()));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
