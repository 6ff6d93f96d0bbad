use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Report input / output
// ---------------------------------------------------------------------------

/// Everything the report prompt is built from. Deliberately plain data so
/// this crate stays independent of the domain crate.
#[derive(Debug, Clone, Default)]
pub struct ReportContext {
    pub theme: String,
    pub reflection_answers: Vec<String>,
    pub reflection_notes: Option<String>,
    pub center_goal: String,
    pub sub_goals: Vec<String>,
    /// Action plans parallel to `sub_goals`: entry `i` holds the 8 plans
    /// for sub-goal `i`.
    pub action_plans: Vec<Vec<String>>,
}

/// The structured report the model must return. Every field is required —
/// a response missing any of them fails to deserialize, which the client
/// surfaces as a hard error. No partial summary is ever produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedReport {
    pub reflection_summary: String,
    pub goal_analysis: String,
    pub keywords: Vec<String>,
    pub insights: String,
}

// ---------------------------------------------------------------------------
// Wire format: generateContent request
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationConfig {
    /// Forces the model to emit a JSON document instead of prose.
    #[serde(rename = "responseMimeType")]
    pub response_mime_type: String,
    #[serde(rename = "maxOutputTokens", skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            response_mime_type: "application/json".to_string(),
            max_output_tokens: Some(2048),
        }
    }
}

// ---------------------------------------------------------------------------
// Wire format: generateContent response
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    pub content: Content,
    #[serde(default, rename = "finishReason")]
    pub finish_reason: Option<String>,
}

impl GenerateContentResponse {
    /// The first candidate's concatenated text, if any.
    pub fn first_text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        if candidate.content.parts.is_empty() {
            return None;
        }
        Some(
            candidate
                .content
                .parts
                .iter()
                .map(|p| p.text.as_str())
                .collect::<Vec<_>>()
                .join(""),
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_camel_case_config() {
        let req = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: "hello".to_string(),
                }],
            }],
            generation_config: GenerationConfig::default(),
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"generationConfig\""));
        assert!(json.contains("\"responseMimeType\":\"application/json\""));
    }

    #[test]
    fn response_first_text_joins_parts() {
        let json = serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "{\"a\":" }, { "text": "1}" }] },
                "finishReason": "STOP"
            }]
        });
        let resp: GenerateContentResponse = serde_json::from_value(json).unwrap();
        assert_eq!(resp.first_text().as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn response_without_candidates_has_no_text() {
        let resp: GenerateContentResponse =
            serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(resp.first_text().is_none());
    }

    #[test]
    fn report_requires_all_four_fields() {
        let missing = serde_json::json!({
            "reflection_summary": "s",
            "goal_analysis": "g",
            "keywords": ["k"]
        });
        assert!(serde_json::from_value::<GeneratedReport>(missing).is_err());

        let full = serde_json::json!({
            "reflection_summary": "s",
            "goal_analysis": "g",
            "keywords": ["k"],
            "insights": "i"
        });
        let report: GeneratedReport = serde_json::from_value(full).unwrap();
        assert_eq!(report.keywords, vec!["k"]);
    }
}
