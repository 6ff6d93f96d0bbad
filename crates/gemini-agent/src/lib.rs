//! `gemini-agent` — typed Rust client for the Gemini `generateContent` API,
//! used to synthesize the end-of-plan summary report.
//!
//! The contract is deliberately strict: text and structured context in, a
//! fully-populated JSON report out. A response missing any of the four
//! report fields is a hard failure; no partial summary is ever returned.

pub mod client;
pub mod error;
pub mod types;

pub use client::{GeminiClient, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use error::GeminiAgentError;
pub use types::{GeneratedReport, ReportContext};

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, GeminiAgentError>;
