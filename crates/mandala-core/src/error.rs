use thiserror::Error;

#[derive(Debug, Error)]
pub enum MandalaError {
    #[error("not initialized: run 'mandala init'")]
    NotInitialized,

    #[error("plan not found for {owner} / {year}")]
    PlanNotFound { owner: String, year: i32 },

    #[error("invalid step number: {0} (must be 1-14)")]
    InvalidStep(u32),

    #[error("step {step} is locked: {reason}")]
    StepLocked { step: u8, reason: String },

    #[error("step {step} is gated until {until}")]
    StepGated { step: u8, until: String },

    #[error("invalid owner id '{0}': must be lowercase alphanumeric with hyphens")]
    InvalidOwnerId(String),

    #[error("invalid theme: {0}")]
    InvalidTheme(String),

    #[error("invalid role: {0}")]
    InvalidRole(String),

    #[error("{field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("sub-goal batch out of order: {0}")]
    BatchOutOfOrder(String),

    #[error("report summary incomplete: missing or blank '{0}'")]
    IncompleteSummary(String),

    #[error("version conflict: expected {expected}, stored record is at {actual}")]
    VersionConflict { expected: u64, actual: u64 },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MandalaError>;
