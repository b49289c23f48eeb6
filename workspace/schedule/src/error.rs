use thiserror::Error;
use validator::ValidationErrors;

/// Error types for the schedule engine
#[derive(Error, Debug)]
pub enum ScheduleError {
    /// A payment template failed validation. Carries the field-keyed map.
    #[error("template validation failed")]
    Validation(#[from] ValidationErrors),

    /// Error from date operations
    #[error("Date error: {0}")]
    Date(String),
}

/// Result type alias for the schedule engine
pub type Result<T> = std::result::Result<T, ScheduleError>;
