use thiserror::Error;

/// Errors raised while validating loan inputs or calculator settings.
///
/// A schedule that hits the period bound is not an error; see
/// [`Schedule::truncated`](crate::Schedule::truncated).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Invalid input: {field} - {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Arithmetic overflow in {context}")]
    Overflow { context: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ScheduleError {
    pub(crate) fn invalid(field: &str, reason: &str) -> Self {
        ScheduleError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn overflow(context: &str) -> Self {
        ScheduleError::Overflow {
            context: context.into(),
        }
    }
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
