use crate::core::notifier::HandlerId;

/// Error returned by a selection handler.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct HandlerError {
    message: String,
}

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// One handler that failed during an emission pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerFailure {
    pub id: HandlerId,
    pub error: HandlerError,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PickerError {
    /// A mutating call reached a picker whose render target was already detached.
    #[error("date picker used after destroy (operation: {operation})")]
    UseAfterDestroy { operation: &'static str },

    #[error("invalid month: {month} (must be 1..=12)")]
    InvalidMonth { month: u8 },

    #[error("invalid date: {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u8, day: u8 },

    /// Selection was applied, but some handlers failed. Every handler still ran.
    #[error("{} selection handler(s) failed: {}", failures.len(), summarize(failures))]
    SubscriberFailures { failures: Vec<HandlerFailure> },
}

fn summarize(failures: &[HandlerFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("#{}: {}", f.id.get(), f.error))
        .collect::<Vec<_>>()
        .join("; ")
}

pub type PickerResult<T> = Result<T, PickerError>;
