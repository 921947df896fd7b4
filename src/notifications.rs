//! User-visible notices for the outcome of mutating actions.
//!
//! Views push a [`Notice`] when a create, update, delete, review or export
//! finishes. Each push is also written to the log. The CLI drains the
//! queue after every command and prints what it finds.

use std::collections::VecDeque;
use std::fmt;

use crate::error::HerdError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

impl NoticeLevel {
    pub fn label(&self) -> &'static str {
        match self {
            NoticeLevel::Info => "info",
            NoticeLevel::Success => "ok",
            NoticeLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level.label(), self.message)
    }
}

/// Pending notices, oldest first.
#[derive(Debug, Default)]
pub struct Notifications {
    queue: VecDeque<Notice>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, level: NoticeLevel, message: impl Into<String>) {
        let message = message.into();
        match level {
            NoticeLevel::Error => tracing::warn!("{}", message),
            NoticeLevel::Info | NoticeLevel::Success => tracing::info!("{}", message),
        }
        self.queue.push_back(Notice { level, message });
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Info, message);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Success, message);
    }

    /// Raise an error notice from a failed action.
    pub fn error(&mut self, action: &str, err: &HerdError) {
        tracing::debug!(code = err.error_code(), "{} failed: {}", action, err);
        self.push(NoticeLevel::Error, format!("{} failed. {}", action, err.user_message()));
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Take every pending notice.
    pub fn drain(&mut self) -> Vec<Notice> {
        self.queue.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    #[test]
    fn test_push_and_drain_in_order() {
        let mut notes = Notifications::new();
        notes.info("Loading");
        notes.success("Saved");

        let drained = notes.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].level, NoticeLevel::Info);
        assert_eq!(drained[1].message, "Saved");
        assert!(notes.is_empty());
    }

    #[test]
    fn test_error_notice_uses_user_message() {
        let mut notes = Notifications::new();
        let err: HerdError = ValidationError::MissingField { field: "tag_number" }.into();
        notes.error("Adding cattle", &err);

        let notice = &notes.drain()[0];
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.message, "Adding cattle failed. Please fill in the tag number field.");
        assert_eq!(notice.to_string(), "[error] Adding cattle failed. Please fill in the tag number field.");
    }
}
