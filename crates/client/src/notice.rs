use crate::error::ClientError;

/// Severity of a transient operator notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// An action completed.
    Success,
    /// An action or load failed.
    Error,
}

/// Dismissible notification produced by list and dialog state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity.
    pub kind: NoticeKind,
    /// Text shown to the operator.
    pub message: String,
}

impl Notice {
    /// Creates a success notice.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    /// Creates an error notice from a client error.
    #[must_use]
    pub fn error(error: &ClientError) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: error.display_message(),
        }
    }

    /// Returns whether this notice reports a failure.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}
