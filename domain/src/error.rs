use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("storage failure: {0}")]
    Storage(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation(message.into())
    }

    pub fn storage_error(message: impl Into<String>) -> Self {
        DomainError::Storage(message.into())
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        DomainError::Internal(message.into())
    }
}

/// Failure talking to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The backend answered with a non-success status. `message` is the text of a
    /// structured error body when one was present.
    #[error("backend responded with status {status}{}", message_suffix(.message))]
    Status { status: u16, message: Option<String> },

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("unexpected backend response: {0}")]
    Decode(String),
}

impl GatewayError {
    pub fn status(status: u16, message: Option<String>) -> Self {
        GatewayError::Status { status, message }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        GatewayError::Transport(message.into())
    }

    pub fn decode(message: impl Into<String>) -> Self {
        GatewayError::Decode(message.into())
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            GatewayError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn backend_message(&self) -> Option<&str> {
        match self {
            GatewayError::Status {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }
}

fn message_suffix(message: &Option<String>) -> String {
    match message {
        Some(message) if !message.trim().is_empty() => format!(": {message}"),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_message_ignores_blank_bodies() {
        let blank = GatewayError::status(500, Some("  ".to_string()));
        assert_eq!(blank.backend_message(), None);
        assert_eq!(blank.status_code(), Some(500));

        let structured = GatewayError::status(429, Some("queue is full".to_string()));
        assert_eq!(structured.backend_message(), Some("queue is full"));
        assert_eq!(
            structured.to_string(),
            "backend responded with status 429: queue is full"
        );
    }

    #[test]
    fn transport_errors_carry_no_status() {
        let err = GatewayError::transport("connection refused");
        assert_eq!(err.status_code(), None);
        assert!(!err.is_not_found());
        assert!(GatewayError::status(404, None).is_not_found());
    }
}
