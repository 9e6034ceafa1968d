use thiserror::Error;

use crate::i18n::I18n;

/// Main service error type
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Failures while carrying out a reroll against the host
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RerollError {
    #[error("Roll evaluation failed for formula '{formula}': {message}")]
    Evaluation { formula: String, message: String },

    #[error("Publishing the reroll message failed: {message}")]
    Publication { message: String },

    #[error("Host disconnected before answering request {request_id}")]
    HostDisconnected { request_id: String },

    #[error("No connection for session {session_id}")]
    NoConnection { session_id: String },

    #[error("Invalid reply to request {request_id}: {message}")]
    InvalidReply { request_id: String, message: String },
}

impl RerollError {
    pub fn error_code(&self) -> &'static str {
        match self {
            RerollError::Evaluation { .. } => "roll_evaluation_failed",
            RerollError::Publication { .. } => "message_publication_failed",
            RerollError::HostDisconnected { .. } => "host_disconnected",
            RerollError::NoConnection { .. } => "no_connection",
            RerollError::InvalidReply { .. } => "invalid_reply",
        }
    }

    /// The notification shown to the acting user.
    ///
    /// Deliberately generic; the details go to the log.
    pub fn user_message(&self, i18n: &I18n, locale: &str) -> String {
        i18n.get(locale, "reroll-failed", None)
    }
}

/// Result type alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = RerollError::Evaluation {
            formula: "1d12ro<=2".to_string(),
            message: "bad term".to_string(),
        };
        assert_eq!(err.error_code(), "roll_evaluation_failed");
        assert_eq!(
            err.to_string(),
            "Roll evaluation failed for formula '1d12ro<=2': bad term"
        );

        let err = RerollError::HostDisconnected {
            request_id: "r1".to_string(),
        };
        assert_eq!(err.error_code(), "host_disconnected");
    }

    #[test]
    fn test_user_message_is_generic() {
        let i18n = I18n::new();
        let err = RerollError::Publication {
            message: "socket closed".to_string(),
        };
        assert_eq!(
            err.user_message(&i18n, "en"),
            "GWF reroll failed. Check console (F12)."
        );
    }
}
