use thiserror::Error;

/// Shown in the error banner for any failed translation request, whatever the cause
pub const TRANSLATION_FAILED_MESSAGE: &str = "Translation failed. Please try again.";

/// Rejected locally before any network call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Input text cannot be empty.")]
    Empty,
    #[error("Input text cannot exceed {limit} characters.")]
    ExceedsLimit { limit: usize },
}

/// Failure of the outbound translation call
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("request to translation service failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("translation service returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("malformed translation response: {0}")]
    Malformed(String),
    #[error("translation response contained no translations")]
    NoTranslations,
}

#[derive(Debug, Error)]
pub enum WidgetError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Translation(#[from] TranslateError),
    #[error("unknown language code: {0}")]
    UnknownLanguage(String),
    #[error("unknown language mode: {0}")]
    UnknownMode(String),
}

impl WidgetError {
    /// Text for the error banner. Request failures never leak their detail.
    pub fn user_message(&self) -> String {
        match self {
            WidgetError::Validation(e) => e.to_string(),
            WidgetError::Translation(_) => TRANSLATION_FAILED_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_message_names_the_limit() {
        let err = ValidationError::ExceedsLimit { limit: 1000 };
        assert_eq!(err.to_string(), "Input text cannot exceed 1000 characters.");
    }

    #[test]
    fn request_failures_hide_their_detail() {
        let err = WidgetError::from(TranslateError::Status {
            status: reqwest::StatusCode::FORBIDDEN,
            body: "API key not valid".to_string(),
        });
        assert_eq!(err.user_message(), TRANSLATION_FAILED_MESSAGE);
        assert!(err.to_string().contains("API key not valid"));
    }
}
