use axum::http::StatusCode;
use sea_orm::DbErr;
use thiserror::Error;

use crate::event::ResponseEnvelope;
use crate::messages::{Locale, Message};

/// Any possible handler errors
#[derive(Debug, Error)]
pub(crate) enum SkinsError {
    #[error("invalid request: {0:?}")]
    Validation(Message),

    #[error(transparent)]
    InvalidInput(#[from] validator::ValidationErrors),

    #[error(transparent)]
    InvalidBody(#[from] serde_json::Error),

    #[error("skin {0} not found")]
    NotFound(i32),

    #[error("DATABASE_URL not configured")]
    Configuration,

    #[error(transparent)]
    Storage(#[from] DbErr),

    #[error("method {0} not allowed")]
    MethodNotAllowed(String),
}

impl SkinsError {
    pub(crate) fn status_code(&self) -> StatusCode {
        match self {
            SkinsError::Validation(_) | SkinsError::InvalidInput(_) | SkinsError::InvalidBody(_) => {
                StatusCode::BAD_REQUEST
            }
            SkinsError::NotFound(_) => StatusCode::NOT_FOUND,
            SkinsError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            SkinsError::Configuration | SkinsError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Turn the error into an `{"error": ...}` response, worded for `locale`.
    pub(crate) fn into_envelope(self, locale: Locale) -> ResponseEnvelope {
        let status = self.status_code();
        let message = match &self {
            SkinsError::Validation(message) => locale.text(*message).to_owned(),
            SkinsError::InvalidInput(errors) => format!(
                "{} [{}]",
                locale.text(Message::InvalidFields),
                errors.to_string().replace('\n', ", ")
            ),
            SkinsError::InvalidBody(e) => format!("{}: {}", locale.text(Message::InvalidBody), e),
            SkinsError::NotFound(_) => locale.text(Message::NotFound).to_owned(),
            SkinsError::Configuration => locale.text(Message::NotConfigured).to_owned(),
            SkinsError::Storage(e) => {
                tracing::error!("Storage error occurred: {:?}", e);
                e.to_string()
            }
            SkinsError::MethodNotAllowed(_) => locale.text(Message::MethodNotAllowed).to_owned(),
        };
        ResponseEnvelope::error(status, &message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error_message(envelope: &ResponseEnvelope) -> String {
        let body: serde_json::Value = serde_json::from_str(&envelope.body).unwrap();
        body["error"].as_str().unwrap().to_owned()
    }

    #[test]
    fn maps_kinds_to_status_codes() {
        assert_eq!(
            SkinsError::Validation(Message::IdRequired).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(SkinsError::NotFound(1).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            SkinsError::Configuration.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            SkinsError::Storage(DbErr::Custom("boom".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            SkinsError::MethodNotAllowed("PATCH".into()).status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
    }

    #[test]
    fn storage_errors_surface_their_detail() {
        let envelope = SkinsError::Storage(DbErr::Custom("connection refused".into()))
            .into_envelope(Locale::En);
        assert_eq!(envelope.status_code, 500);
        assert!(error_message(&envelope).contains("connection refused"));
    }

    #[test]
    fn messages_follow_locale() {
        let en = SkinsError::NotFound(3).into_envelope(Locale::En);
        let ru = SkinsError::NotFound(3).into_envelope(Locale::Ru);
        assert_eq!(error_message(&en), "Skin not found");
        assert_eq!(error_message(&ru), "Скин не найден");
    }

    #[test]
    fn invalid_body_keeps_parser_detail() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let envelope = SkinsError::from(err).into_envelope(Locale::En);
        assert_eq!(envelope.status_code, 400);
        assert!(error_message(&envelope).starts_with("Invalid request body: "));
    }
}
