use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::i18n::{t, Locale};

/// Engine error taxonomy. `NotFound` covers both absent rows and rows
/// outside the caller's ownership scope; callers cannot tell the two apart.
/// Variants carry message catalog keys, resolved to the requester's
/// language at the HTTP boundary.
#[derive(Debug, thiserror::Error)]
pub enum CrmError {
    #[error("not found: {0}")]
    NotFound(&'static str),
    #[error("conflict: {0}")]
    Conflict(&'static str),
    #[error("validation failed: {0}")]
    Validation(&'static str),
    #[error("unauthorized")]
    Unauthorized,
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
    #[error("connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    #[error("internal error: {0}")]
    Internal(String),
}

impl CrmError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Database(_) | Self::Pool(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Store-level failures respond with a generic message; the detail only
    /// goes to the server log.
    pub fn message(&self, locale: &Locale) -> String {
        match self {
            Self::NotFound(key) | Self::Conflict(key) | Self::Validation(key) => t(locale, key),
            Self::Unauthorized => t(locale, "crm.unauthorized"),
            Self::Database(_) | Self::Pool(_) | Self::Internal(_) => {
                t(locale, "crm.internal-error")
            }
        }
    }

    pub fn localized(self, locale: Locale) -> LocalizedError {
        LocalizedError {
            error: self,
            locale,
        }
    }
}

/// A `CrmError` paired with the request locale so `IntoResponse` can speak
/// the end-user's language.
pub struct LocalizedError {
    error: CrmError,
    locale: Locale,
}

impl IntoResponse for LocalizedError {
    fn into_response(self) -> axum::response::Response {
        let status = self.error.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            log::error!("crm operation failed: {}", self.error);
        }
        let message = self.error.message(&self.locale);
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(
            CrmError::NotFound("crm.deal-not-found").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            CrmError::Conflict("crm.lead-already-converted").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            CrmError::Validation("crm.cadence-has-no-steps").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(CrmError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            CrmError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_detail_never_reaches_the_message() {
        let locale = Locale::default();
        let error = CrmError::Internal("connection refused at 10.0.0.3:5432".into());
        let message = error.message(&locale);
        assert!(!message.contains("10.0.0.3"));
        assert_eq!(message, "Something went wrong, please try again");
    }

    #[test]
    fn business_errors_localize() {
        let pt = Locale::new("pt-BR").expect("valid");
        let error = CrmError::Conflict("crm.lead-already-converted");
        assert_eq!(error.message(&pt), "O lead já foi convertido");
    }
}
