use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::crm::error::{CrmError, LocalizedError};
use crate::i18n::locale_from_headers;

pub const OWNER_HEADER: &str = "x-owner-id";

/// Ownership scope for the current request: the principal id the session
/// layer in front of this service resolved and forwarded. Every engine call
/// threads this id into its existence checks and mutation predicates; a
/// request without it never reaches a handler.
pub struct OwnerScope(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for OwnerScope
where
    S: Send + Sync,
{
    type Rejection = LocalizedError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(OWNER_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| Uuid::parse_str(v).ok())
            .map(Self)
            .ok_or_else(|| CrmError::Unauthorized.localized(locale_from_headers(&parts.headers)))
    }
}
