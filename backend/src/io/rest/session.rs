//! Session extractor.
//!
//! The identity provider's gateway authenticates the caller and forwards the
//! user ID in the `X-User-Id` header. Requests without it are rejected.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Json, Response},
};
use log::warn;

use crate::domain::Session;
use shared::ErrorResponse;

pub const USER_ID_HEADER: &str = "x-user-id";

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty());

        match user_id {
            Some(user_id) => Ok(Session::new(user_id)),
            None => {
                warn!("{} {} rejected: no authenticated user", parts.method, parts.uri.path());
                Err((
                    StatusCode::UNAUTHORIZED,
                    Json(ErrorResponse {
                        error: "Authentication required".to_string(),
                    }),
                )
                    .into_response())
            }
        }
    }
}
