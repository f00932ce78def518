use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// JSON body extractor that tolerates what the front end actually sends.
///
/// The content type is not checked, and an empty body or a literal `null`
/// yields `T::default()`. Anything else must parse as `T`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LenientJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for LenientJson<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::Rejected {
                status: rejection.status(),
                message: rejection.body_text(),
            })?;

        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(T::default()));
        }

        serde_json::from_slice::<Option<T>>(&body)
            .map(|value| Self(value.unwrap_or_default()))
            .map_err(|err| ApiError::bad_request(format!("invalid JSON body: {err}")))
    }
}
