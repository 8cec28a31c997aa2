use async_trait::async_trait;
use axum::extract::{FromRequest, FromRequestParts, Multipart, Query, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use crate::api::errors::ApiError;

use super::form::ALL_FIELDS_REQUIRED;

/// Multipart body of a create/update. A body that is not multipart carries
/// none of the required fields, so it is rejected the same way.
pub(super) struct ExamMultipart(pub(super) Multipart);

#[async_trait]
impl<S> FromRequest<S> for ExamMultipart
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Multipart::from_request(req, state).await {
            Ok(multipart) => Ok(Self(multipart)),
            Err(rejection) => {
                tracing::debug!(reason = %rejection.body_text(), "Rejected non-multipart exam body");
                Err(ApiError::BadRequest(ALL_FIELDS_REQUIRED.to_string()))
            }
        }
    }
}

/// `Query` with the rejection rendered as the error envelope.
pub(super) struct ExamQuery<T>(pub(super) T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ExamQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Query::<T>::from_request_parts(parts, state)
            .await
            .map(|Query(value)| Self(value))
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
    }
}
