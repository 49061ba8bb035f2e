//! Custom Axum extractors
//!
//! Rejections are [`ApiError`]s so every client error carries the
//! `{"message": ...}` body.

use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use crate::models::ValidationError;

/// Parse a record ID path segment: decimal, positive, non-zero.
pub fn parse_id(param: &'static str, raw: &str) -> Result<i32, ValidationError> {
    match raw.parse::<i32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ValidationError::InvalidId { param }),
    }
}

async fn id_from_parts<S>(
    parts: &mut Parts,
    state: &S,
    param: &'static str,
) -> Result<i32, ApiError>
where
    S: Send + Sync,
{
    let Path(raw): Path<String> = Path::from_request_parts(parts, state)
        .await
        .map_err(|_| ApiError::Validation(ValidationError::InvalidId { param }))?;

    Ok(parse_id(param, &raw)?)
}

/// Extract and validate a house ID from path
pub struct HouseId(pub i32);

impl<S> FromRequestParts<S> for HouseId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        id_from_parts(parts, state, "houseID").await.map(Self)
    }
}

/// Extract and validate a tree ID from path
pub struct TreeId(pub i32);

impl<S> FromRequestParts<S> for TreeId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        id_from_parts(parts, state, "treeID").await.map(Self)
    }
}

/// Decode a JSON request body. The `Content-Type` header is not consulted.
pub fn decode_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ValidationError> {
    serde_json::from_slice(bytes).map_err(|err| ValidationError::MalformedBody {
        reason: err.to_string(),
    })
}

async fn read_body<S>(req: Request, state: &S) -> Result<Bytes, ApiError>
where
    S: Send + Sync,
{
    Bytes::from_request(req, state).await.map_err(|rejection| {
        ApiError::Validation(ValidationError::MalformedBody {
            reason: rejection.body_text(),
        })
    })
}

/// JSON body whose rejection is a 400 with the standard error body
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = read_body(req, state).await?;
        Ok(Self(decode_json(&bytes)?))
    }
}

/// Body read up front but decoded later, for handlers that check a
/// precondition before looking at the payload.
pub struct DeferredJson(Bytes);

impl DeferredJson {
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, ValidationError> {
        decode_json(&self.0)
    }
}

impl<S> FromRequest<S> for DeferredJson
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        read_body(req, state).await.map(Self)
    }
}
