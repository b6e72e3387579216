//! Extractors whose rejections use the JSON error body, plus serde and
//! `validator` helpers shared by the request bodies.

use axum::{
  Json,
  extract::{FromRequest, FromRequestParts, Path, Request},
  http::request::Parts,
};
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use validator::Validate;

use crate::error::ApiError;

/// Like [`Json`], but rejects with a 400 `{"error": ...}` body both when the
/// payload does not deserialize and when it fails validation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
  T: DeserializeOwned + Validate,
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
    let Json(value) = Json::<T>::from_request(req, state)
      .await
      .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    value.validate()?;
    Ok(Self(value))
  }
}

/// Like [`Path`], but a segment that does not parse (`/vehicles/abc`) is
/// rejected with a 400 `{"error": ...}` body.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPath<T>(pub T);

impl<T, S> FromRequestParts<S> for JsonPath<T>
where
  T: DeserializeOwned + Send,
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &S,
  ) -> Result<Self, Self::Rejection> {
    let Path(value) = Path::<T>::from_request_parts(parts, state)
      .await
      .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    Ok(Self(value))
  }
}

/// `deserialize_with` target for `Option<Option<T>>` fields: a present key
/// (even `null`) becomes `Some(..)`; pair with `#[serde(default)]` so an
/// absent key stays `None`.
pub(crate) fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  T::deserialize(deserializer).map(Some)
}

/// Plates are letters and digits only.
pub(crate) fn alphanumeric(value: &str) -> Result<(), validator::ValidationError> {
  if value.chars().all(|c| c.is_ascii_alphanumeric()) {
    Ok(())
  } else {
    Err(validator::ValidationError::new("alphanumeric"))
  }
}
