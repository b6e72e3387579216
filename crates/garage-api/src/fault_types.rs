//! Handlers for `/fault-types` endpoints.

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use garage_core::{
  fault_type::{FaultType, FaultTypePatch, NewFaultType},
  service::fault_types,
  store::ShopStore,
};
use serde::Deserialize;
use validator::Validate;

use crate::{
  error::ApiError,
  extract::{JsonPath, ValidatedJson, present},
};

#[derive(Debug, Deserialize, Validate)]
pub struct FaultTypeBody {
  #[validate(length(min = 1, max = 100))]
  pub name:        String,
  pub description: Option<String>,
}

/// `description` distinguishes an absent key (leave as is) from an explicit
/// `null` (clear it).
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct FaultTypePatchBody {
  #[validate(length(min = 1, max = 100))]
  pub name:        Option<String>,
  #[serde(default, deserialize_with = "present")]
  pub description: Option<Option<String>>,
}

/// `POST /fault-types`
pub async fn create<S: ShopStore>(
  State(store): State<Arc<S>>,
  ValidatedJson(body): ValidatedJson<FaultTypeBody>,
) -> Result<impl IntoResponse, ApiError> {
  let input = NewFaultType { name: body.name, description: body.description };
  let fault_type = fault_types::create(&*store, input).await?;
  Ok((StatusCode::CREATED, Json(fault_type)))
}

/// `GET /fault-types`
pub async fn list<S: ShopStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<FaultType>>, ApiError> {
  Ok(Json(fault_types::find_all(&*store).await?))
}

/// `GET /fault-types/{id}`
pub async fn get_one<S: ShopStore>(
  State(store): State<Arc<S>>,
  JsonPath(id): JsonPath<i64>,
) -> Result<Json<FaultType>, ApiError> {
  Ok(Json(fault_types::find_one(&*store, id).await?))
}

/// `PATCH /fault-types/{id}`
pub async fn update<S: ShopStore>(
  State(store): State<Arc<S>>,
  JsonPath(id): JsonPath<i64>,
  ValidatedJson(body): ValidatedJson<FaultTypePatchBody>,
) -> Result<Json<FaultType>, ApiError> {
  let patch = FaultTypePatch { name: body.name, description: body.description };
  Ok(Json(fault_types::update(&*store, id, patch).await?))
}

/// `DELETE /fault-types/{id}`; 204 with no body.
pub async fn remove<S: ShopStore>(
  State(store): State<Arc<S>>,
  JsonPath(id): JsonPath<i64>,
) -> Result<StatusCode, ApiError> {
  fault_types::remove(&*store, id).await?;
  Ok(StatusCode::NO_CONTENT)
}
