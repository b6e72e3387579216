//! Handlers for `/vehicles` endpoints.

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use garage_core::{
  service::vehicles,
  store::ShopStore,
  vehicle::{NewVehicle, Vehicle, VehicleDetail, VehiclePatch, VehicleWithCustomer},
};
use serde::Deserialize;
use validator::Validate;

use crate::{
  error::ApiError,
  extract::{JsonPath, ValidatedJson, alphanumeric},
};

// ─── Bodies ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct VehicleBody {
  #[validate(length(min = 1, max = 100))]
  pub make:          String,
  #[validate(length(min = 1, max = 100))]
  pub model:         String,
  #[validate(length(min = 1, max = 20), custom = "alphanumeric")]
  pub license_plate: String,
  #[validate(range(min = 1))]
  pub customer_id:   i64,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct VehiclePatchBody {
  #[validate(length(min = 1, max = 100))]
  pub make:          Option<String>,
  #[validate(length(min = 1, max = 100))]
  pub model:         Option<String>,
  #[validate(length(min = 1, max = 20), custom = "alphanumeric")]
  pub license_plate: Option<String>,
  #[validate(range(min = 1))]
  pub customer_id:   Option<i64>,
}

// ─── Handlers ─────────────────────────────────────────────────────────────────

/// `POST /vehicles`
pub async fn create<S: ShopStore>(
  State(store): State<Arc<S>>,
  ValidatedJson(body): ValidatedJson<VehicleBody>,
) -> Result<impl IntoResponse, ApiError> {
  let input = NewVehicle {
    make:          body.make,
    model:         body.model,
    license_plate: body.license_plate,
    customer_id:   body.customer_id,
  };
  let vehicle: Vehicle = vehicles::create(&*store, input).await?;
  Ok((StatusCode::CREATED, Json(vehicle)))
}

/// `GET /vehicles`, newest first.
pub async fn list<S: ShopStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<VehicleDetail>>, ApiError> {
  Ok(Json(vehicles::find_all(&*store).await?))
}

/// `GET /vehicles/{id}`
pub async fn get_one<S: ShopStore>(
  State(store): State<Arc<S>>,
  JsonPath(id): JsonPath<i64>,
) -> Result<Json<VehicleDetail>, ApiError> {
  Ok(Json(vehicles::find_one(&*store, id).await?))
}

/// `GET /vehicles/plate/{plate}`
pub async fn by_plate<S: ShopStore>(
  State(store): State<Arc<S>>,
  JsonPath(plate): JsonPath<String>,
) -> Result<Json<VehicleDetail>, ApiError> {
  Ok(Json(vehicles::find_by_plate(&*store, &plate).await?))
}

/// `PATCH /vehicles/{id}`
pub async fn update<S: ShopStore>(
  State(store): State<Arc<S>>,
  JsonPath(id): JsonPath<i64>,
  ValidatedJson(body): ValidatedJson<VehiclePatchBody>,
) -> Result<Json<VehicleWithCustomer>, ApiError> {
  let patch = VehiclePatch {
    make:          body.make,
    model:         body.model,
    license_plate: body.license_plate,
    customer_id:   body.customer_id,
  };
  Ok(Json(vehicles::update(&*store, id, patch).await?))
}

/// `DELETE /vehicles/{id}`
pub async fn remove<S: ShopStore>(
  State(store): State<Arc<S>>,
  JsonPath(id): JsonPath<i64>,
) -> Result<Json<Vehicle>, ApiError> {
  Ok(Json(vehicles::remove(&*store, id).await?))
}
