//! Handlers for `/appointments` endpoints.
//!
//! Response shapes differ per operation: create, list, get and update are
//! flat (`customer` at the top level); delete and the per-vehicle listing
//! nest the customer inside `vehicle`; the per-customer listing has no
//! customer at all.

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use garage_core::{
  appointment::{
    AppointmentChanges, AppointmentSummary, AppointmentWithVehicle, Booking,
    FlatAppointment, VehicleDescriptor,
  },
  service::appointments,
  store::ShopStore,
};
use serde::Deserialize;
use validator::Validate;

use crate::{
  customers::CustomerBody,
  error::ApiError,
  extract::{JsonPath, ValidatedJson, alphanumeric},
};

// ─── Bodies ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct VehicleDescriptorBody {
  #[validate(length(min = 1, max = 100))]
  pub make:          String,
  #[validate(length(min = 1, max = 100))]
  pub model:         String,
  #[validate(length(min = 1, max = 20), custom = "alphanumeric")]
  pub license_plate: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct BookingBody {
  #[validate]
  pub vehicle:        VehicleDescriptorBody,
  #[validate]
  pub customer:       CustomerBody,
  #[validate(range(min = 1))]
  pub fault_type_id:  i64,
  #[validate(length(min = 1))]
  pub diagnosis_date: String,
  #[validate(length(min = 1))]
  pub diagnosis_time: String,
  pub request_scan:   Option<bool>,
}

impl From<BookingBody> for Booking {
  fn from(b: BookingBody) -> Self {
    Booking {
      vehicle:        VehicleDescriptor {
        make:          b.vehicle.make,
        model:         b.vehicle.model,
        license_plate: b.vehicle.license_plate,
      },
      customer:       b.customer.into(),
      fault_type_id:  b.fault_type_id,
      diagnosis_date: b.diagnosis_date,
      diagnosis_time: b.diagnosis_time,
      request_scan:   b.request_scan,
    }
  }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppointmentPatchBody {
  #[validate(range(min = 1))]
  pub vehicle_id:     Option<i64>,
  #[validate(range(min = 1))]
  pub fault_type_id:  Option<i64>,
  #[validate(length(min = 1))]
  pub diagnosis_date: Option<String>,
  #[validate(length(min = 1))]
  pub diagnosis_time: Option<String>,
  pub request_scan:   Option<bool>,
}

impl From<AppointmentPatchBody> for AppointmentChanges {
  fn from(b: AppointmentPatchBody) -> Self {
    AppointmentChanges {
      vehicle_id:     b.vehicle_id,
      fault_type_id:  b.fault_type_id,
      diagnosis_date: b.diagnosis_date,
      diagnosis_time: b.diagnosis_time,
      request_scan:   b.request_scan,
    }
  }
}

// ─── Handlers ─────────────────────────────────────────────────────────────────

/// `POST /appointments`
pub async fn create<S: ShopStore>(
  State(store): State<Arc<S>>,
  ValidatedJson(body): ValidatedJson<BookingBody>,
) -> Result<impl IntoResponse, ApiError> {
  let booked = appointments::create(&*store, body.into()).await?;
  Ok((StatusCode::CREATED, Json(booked)))
}

/// `GET /appointments`, earliest diagnosis first.
pub async fn list<S: ShopStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<FlatAppointment>>, ApiError> {
  Ok(Json(appointments::find_all(&*store).await?))
}

/// `GET /appointments/{id}`
pub async fn get_one<S: ShopStore>(
  State(store): State<Arc<S>>,
  JsonPath(id): JsonPath<i64>,
) -> Result<Json<FlatAppointment>, ApiError> {
  Ok(Json(appointments::find_one(&*store, id).await?))
}

/// `PATCH /appointments/{id}`
pub async fn update<S: ShopStore>(
  State(store): State<Arc<S>>,
  JsonPath(id): JsonPath<i64>,
  ValidatedJson(body): ValidatedJson<AppointmentPatchBody>,
) -> Result<Json<FlatAppointment>, ApiError> {
  Ok(Json(appointments::update(&*store, id, body.into()).await?))
}

/// `DELETE /appointments/{id}`
pub async fn remove<S: ShopStore>(
  State(store): State<Arc<S>>,
  JsonPath(id): JsonPath<i64>,
) -> Result<Json<AppointmentWithVehicle>, ApiError> {
  Ok(Json(appointments::remove(&*store, id).await?))
}

/// `GET /appointments/customer/{customer_id}`
pub async fn by_customer<S: ShopStore>(
  State(store): State<Arc<S>>,
  JsonPath(customer_id): JsonPath<i64>,
) -> Result<Json<Vec<AppointmentSummary>>, ApiError> {
  Ok(Json(appointments::find_by_customer(&*store, customer_id).await?))
}

/// `GET /appointments/vehicle/{vehicle_id}`
pub async fn by_vehicle<S: ShopStore>(
  State(store): State<Arc<S>>,
  JsonPath(vehicle_id): JsonPath<i64>,
) -> Result<Json<Vec<AppointmentWithVehicle>>, ApiError> {
  Ok(Json(appointments::find_by_vehicle(&*store, vehicle_id).await?))
}
