//! Vehicle records and their read-side shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{appointment::AppointmentWithFaultType, customer::Customer};

/// A vehicle owned by a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
  pub id:            i64,
  pub make:          String,
  pub model:         String,
  /// Unique across all vehicles.
  pub license_plate: String,
  pub customer_id:   i64,
  /// Server-assigned; vehicle listings are ordered on it, newest first.
  pub created_at:    DateTime<Utc>,
}

/// Input to [`crate::store::ShopStore::insert_vehicle`] and the booking
/// upsert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewVehicle {
  pub make:          String,
  pub model:         String,
  pub license_plate: String,
  pub customer_id:   i64,
}

/// Sparse update; only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VehiclePatch {
  pub make:          Option<String>,
  pub model:         Option<String>,
  pub license_plate: Option<String>,
  pub customer_id:   Option<i64>,
}

impl VehiclePatch {
  pub fn is_empty(&self) -> bool { *self == Self::default() }
}

/// A vehicle with its owner embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleWithCustomer {
  #[serde(flatten)]
  pub vehicle:  Vehicle,
  pub customer: Customer,
}

/// A vehicle with its appointments; intermediate shape for the customer
/// overview.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleWithAppointments {
  #[serde(flatten)]
  pub vehicle:      Vehicle,
  pub appointments: Vec<AppointmentWithFaultType>,
}

/// The full vehicle read model: owner plus every appointment (each with its
/// fault type).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleDetail {
  #[serde(flatten)]
  pub vehicle:      Vehicle,
  pub customer:     Customer,
  pub appointments: Vec<AppointmentWithFaultType>,
}
