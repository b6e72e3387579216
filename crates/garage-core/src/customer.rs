//! Customer records and their read-side shapes.

use serde::{Deserialize, Serialize};

use crate::{
  appointment::AppointmentWithFaultType,
  vehicle::{Vehicle, VehicleWithAppointments},
};

/// A registered shop customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
  pub id:              i64,
  pub first_name:      String,
  pub last_name:       String,
  /// Unique across all customers.
  pub document_number: String,
  pub document_type:   String,
  /// Unique across all customers.
  pub email:           String,
  pub phone_number:    String,
}

/// Input to [`crate::store::ShopStore::insert_customer`] and the booking
/// upsert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomer {
  pub first_name:      String,
  pub last_name:       String,
  pub document_number: String,
  pub document_type:   String,
  pub email:           String,
  pub phone_number:    String,
}

/// Sparse update; only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerPatch {
  pub first_name:      Option<String>,
  pub last_name:       Option<String>,
  pub document_number: Option<String>,
  pub document_type:   Option<String>,
  pub email:           Option<String>,
  pub phone_number:    Option<String>,
}

impl CustomerPatch {
  pub fn is_empty(&self) -> bool { *self == Self::default() }
}

/// A customer together with the vehicles they own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerWithVehicles {
  #[serde(flatten)]
  pub customer: Customer,
  pub vehicles: Vec<Vehicle>,
}

/// The flattened customer read model: vehicles without their appointments,
/// and every appointment across those vehicles lifted to the top level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerOverview {
  #[serde(flatten)]
  pub customer:     Customer,
  pub vehicles:     Vec<Vehicle>,
  pub appointments: Vec<AppointmentWithFaultType>,
}

impl CustomerOverview {
  /// Strip each vehicle of its embedded appointments and collect those
  /// appointments, in vehicle order, into one list.
  pub fn flatten(customer: Customer, vehicles: Vec<VehicleWithAppointments>) -> Self {
    let mut appointments = Vec::new();
    let vehicles = vehicles
      .into_iter()
      .map(|v| {
        appointments.extend(v.appointments);
        v.vehicle
      })
      .collect();

    Self { customer, vehicles, appointments }
  }
}
