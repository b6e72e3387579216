//! The `ShopStore` trait and supporting query types.
//!
//! The trait is the typed query interface over the relational store and is
//! implemented by storage backends (e.g. `garage-store-sqlite`). The service
//! layer depends on this abstraction, not on any concrete backend.
//!
//! Every method is a single store round-trip. Cross-entity rules (uniqueness
//! messages, existence checks, delete protection) live in [`crate::service`].

use std::future::Future;

use crate::{
  appointment::{Appointment, AppointmentDetail, AppointmentPatch, NewAppointment},
  customer::{Customer, CustomerPatch, NewCustomer},
  fault_type::{FaultType, FaultTypePatch, NewFaultType},
  vehicle::{NewVehicle, Vehicle, VehiclePatch},
};

// ─── Error classification ────────────────────────────────────────────────────

/// Implemented by backend error types so services can tell a rejected write
/// (unique index, foreign key) from any other failure.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn is_constraint_violation(&self) -> bool;
}

// ─── Query type ──────────────────────────────────────────────────────────────

/// Direction applied to `(diagnosis_date, diagnosis_time)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
  /// Earliest first.
  #[default]
  Ascending,
  /// Newest first.
  Descending,
}

/// Parameters for [`ShopStore::list_appointments`] and
/// [`ShopStore::count_appointments`]. All filters are conjunctive.
#[derive(Debug, Clone, Default)]
pub struct AppointmentQuery {
  pub vehicle_id:    Option<i64>,
  /// Matches appointments whose vehicle belongs to this customer.
  pub customer_id:   Option<i64>,
  pub fault_type_id: Option<i64>,
  pub order:         SortOrder,
}

impl AppointmentQuery {
  pub fn for_vehicle(vehicle_id: i64) -> Self {
    Self { vehicle_id: Some(vehicle_id), ..Self::default() }
  }

  pub fn for_customer(customer_id: i64) -> Self {
    Self { customer_id: Some(customer_id), ..Self::default() }
  }

  pub fn for_fault_type(fault_type_id: i64) -> Self {
    Self { fault_type_id: Some(fault_type_id), ..Self::default() }
  }

  pub fn newest_first(mut self) -> Self {
    self.order = SortOrder::Descending;
    self
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Garage store backend.
///
/// `update_*` methods return `None` and `delete_*` methods return `false`
/// when the row does not exist.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ShopStore: Send + Sync {
  type Error: StoreError;

  // ── Customers ─────────────────────────────────────────────────────────

  fn insert_customer(
    &self,
    input: NewCustomer,
  ) -> impl Future<Output = Result<Customer, Self::Error>> + Send + '_;

  /// Return the customer with `input.document_number`, creating it from
  /// `input` if none exists. An existing row is never modified.
  fn upsert_customer(
    &self,
    input: NewCustomer,
  ) -> impl Future<Output = Result<Customer, Self::Error>> + Send + '_;

  fn get_customer(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Customer>, Self::Error>> + Send + '_;

  fn find_customer_by_document<'a>(
    &'a self,
    document_number: &'a str,
  ) -> impl Future<Output = Result<Option<Customer>, Self::Error>> + Send + 'a;

  fn find_customer_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<Customer>, Self::Error>> + Send + 'a;

  fn find_customers_by_phone<'a>(
    &'a self,
    phone_number: &'a str,
  ) -> impl Future<Output = Result<Vec<Customer>, Self::Error>> + Send + 'a;

  /// All customers ordered by last name.
  fn list_customers(
    &self,
  ) -> impl Future<Output = Result<Vec<Customer>, Self::Error>> + Send + '_;

  fn update_customer(
    &self,
    id: i64,
    patch: CustomerPatch,
  ) -> impl Future<Output = Result<Option<Customer>, Self::Error>> + Send + '_;

  /// Deleting a customer also deletes the vehicles it owns.
  fn delete_customer(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Vehicles ──────────────────────────────────────────────────────────

  fn insert_vehicle(
    &self,
    input: NewVehicle,
  ) -> impl Future<Output = Result<Vehicle, Self::Error>> + Send + '_;

  /// Return the vehicle with `input.license_plate`, creating it from `input`
  /// if none exists. An existing row is never modified.
  fn upsert_vehicle(
    &self,
    input: NewVehicle,
  ) -> impl Future<Output = Result<Vehicle, Self::Error>> + Send + '_;

  fn get_vehicle(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Vehicle>, Self::Error>> + Send + '_;

  fn find_vehicle_by_plate<'a>(
    &'a self,
    license_plate: &'a str,
  ) -> impl Future<Output = Result<Option<Vehicle>, Self::Error>> + Send + 'a;

  /// Vehicles ordered by creation time, newest first, optionally restricted
  /// to one owner.
  fn list_vehicles(
    &self,
    customer_id: Option<i64>,
  ) -> impl Future<Output = Result<Vec<Vehicle>, Self::Error>> + Send + '_;

  fn update_vehicle(
    &self,
    id: i64,
    patch: VehiclePatch,
  ) -> impl Future<Output = Result<Option<Vehicle>, Self::Error>> + Send + '_;

  fn delete_vehicle(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Fault types ───────────────────────────────────────────────────────

  fn insert_fault_type(
    &self,
    input: NewFaultType,
  ) -> impl Future<Output = Result<FaultType, Self::Error>> + Send + '_;

  fn get_fault_type(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<FaultType>, Self::Error>> + Send + '_;

  fn find_fault_type_by_name<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<FaultType>, Self::Error>> + Send + 'a;

  /// All fault types ordered by name.
  fn list_fault_types(
    &self,
  ) -> impl Future<Output = Result<Vec<FaultType>, Self::Error>> + Send + '_;

  fn update_fault_type(
    &self,
    id: i64,
    patch: FaultTypePatch,
  ) -> impl Future<Output = Result<Option<FaultType>, Self::Error>> + Send + '_;

  fn delete_fault_type(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Appointments ──────────────────────────────────────────────────────

  fn insert_appointment(
    &self,
    input: NewAppointment,
  ) -> impl Future<Output = Result<Appointment, Self::Error>> + Send + '_;

  /// Fetch one appointment joined with vehicle, owner and fault type.
  fn get_appointment(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<AppointmentDetail>, Self::Error>> + Send + '_;

  /// Joined appointments matching `query`, ordered by diagnosis date then
  /// time in `query.order`.
  fn list_appointments<'a>(
    &'a self,
    query: &'a AppointmentQuery,
  ) -> impl Future<Output = Result<Vec<AppointmentDetail>, Self::Error>> + Send + 'a;

  fn count_appointments<'a>(
    &'a self,
    query: &'a AppointmentQuery,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + 'a;

  fn update_appointment(
    &self,
    id: i64,
    patch: AppointmentPatch,
  ) -> impl Future<Output = Result<Option<Appointment>, Self::Error>> + Send + '_;

  fn delete_appointment(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
