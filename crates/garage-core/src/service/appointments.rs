//! Appointment service, the composing entry point.
//!
//! Booking upserts the customer (by document number) and the vehicle (by
//! license plate), validates the fault type, parses the diagnosis date and
//! time, and only then writes the appointment. Nothing is rolled back when a
//! later step fails: upserted customer and vehicle rows stay.

use tracing::{info, warn};

use crate::{
  Error, Result,
  appointment::{
    AppointmentChanges, AppointmentDetail, AppointmentPatch, AppointmentSummary,
    AppointmentWithVehicle, Booking, FlatAppointment, NewAppointment,
    parse_diagnosis_date, parse_diagnosis_time,
  },
  store::{AppointmentQuery, ShopStore, StoreError},
  vehicle::NewVehicle,
};

const CUSTOMER_FAILURE: &str = "Error processing customer data.";
const VEHICLE_FAILURE: &str = "Error processing vehicle data.";
const INSERT_FAILURE: &str =
  "Error creating the appointment. Please check the provided data.";

fn not_found(id: i64) -> Error {
  Error::NotFound(format!("Appointment with ID {id} was not found"))
}

/// Replace a backend error with a fixed internal message, logging the cause.
fn internal<E: StoreError>(message: &'static str) -> impl FnOnce(E) -> Error {
  move |e| {
    warn!(error = %e, "{message}");
    Error::Internal(message.to_owned())
  }
}

async fn fetch_detail<S: ShopStore>(store: &S, id: i64) -> Result<AppointmentDetail> {
  store
    .get_appointment(id)
    .await
    .map_err(Error::from_store)?
    .ok_or_else(|| not_found(id))
}

/// Steps 4 and 5 of a booking: parse date/time, insert, read the joined row
/// back. Backend errors are passed through unclassified so the caller can
/// tell them apart from validation failures.
async fn insert_booked<S: ShopStore>(
  store: &S,
  vehicle_id: i64,
  fault_type_id: i64,
  raw_date: &str,
  raw_time: &str,
  request_scan: bool,
) -> Result<AppointmentDetail> {
  let diagnosis_date = parse_diagnosis_date(raw_date)?;
  let diagnosis_time = parse_diagnosis_time(raw_time)?;

  let appointment = store
    .insert_appointment(NewAppointment {
      vehicle_id,
      fault_type_id,
      diagnosis_date,
      diagnosis_time,
      request_scan,
    })
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  store
    .get_appointment(appointment.id)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?
    .ok_or_else(|| {
      Error::Internal(format!("Appointment {} vanished after insert.", appointment.id))
    })
}

// ─── Operations ──────────────────────────────────────────────────────────────

/// Book an appointment from raw customer, vehicle and fault data.
///
/// Existing customers and vehicles matched by natural key are reused as-is;
/// their stored fields are not overwritten by the booking.
pub async fn create<S: ShopStore>(store: &S, booking: Booking) -> Result<FlatAppointment> {
  let Booking {
    vehicle: vehicle_data,
    customer: customer_data,
    fault_type_id,
    diagnosis_date,
    diagnosis_time,
    request_scan,
  } = booking;

  let customer = store
    .upsert_customer(customer_data)
    .await
    .map_err(internal(CUSTOMER_FAILURE))?;

  let vehicle = store
    .upsert_vehicle(NewVehicle {
      make:          vehicle_data.make,
      model:         vehicle_data.model,
      license_plate: vehicle_data.license_plate,
      customer_id:   customer.id,
    })
    .await
    .map_err(internal(VEHICLE_FAILURE))?;

  let fault_type = store
    .get_fault_type(fault_type_id)
    .await
    .map_err(Error::from_store)?;
  if fault_type.is_none() {
    return Err(Error::Validation(format!(
      "Fault type with ID {fault_type_id} does not exist"
    )));
  }

  let inserted = insert_booked(
    store,
    vehicle.id,
    fault_type_id,
    &diagnosis_date,
    &diagnosis_time,
    request_scan.unwrap_or(false),
  )
  .await;

  match inserted {
    Ok(detail) => {
      info!(
        appointment_id = detail.appointment.id,
        vehicle_id = vehicle.id,
        customer_id = customer.id,
        "appointment booked"
      );
      Ok(detail.into_flat())
    }
    Err(e @ Error::Validation(_)) => Err(e),
    Err(e) => {
      warn!(error = %e, "{INSERT_FAILURE}");
      Err(Error::Internal(INSERT_FAILURE.to_owned()))
    }
  }
}

/// All appointments, earliest diagnosis first.
pub async fn find_all<S: ShopStore>(store: &S) -> Result<Vec<FlatAppointment>> {
  Ok(
    store
      .list_appointments(&AppointmentQuery::default())
      .await
      .map_err(Error::from_store)?
      .into_iter()
      .map(AppointmentDetail::into_flat)
      .collect(),
  )
}

pub async fn find_one<S: ShopStore>(store: &S, id: i64) -> Result<FlatAppointment> {
  Ok(fetch_detail(store, id).await?.into_flat())
}

pub async fn update<S: ShopStore>(
  store: &S,
  id: i64,
  changes: AppointmentChanges,
) -> Result<FlatAppointment> {
  fetch_detail(store, id).await?;

  if let Some(vehicle_id) = changes.vehicle_id {
    let vehicle = store.get_vehicle(vehicle_id).await.map_err(Error::from_store)?;
    if vehicle.is_none() {
      return Err(Error::Validation(format!(
        "The vehicle with ID {vehicle_id} does not exist."
      )));
    }
  }

  if let Some(fault_type_id) = changes.fault_type_id {
    let fault_type = store
      .get_fault_type(fault_type_id)
      .await
      .map_err(Error::from_store)?;
    if fault_type.is_none() {
      return Err(Error::Validation(format!(
        "The fault type with ID {fault_type_id} does not exist."
      )));
    }
  }

  let patch = AppointmentPatch {
    vehicle_id:     changes.vehicle_id,
    fault_type_id:  changes.fault_type_id,
    diagnosis_date: changes
      .diagnosis_date
      .as_deref()
      .map(parse_diagnosis_date)
      .transpose()?,
    diagnosis_time: changes
      .diagnosis_time
      .as_deref()
      .map(parse_diagnosis_time)
      .transpose()?,
    request_scan:   changes.request_scan,
  };

  if !patch.is_empty() {
    store
      .update_appointment(id, patch)
      .await
      .map_err(Error::from_store)?
      .ok_or_else(|| not_found(id))?;
  }

  find_one(store, id).await
}

/// Delete an appointment. The removed row is returned with the vehicle (and
/// its owner) nested, not flattened.
pub async fn remove<S: ShopStore>(store: &S, id: i64) -> Result<AppointmentWithVehicle> {
  let detail = fetch_detail(store, id).await?;

  if !store.delete_appointment(id).await.map_err(Error::from_store)? {
    return Err(not_found(id));
  }
  info!(appointment_id = id, "appointment deleted");
  Ok(detail.into_nested())
}

/// Appointments across every vehicle the customer owns, newest first. No
/// customer is embedded.
pub async fn find_by_customer<S: ShopStore>(
  store: &S,
  customer_id: i64,
) -> Result<Vec<AppointmentSummary>> {
  Ok(
    store
      .list_appointments(&AppointmentQuery::for_customer(customer_id).newest_first())
      .await
      .map_err(Error::from_store)?
      .into_iter()
      .map(AppointmentDetail::into_summary)
      .collect(),
  )
}

/// Appointments for one vehicle, newest first, with the owner nested in the
/// vehicle.
pub async fn find_by_vehicle<S: ShopStore>(
  store: &S,
  vehicle_id: i64,
) -> Result<Vec<AppointmentWithVehicle>> {
  Ok(
    store
      .list_appointments(&AppointmentQuery::for_vehicle(vehicle_id).newest_first())
      .await
      .map_err(Error::from_store)?
      .into_iter()
      .map(AppointmentDetail::into_nested)
      .collect(),
  )
}
