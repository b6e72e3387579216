//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 UTC strings (microsecond
//! precision), dates as `YYYY-MM-DD` and times as `HH:MM:SS`, so lexical
//! order in SQL matches chronological order.

use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};
use garage_core::{
  appointment::{Appointment, AppointmentDetail},
  customer::Customer,
  fault_type::FaultType,
  store::SortOrder,
  vehicle::Vehicle,
};
use rusqlite::Row;

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

/// The current instant, truncated to what survives a store round-trip.
pub fn now() -> Result<DateTime<Utc>> { decode_dt(&encode_dt(Utc::now())) }

// ─── NaiveDate / NaiveTime ───────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

pub fn encode_time(t: NaiveTime) -> String { t.format("%H:%M:%S").to_string() }

pub fn decode_time(s: &str) -> Result<NaiveTime> {
  NaiveTime::parse_from_str(s, "%H:%M:%S")
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── SortOrder ───────────────────────────────────────────────────────────────

pub fn encode_order(o: SortOrder) -> &'static str {
  match o {
    SortOrder::Ascending => "ASC",
    SortOrder::Descending => "DESC",
  }
}

// ─── Column lists ────────────────────────────────────────────────────────────
//
// Each list is read back by the matching `from_row` below, starting at a
// caller-supplied column offset so the lists can be concatenated in joins.

pub const CUSTOMER_COLUMNS: &str = "c.id, c.first_name, c.last_name, \
  c.document_number, c.document_type, c.email, c.phone_number";
pub const VEHICLE_COLUMNS: &str =
  "v.id, v.make, v.model, v.license_plate, v.customer_id, v.created_at";
pub const FAULT_TYPE_COLUMNS: &str = "f.id, f.name, f.description";
pub const APPOINTMENT_COLUMNS: &str = "a.id, a.vehicle_id, a.fault_type_id, \
  a.diagnosis_date, a.diagnosis_time, a.request_scan, a.created_at";

const CUSTOMER_WIDTH: usize = 7;
const VEHICLE_WIDTH: usize = 6;
const APPOINTMENT_WIDTH: usize = 7;

// ─── Row types ───────────────────────────────────────────────────────────────

pub fn customer_from_row(row: &Row<'_>, at: usize) -> rusqlite::Result<Customer> {
  Ok(Customer {
    id:              row.get(at)?,
    first_name:      row.get(at + 1)?,
    last_name:       row.get(at + 2)?,
    document_number: row.get(at + 3)?,
    document_type:   row.get(at + 4)?,
    email:           row.get(at + 5)?,
    phone_number:    row.get(at + 6)?,
  })
}

pub fn fault_type_from_row(row: &Row<'_>, at: usize) -> rusqlite::Result<FaultType> {
  Ok(FaultType {
    id:          row.get(at)?,
    name:        row.get(at + 1)?,
    description: row.get(at + 2)?,
  })
}

/// Raw values read directly from a `vehicles` row.
pub struct RawVehicle {
  pub id:            i64,
  pub make:          String,
  pub model:         String,
  pub license_plate: String,
  pub customer_id:   i64,
  pub created_at:    String,
}

impl RawVehicle {
  pub fn from_row(row: &Row<'_>, at: usize) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(at)?,
      make:          row.get(at + 1)?,
      model:         row.get(at + 2)?,
      license_plate: row.get(at + 3)?,
      customer_id:   row.get(at + 4)?,
      created_at:    row.get(at + 5)?,
    })
  }

  pub fn into_vehicle(self) -> Result<Vehicle> {
    Ok(Vehicle {
      id:            self.id,
      make:          self.make,
      model:         self.model,
      license_plate: self.license_plate,
      customer_id:   self.customer_id,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from an `appointments` row.
pub struct RawAppointment {
  pub id:             i64,
  pub vehicle_id:     i64,
  pub fault_type_id:  i64,
  pub diagnosis_date: String,
  pub diagnosis_time: String,
  pub request_scan:   bool,
  pub created_at:     String,
}

impl RawAppointment {
  pub fn from_row(row: &Row<'_>, at: usize) -> rusqlite::Result<Self> {
    Ok(Self {
      id:             row.get(at)?,
      vehicle_id:     row.get(at + 1)?,
      fault_type_id:  row.get(at + 2)?,
      diagnosis_date: row.get(at + 3)?,
      diagnosis_time: row.get(at + 4)?,
      request_scan:   row.get(at + 5)?,
      created_at:     row.get(at + 6)?,
    })
  }

  pub fn into_appointment(self) -> Result<Appointment> {
    Ok(Appointment {
      id:             self.id,
      vehicle_id:     self.vehicle_id,
      fault_type_id:  self.fault_type_id,
      diagnosis_date: decode_date(&self.diagnosis_date)?,
      diagnosis_time: decode_time(&self.diagnosis_time)?,
      request_scan:   self.request_scan,
      created_at:     decode_dt(&self.created_at)?,
    })
  }
}

/// An appointment row joined with its vehicle, owner and fault type, in the
/// column order `APPOINTMENT, VEHICLE, CUSTOMER, FAULT_TYPE`.
pub struct RawAppointmentDetail {
  pub appointment: RawAppointment,
  pub vehicle:     RawVehicle,
  pub customer:    Customer,
  pub fault_type:  FaultType,
}

impl RawAppointmentDetail {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    let vehicle_at = APPOINTMENT_WIDTH;
    let customer_at = vehicle_at + VEHICLE_WIDTH;
    let fault_type_at = customer_at + CUSTOMER_WIDTH;
    Ok(Self {
      appointment: RawAppointment::from_row(row, 0)?,
      vehicle:     RawVehicle::from_row(row, vehicle_at)?,
      customer:    customer_from_row(row, customer_at)?,
      fault_type:  fault_type_from_row(row, fault_type_at)?,
    })
  }

  pub fn into_detail(self) -> Result<AppointmentDetail> {
    Ok(AppointmentDetail {
      appointment: self.appointment.into_appointment()?,
      vehicle:     self.vehicle.into_vehicle()?,
      customer:    self.customer,
      fault_type:  self.fault_type,
    })
  }
}
