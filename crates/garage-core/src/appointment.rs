//! Appointments, the booking payload, and the response shapes built from a
//! joined appointment row.
//!
//! The store returns an [`AppointmentDetail`] (appointment joined with its
//! vehicle, the vehicle's owner, and the fault type). Each read operation
//! reshapes that join differently:
//!
//! | Shape | Used by |
//! |-------|---------|
//! | [`FlatAppointment`] | create, find all, find one, update |
//! | [`AppointmentWithVehicle`] | remove, find by vehicle |
//! | [`AppointmentSummary`] | find by customer |
//! | [`AppointmentWithFaultType`] | nested inside vehicle and customer views |

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  customer::{Customer, NewCustomer},
  fault_type::FaultType,
  vehicle::{Vehicle, VehicleWithCustomer},
};

// ─── Records ─────────────────────────────────────────────────────────────────

/// A scheduled diagnosis for a vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
  pub id:             i64,
  pub vehicle_id:     i64,
  pub fault_type_id:  i64,
  pub diagnosis_date: NaiveDate,
  pub diagnosis_time: NaiveTime,
  pub request_scan:   bool,
  /// Server-assigned timestamp.
  pub created_at:     DateTime<Utc>,
}

/// Input to [`crate::store::ShopStore::insert_appointment`]. Both references
/// must already have been checked by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAppointment {
  pub vehicle_id:     i64,
  pub fault_type_id:  i64,
  pub diagnosis_date: NaiveDate,
  pub diagnosis_time: NaiveTime,
  pub request_scan:   bool,
}

/// Sparse update with already-parsed date and time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentPatch {
  pub vehicle_id:     Option<i64>,
  pub fault_type_id:  Option<i64>,
  pub diagnosis_date: Option<NaiveDate>,
  pub diagnosis_time: Option<NaiveTime>,
  pub request_scan:   Option<bool>,
}

impl AppointmentPatch {
  pub fn is_empty(&self) -> bool { *self == Self::default() }
}

// ─── Booking input ───────────────────────────────────────────────────────────

/// The vehicle part of a booking. The owner comes from the booking's
/// customer descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleDescriptor {
  pub make:          String,
  pub model:         String,
  pub license_plate: String,
}

/// Everything needed to book an appointment from scratch: the customer and
/// vehicle are upserted by their natural keys before the appointment is
/// written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
  pub vehicle:        VehicleDescriptor,
  pub customer:       NewCustomer,
  pub fault_type_id:  i64,
  /// Unparsed; see [`parse_diagnosis_date`].
  pub diagnosis_date: String,
  /// Unparsed; see [`parse_diagnosis_time`].
  pub diagnosis_time: String,
  pub request_scan:   Option<bool>,
}

/// Raw update input; date and time are parsed the same way as in a
/// [`Booking`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentChanges {
  pub vehicle_id:     Option<i64>,
  pub fault_type_id:  Option<i64>,
  pub diagnosis_date: Option<String>,
  pub diagnosis_time: Option<String>,
  pub request_scan:   Option<bool>,
}

// ─── Date and time parsing ───────────────────────────────────────────────────

/// Arbitrary fixed day a bare time-of-day is attached to before parsing.
const EPOCH_DATE: &str = "1970-01-01";

/// Datetime layouts without an offset, tried in order.
const LOCAL_FORMATS: [&str; 3] = [
  "%Y-%m-%dT%H:%M",
  "%Y-%m-%dT%H:%M:%S",
  "%Y-%m-%dT%H:%M:%S%.f",
];

fn parse_local(raw: &str) -> Option<NaiveDateTime> {
  LOCAL_FORMATS
    .iter()
    .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

fn parse_utc(raw: &str) -> Option<NaiveDateTime> {
  DateTime::parse_from_rfc3339(raw)
    .ok()
    .map(|dt| dt.with_timezone(&Utc).naive_utc())
}

/// Accepts `YYYY-MM-DD`, an ISO 8601 datetime without offset, or a full
/// RFC 3339 timestamp (its UTC date is used).
pub fn parse_diagnosis_date(raw: &str) -> Result<NaiveDate> {
  let raw = raw.trim();
  NaiveDate::parse_from_str(raw, "%Y-%m-%d")
    .ok()
    .or_else(|| parse_local(raw).map(|dt| dt.date()))
    .or_else(|| parse_utc(raw).map(|dt| dt.date()))
    .ok_or_else(|| Error::Validation("Invalid diagnosis_date format.".into()))
}

/// Parses a time-of-day by attaching it to [`EPOCH_DATE`] and reading the
/// time back. A trailing offset (`Z`, `+02:00`) is normalised to UTC.
/// Sub-second precision is dropped.
pub fn parse_diagnosis_time(raw: &str) -> Result<NaiveTime> {
  let combined = format!("{EPOCH_DATE}T{}", raw.trim());
  parse_local(&combined)
    .or_else(|| parse_utc(&combined))
    .and_then(|dt| dt.time().with_nanosecond(0))
    .ok_or_else(|| Error::Validation("Invalid diagnosis_time format.".into()))
}

// ─── Joined row and response shapes ──────────────────────────────────────────

/// An appointment joined with its vehicle, the vehicle's owner, and its fault
/// type. Never serialised directly; see the module docs for the shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentDetail {
  pub appointment: Appointment,
  pub vehicle:     Vehicle,
  pub customer:    Customer,
  pub fault_type:  FaultType,
}

/// Appointment fields at the top level, the vehicle without its owner, and
/// the owner pulled up beside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatAppointment {
  #[serde(flatten)]
  pub appointment: Appointment,
  pub fault_type:  FaultType,
  pub vehicle:     Vehicle,
  pub customer:    Customer,
}

/// Appointment with the vehicle (owner embedded) and fault type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentWithVehicle {
  #[serde(flatten)]
  pub appointment: Appointment,
  pub fault_type:  FaultType,
  pub vehicle:     VehicleWithCustomer,
}

/// Appointment with the vehicle and fault type but no customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentSummary {
  #[serde(flatten)]
  pub appointment: Appointment,
  pub fault_type:  FaultType,
  pub vehicle:     Vehicle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentWithFaultType {
  #[serde(flatten)]
  pub appointment: Appointment,
  pub fault_type:  FaultType,
}

impl AppointmentDetail {
  pub fn into_flat(self) -> FlatAppointment {
    FlatAppointment {
      appointment: self.appointment,
      fault_type:  self.fault_type,
      vehicle:     self.vehicle,
      customer:    self.customer,
    }
  }

  pub fn into_nested(self) -> AppointmentWithVehicle {
    AppointmentWithVehicle {
      appointment: self.appointment,
      fault_type:  self.fault_type,
      vehicle:     VehicleWithCustomer {
        vehicle:  self.vehicle,
        customer: self.customer,
      },
    }
  }

  pub fn into_summary(self) -> AppointmentSummary {
    AppointmentSummary {
      appointment: self.appointment,
      fault_type:  self.fault_type,
      vehicle:     self.vehicle,
    }
  }

  pub fn into_with_fault_type(self) -> AppointmentWithFaultType {
    AppointmentWithFaultType {
      appointment: self.appointment,
      fault_type:  self.fault_type,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn detail() -> AppointmentDetail {
    let created_at = DateTime::parse_from_rfc3339("2024-02-01T10:00:00Z")
      .unwrap()
      .with_timezone(&Utc);
    AppointmentDetail {
      appointment: Appointment {
        id: 7,
        vehicle_id: 3,
        fault_type_id: 1,
        diagnosis_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        diagnosis_time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
        request_scan: false,
        created_at,
      },
      vehicle: Vehicle {
        id: 3,
        make: "Toyota".into(),
        model: "Corolla".into(),
        license_plate: "ABC123".into(),
        customer_id: 2,
        created_at,
      },
      customer: Customer {
        id: 2,
        first_name: "Jane".into(),
        last_name: "Doe".into(),
        document_number: "123".into(),
        document_type: "ID".into(),
        email: "j@x.com".into(),
        phone_number: "5555550000".into(),
      },
      fault_type: FaultType {
        id: 1,
        name: "Brake noise".into(),
        description: None,
      },
    }
  }

  #[test]
  fn date_accepts_plain_and_rfc3339() {
    let expected = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    assert_eq!(parse_diagnosis_date("2024-03-01").unwrap(), expected);
    assert_eq!(
      parse_diagnosis_date("2024-03-01T00:00:00.000Z").unwrap(),
      expected
    );
  }

  #[test]
  fn date_accepts_datetime_without_offset() {
    let expected = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    assert_eq!(parse_diagnosis_date("2024-03-01T10:00:00").unwrap(), expected);
    assert_eq!(parse_diagnosis_date("2024-03-01T10:00").unwrap(), expected);
    assert_eq!(
      parse_diagnosis_date("2024-03-01T23:59:59.999").unwrap(),
      expected
    );
  }

  #[test]
  fn time_with_offset_is_normalised_to_utc() {
    assert_eq!(
      parse_diagnosis_time("09:30:00.000Z").unwrap(),
      NaiveTime::from_hms_opt(9, 30, 0).unwrap()
    );
    assert_eq!(
      parse_diagnosis_time("09:30:00+02:00").unwrap(),
      NaiveTime::from_hms_opt(7, 30, 0).unwrap()
    );
  }

  #[test]
  fn date_rejects_impossible_day() {
    let err = parse_diagnosis_date("2024-02-30").unwrap_err();
    assert!(matches!(err, Error::Validation(ref m) if m.contains("diagnosis_date")));
  }

  #[test]
  fn time_accepts_minutes_and_seconds() {
    assert_eq!(
      parse_diagnosis_time("09:30").unwrap(),
      NaiveTime::from_hms_opt(9, 30, 0).unwrap()
    );
    assert_eq!(
      parse_diagnosis_time("17:05:42").unwrap(),
      NaiveTime::from_hms_opt(17, 5, 42).unwrap()
    );
    assert_eq!(
      parse_diagnosis_time("08:00:00.250").unwrap(),
      NaiveTime::from_hms_opt(8, 0, 0).unwrap()
    );
  }

  #[test]
  fn time_rejects_out_of_range_hour() {
    let err = parse_diagnosis_time("25:00").unwrap_err();
    assert!(matches!(err, Error::Validation(ref m) if m.contains("diagnosis_time")));
    assert!(parse_diagnosis_time("half past nine").is_err());
  }

  #[test]
  fn flat_shape_lifts_customer_out_of_vehicle() {
    let json = serde_json::to_value(detail().into_flat()).unwrap();
    assert_eq!(json["id"], 7);
    assert_eq!(json["diagnosis_date"], "2024-03-01");
    assert_eq!(json["diagnosis_time"], "09:30:00");
    assert_eq!(json["vehicle"]["license_plate"], "ABC123");
    assert!(json["vehicle"].get("customer").is_none());
    assert_eq!(json["customer"]["first_name"], "Jane");
    assert_eq!(json["fault_type"]["name"], "Brake noise");
  }

  #[test]
  fn nested_shape_keeps_customer_inside_vehicle() {
    let json = serde_json::to_value(detail().into_nested()).unwrap();
    assert!(json.get("customer").is_none());
    assert_eq!(json["vehicle"]["customer"]["last_name"], "Doe");
  }

  #[test]
  fn summary_shape_has_no_customer() {
    let json = serde_json::to_value(detail().into_summary()).unwrap();
    assert!(json.get("customer").is_none());
    assert!(json["vehicle"].get("customer").is_none());
    assert_eq!(json["vehicle"]["make"], "Toyota");
  }
}
