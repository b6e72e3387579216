//! Tests for `SqliteStore` and the service layer against an in-memory
//! database.

mod customers;

use garage_core::{
  appointment::{Booking, VehicleDescriptor},
  customer::NewCustomer,
  fault_type::NewFaultType,
  vehicle::NewVehicle,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn new_customer(document_number: &str, email: &str) -> NewCustomer {
  NewCustomer {
    first_name:      "Jane".into(),
    last_name:       "Doe".into(),
    document_number: document_number.into(),
    document_type:   "ID".into(),
    email:           email.into(),
    phone_number:    "5555550000".into(),
  }
}

fn named_customer(last_name: &str, document_number: &str) -> NewCustomer {
  NewCustomer {
    last_name: last_name.into(),
    ..new_customer(document_number, &format!("{document_number}@example.com"))
  }
}

fn new_vehicle(customer_id: i64, license_plate: &str) -> NewVehicle {
  NewVehicle {
    make: "Toyota".into(),
    model: "Corolla".into(),
    license_plate: license_plate.into(),
    customer_id,
  }
}

fn new_fault_type(name: &str) -> NewFaultType {
  NewFaultType { name: name.into(), description: None }
}

fn booking(fault_type_id: i64, date: &str, time: &str) -> Booking {
  Booking {
    vehicle: VehicleDescriptor {
      make:          "Toyota".into(),
      model:         "Corolla".into(),
      license_plate: "ABC123".into(),
    },
    customer: new_customer("123", "j@x.com"),
    fault_type_id,
    diagnosis_date: date.into(),
    diagnosis_time: time.into(),
    request_scan: None,
  }
}
