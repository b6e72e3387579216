//! Vehicle service: plate-unique vehicles that must belong to an existing
//! customer and cannot be deleted while booked.

use tracing::info;

use crate::{
  Error, Result,
  store::{AppointmentQuery, ShopStore},
  vehicle::{NewVehicle, Vehicle, VehicleDetail, VehiclePatch, VehicleWithCustomer},
};

fn not_found(id: i64) -> Error {
  Error::NotFound(format!("Vehicle with ID {id} was not found."))
}

/// Fail if `license_plate` belongs to a vehicle other than `own_id`.
async fn validate_plate<S: ShopStore>(
  store: &S,
  license_plate: &str,
  own_id: Option<i64>,
) -> Result<()> {
  let existing = store
    .find_vehicle_by_plate(license_plate)
    .await
    .map_err(Error::from_store)?;
  match existing {
    Some(v) if Some(v.id) != own_id => Err(Error::Validation(format!(
      "There is already a vehicle registered with the license plate: {license_plate}."
    ))),
    _ => Ok(()),
  }
}

async fn validate_customer<S: ShopStore>(store: &S, customer_id: i64) -> Result<()> {
  store
    .get_customer(customer_id)
    .await
    .map_err(Error::from_store)?
    .map(|_| ())
    .ok_or_else(|| Error::NotFound(format!("Customer with ID {customer_id} was not found.")))
}

/// Attach the owner and every appointment (newest first) to `vehicle`.
async fn detail_of<S: ShopStore>(store: &S, vehicle: Vehicle) -> Result<VehicleDetail> {
  let customer = store
    .get_customer(vehicle.customer_id)
    .await
    .map_err(Error::from_store)?
    .ok_or_else(|| {
      Error::Internal(format!("Vehicle {} references a missing customer.", vehicle.id))
    })?;

  let appointments = store
    .list_appointments(&AppointmentQuery::for_vehicle(vehicle.id).newest_first())
    .await
    .map_err(Error::from_store)?
    .into_iter()
    .map(|d| d.into_with_fault_type())
    .collect();

  Ok(VehicleDetail { vehicle, customer, appointments })
}

// ─── Operations ──────────────────────────────────────────────────────────────

pub async fn create<S: ShopStore>(store: &S, input: NewVehicle) -> Result<Vehicle> {
  validate_customer(store, input.customer_id).await?;
  validate_plate(store, &input.license_plate, None).await?;

  let vehicle = store.insert_vehicle(input).await.map_err(Error::from_store)?;
  info!(vehicle_id = vehicle.id, plate = %vehicle.license_plate, "vehicle created");
  Ok(vehicle)
}

/// All vehicles, newest first.
pub async fn find_all<S: ShopStore>(store: &S) -> Result<Vec<VehicleDetail>> {
  let vehicles = store.list_vehicles(None).await.map_err(Error::from_store)?;
  let mut out = Vec::with_capacity(vehicles.len());
  for vehicle in vehicles {
    out.push(detail_of(store, vehicle).await?);
  }
  Ok(out)
}

pub async fn find_one<S: ShopStore>(store: &S, id: i64) -> Result<VehicleDetail> {
  let vehicle = store
    .get_vehicle(id)
    .await
    .map_err(Error::from_store)?
    .ok_or_else(|| not_found(id))?;
  detail_of(store, vehicle).await
}

pub async fn find_by_plate<S: ShopStore>(
  store: &S,
  license_plate: &str,
) -> Result<VehicleDetail> {
  let vehicle = store
    .find_vehicle_by_plate(license_plate)
    .await
    .map_err(Error::from_store)?
    .ok_or_else(|| {
      Error::NotFound(format!("The vehicle with plate '{license_plate}' was not found."))
    })?;
  detail_of(store, vehicle).await
}

pub async fn update<S: ShopStore>(
  store: &S,
  id: i64,
  patch: VehiclePatch,
) -> Result<VehicleWithCustomer> {
  let current = store
    .get_vehicle(id)
    .await
    .map_err(Error::from_store)?
    .ok_or_else(|| not_found(id))?;

  if let Some(plate) = &patch.license_plate {
    validate_plate(store, plate, Some(id)).await?;
  }
  if let Some(customer_id) = patch.customer_id {
    validate_customer(store, customer_id).await?;
  }

  let vehicle = if patch.is_empty() {
    current
  } else {
    store
      .update_vehicle(id, patch)
      .await
      .map_err(Error::from_store)?
      .ok_or_else(|| not_found(id))?
  };

  let customer = store
    .get_customer(vehicle.customer_id)
    .await
    .map_err(Error::from_store)?
    .ok_or_else(|| {
      Error::Internal(format!("Vehicle {id} references a missing customer."))
    })?;
  Ok(VehicleWithCustomer { vehicle, customer })
}

/// Delete a vehicle without appointments and return the removed row.
pub async fn remove<S: ShopStore>(store: &S, id: i64) -> Result<Vehicle> {
  let vehicle = store
    .get_vehicle(id)
    .await
    .map_err(Error::from_store)?
    .ok_or_else(|| not_found(id))?;

  let booked = store
    .count_appointments(&AppointmentQuery::for_vehicle(id))
    .await
    .map_err(Error::from_store)?;
  if booked > 0 {
    return Err(Error::Validation(
      "The vehicle cannot be deleted because it has associated appointments.".into(),
    ));
  }

  if !store.delete_vehicle(id).await.map_err(Error::from_store)? {
    return Err(not_found(id));
  }
  info!(vehicle_id = id, "vehicle deleted");
  Ok(vehicle)
}
