//! Fault type service: a name-unique lookup table that cannot be deleted
//! while appointments reference it.

use tracing::info;

use crate::{
  Error, Result,
  fault_type::{FaultType, FaultTypePatch, NewFaultType},
  store::{AppointmentQuery, ShopStore},
};

fn not_found(id: i64) -> Error {
  Error::NotFound(format!("Fault type with ID {id} was not found."))
}

fn duplicate_name(name: &str) -> Error {
  Error::Validation(format!("A fault type with the name \"{name}\" already exists."))
}

pub async fn create<S: ShopStore>(store: &S, input: NewFaultType) -> Result<FaultType> {
  let existing = store
    .find_fault_type_by_name(&input.name)
    .await
    .map_err(Error::from_store)?;
  if existing.is_some() {
    return Err(duplicate_name(&input.name));
  }

  let fault_type = store
    .insert_fault_type(input)
    .await
    .map_err(Error::from_store)?;
  info!(fault_type_id = fault_type.id, name = %fault_type.name, "fault type created");
  Ok(fault_type)
}

/// All fault types, ordered by name.
pub async fn find_all<S: ShopStore>(store: &S) -> Result<Vec<FaultType>> {
  store.list_fault_types().await.map_err(Error::from_store)
}

pub async fn find_one<S: ShopStore>(store: &S, id: i64) -> Result<FaultType> {
  store
    .get_fault_type(id)
    .await
    .map_err(Error::from_store)?
    .ok_or_else(|| not_found(id))
}

pub async fn update<S: ShopStore>(
  store: &S,
  id: i64,
  patch: FaultTypePatch,
) -> Result<FaultType> {
  let current = find_one(store, id).await?;

  if let Some(name) = &patch.name {
    let clash = store
      .find_fault_type_by_name(name)
      .await
      .map_err(Error::from_store)?;
    if clash.is_some_and(|other| other.id != id) {
      return Err(duplicate_name(name));
    }
  }

  if patch.is_empty() {
    return Ok(current);
  }

  store
    .update_fault_type(id, patch)
    .await
    .map_err(Error::from_store)?
    .ok_or_else(|| not_found(id))
}

/// Delete a fault type and return the removed row.
pub async fn remove<S: ShopStore>(store: &S, id: i64) -> Result<FaultType> {
  let fault_type = find_one(store, id).await?;

  let references = store
    .count_appointments(&AppointmentQuery::for_fault_type(id))
    .await
    .map_err(Error::from_store)?;
  if references > 0 {
    return Err(Error::Validation(
      "The fault type cannot be deleted because it has associated appointments.".into(),
    ));
  }

  if !store.delete_fault_type(id).await.map_err(Error::from_store)? {
    return Err(not_found(id));
  }
  info!(fault_type_id = id, "fault type deleted");
  Ok(fault_type)
}
