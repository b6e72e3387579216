//! Customer service.
//!
//! Read operations return the flattened [`CustomerOverview`]; writes return
//! the customer with its vehicles.

use tracing::info;

use crate::{
  Error, Result,
  customer::{
    Customer, CustomerOverview, CustomerPatch, CustomerWithVehicles, NewCustomer,
  },
  store::{AppointmentQuery, ShopStore},
  vehicle::VehicleWithAppointments,
};

fn not_found(id: i64) -> Error {
  Error::NotFound(format!("Customer with ID {id} was not found."))
}

// ─── Read-model assembly ─────────────────────────────────────────────────────

async fn vehicles_of<S: ShopStore>(
  store: &S,
  customer: Customer,
) -> Result<CustomerWithVehicles> {
  let vehicles = store
    .list_vehicles(Some(customer.id))
    .await
    .map_err(Error::from_store)?;
  Ok(CustomerWithVehicles { customer, vehicles })
}

/// Fetch each vehicle's appointments (newest first, with fault type) and
/// flatten them into the overview.
async fn overview_of<S: ShopStore>(
  store: &S,
  customer: Customer,
) -> Result<CustomerOverview> {
  let CustomerWithVehicles { customer, vehicles } = vehicles_of(store, customer).await?;

  let mut nested = Vec::with_capacity(vehicles.len());
  for vehicle in vehicles {
    let appointments = store
      .list_appointments(&AppointmentQuery::for_vehicle(vehicle.id).newest_first())
      .await
      .map_err(Error::from_store)?
      .into_iter()
      .map(|d| d.into_with_fault_type())
      .collect();
    nested.push(VehicleWithAppointments { vehicle, appointments });
  }

  Ok(CustomerOverview::flatten(customer, nested))
}

// ─── Operations ──────────────────────────────────────────────────────────────

pub async fn create<S: ShopStore>(store: &S, input: NewCustomer) -> Result<Customer> {
  if !input.document_number.is_empty() {
    let existing = store
      .find_customer_by_document(&input.document_number)
      .await
      .map_err(Error::from_store)?;
    if existing.is_some() {
      return Err(Error::Validation(format!(
        "There is already a customer with the {} {}",
        input.document_type, input.document_number
      )));
    }
  }

  let customer = store.insert_customer(input).await.map_err(Error::from_store)?;
  info!(customer_id = customer.id, "customer created");
  Ok(customer)
}

/// All customers ordered by last name, each flattened.
pub async fn find_all<S: ShopStore>(store: &S) -> Result<Vec<CustomerOverview>> {
  let customers = store.list_customers().await.map_err(Error::from_store)?;
  let mut out = Vec::with_capacity(customers.len());
  for customer in customers {
    out.push(overview_of(store, customer).await?);
  }
  Ok(out)
}

/// Unlike the other lookups this does not fail for an unknown id; the
/// result is simply `None`.
pub async fn find_one<S: ShopStore>(
  store: &S,
  id: i64,
) -> Result<Option<CustomerOverview>> {
  match store.get_customer(id).await.map_err(Error::from_store)? {
    Some(customer) => Ok(Some(overview_of(store, customer).await?)),
    None => Ok(None),
  }
}

pub async fn find_by_email<S: ShopStore>(
  store: &S,
  email: &str,
) -> Result<CustomerOverview> {
  let customer = store
    .find_customer_by_email(email)
    .await
    .map_err(Error::from_store)?
    .ok_or_else(|| {
      Error::NotFound(format!("The customer with email {email} was not found."))
    })?;
  overview_of(store, customer).await
}

/// Phone numbers are not unique; an empty list is a valid answer.
pub async fn find_by_phone<S: ShopStore>(
  store: &S,
  phone: &str,
) -> Result<Vec<CustomerWithVehicles>> {
  let customers = store
    .find_customers_by_phone(phone)
    .await
    .map_err(Error::from_store)?;
  let mut out = Vec::with_capacity(customers.len());
  for customer in customers {
    out.push(vehicles_of(store, customer).await?);
  }
  Ok(out)
}

pub async fn update<S: ShopStore>(
  store: &S,
  id: i64,
  patch: CustomerPatch,
) -> Result<CustomerWithVehicles> {
  let current = store
    .get_customer(id)
    .await
    .map_err(Error::from_store)?
    .ok_or_else(|| not_found(id))?;

  if let Some(document_number) = &patch.document_number {
    let clash = store
      .find_customer_by_document(document_number)
      .await
      .map_err(Error::from_store)?;
    if clash.is_some_and(|other| other.id != id) {
      let document_type = patch
        .document_type
        .as_deref()
        .unwrap_or(&current.document_type);
      return Err(Error::Validation(format!(
        "There is already a customer with the {document_type} {document_number}"
      )));
    }
  }

  if let Some(email) = &patch.email {
    let clash = store
      .find_customer_by_email(email)
      .await
      .map_err(Error::from_store)?;
    if clash.is_some_and(|other| other.id != id) {
      return Err(Error::Validation(format!(
        "There is already another customer with the email: {email}."
      )));
    }
  }

  let customer = if patch.is_empty() {
    current
  } else {
    store
      .update_customer(id, patch)
      .await
      .map_err(Error::from_store)?
      .ok_or_else(|| not_found(id))?
  };
  vehicles_of(store, customer).await
}

/// Delete a customer (and its appointment-free vehicles). Returns what was
/// removed.
pub async fn remove<S: ShopStore>(store: &S, id: i64) -> Result<CustomerWithVehicles> {
  let customer = store
    .get_customer(id)
    .await
    .map_err(Error::from_store)?
    .ok_or_else(|| not_found(id))?;

  let booked = store
    .count_appointments(&AppointmentQuery::for_customer(id))
    .await
    .map_err(Error::from_store)?;
  if booked > 0 {
    return Err(Error::Validation(
      "The customer cannot be deleted because it has associated appointments.".into(),
    ));
  }

  let removed = vehicles_of(store, customer).await?;
  if !store.delete_customer(id).await.map_err(Error::from_store)? {
    return Err(not_found(id));
  }
  info!(customer_id = id, vehicles = removed.vehicles.len(), "customer deleted");
  Ok(removed)
}
