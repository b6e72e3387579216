//! [`SqliteStore`], the SQLite implementation of [`ShopStore`].

use std::path::Path;

use garage_core::{
  appointment::{Appointment, AppointmentDetail, AppointmentPatch, NewAppointment},
  customer::{Customer, CustomerPatch, NewCustomer},
  fault_type::{FaultType, FaultTypePatch, NewFaultType},
  store::{AppointmentQuery, ShopStore},
  vehicle::{NewVehicle, Vehicle, VehiclePatch},
};
use rusqlite::types::Value;
use tracing::debug;

use crate::{
  Result,
  encode::{
    APPOINTMENT_COLUMNS, CUSTOMER_COLUMNS, FAULT_TYPE_COLUMNS, RawAppointmentDetail,
    RawVehicle, VEHICLE_COLUMNS, customer_from_row, encode_date, encode_dt, encode_order,
    encode_time, fault_type_from_row, now,
  },
  schema::SCHEMA,
};

/// Joins every appointment to its vehicle, the vehicle's owner and its fault
/// type. Pairs with the `a`, `v`, `c`, `f` column lists.
const APPOINTMENT_JOIN: &str = "FROM appointments a
   JOIN vehicles    v ON v.id = a.vehicle_id
   JOIN customers   c ON c.id = v.customer_id
   JOIN fault_types f ON f.id = a.fault_type_id";

// ─── Synchronous query helpers ───────────────────────────────────────────────
//
// These run inside `Connection::call` closures. `filter` is the SQL text that
// follows the `FROM` clause (WHERE / ORDER BY).

fn query_customers(
  conn: &rusqlite::Connection,
  filter: &str,
  params: impl rusqlite::Params,
) -> rusqlite::Result<Vec<Customer>> {
  let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers c {filter}");
  let mut stmt = conn.prepare(&sql)?;
  let rows = stmt
    .query_map(params, |row| customer_from_row(row, 0))?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

fn query_vehicles(
  conn: &rusqlite::Connection,
  filter: &str,
  params: impl rusqlite::Params,
) -> rusqlite::Result<Vec<RawVehicle>> {
  let sql = format!("SELECT {VEHICLE_COLUMNS} FROM vehicles v {filter}");
  let mut stmt = conn.prepare(&sql)?;
  let rows = stmt
    .query_map(params, |row| RawVehicle::from_row(row, 0))?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

fn query_fault_types(
  conn: &rusqlite::Connection,
  filter: &str,
  params: impl rusqlite::Params,
) -> rusqlite::Result<Vec<FaultType>> {
  let sql = format!("SELECT {FAULT_TYPE_COLUMNS} FROM fault_types f {filter}");
  let mut stmt = conn.prepare(&sql)?;
  let rows = stmt
    .query_map(params, |row| fault_type_from_row(row, 0))?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

fn query_appointments(
  conn: &rusqlite::Connection,
  filter: &str,
  params: impl rusqlite::Params,
) -> rusqlite::Result<Vec<RawAppointmentDetail>> {
  let sql = format!(
    "SELECT {APPOINTMENT_COLUMNS}, {VEHICLE_COLUMNS}, {CUSTOMER_COLUMNS}, {FAULT_TYPE_COLUMNS}
     {APPOINTMENT_JOIN}
     {filter}"
  );
  let mut stmt = conn.prepare(&sql)?;
  let rows = stmt
    .query_map(params, RawAppointmentDetail::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

/// `UPDATE {table} SET ... WHERE id = ?` over the supplied assignments. A
/// no-op when there is nothing to assign.
fn apply_assignments(
  conn: &rusqlite::Connection,
  table: &str,
  id: i64,
  assignments: Vec<(&'static str, Value)>,
) -> rusqlite::Result<()> {
  if assignments.is_empty() {
    return Ok(());
  }

  let set_clause = assignments
    .iter()
    .enumerate()
    .map(|(i, (column, _))| format!("{column} = ?{}", i + 1))
    .collect::<Vec<_>>()
    .join(", ");
  let sql = format!(
    "UPDATE {table} SET {set_clause} WHERE id = ?{}",
    assignments.len() + 1
  );

  let mut values: Vec<Value> = assignments.into_iter().map(|(_, v)| v).collect();
  values.push(Value::Integer(id));
  conn.execute(&sql, rusqlite::params_from_iter(values))?;
  Ok(())
}

/// Build the `WHERE` clause and positional values for an
/// [`AppointmentQuery`].
fn appointment_filter(query: &AppointmentQuery) -> (String, Vec<i64>) {
  let mut conds: Vec<String> = vec![];
  let mut values: Vec<i64> = vec![];

  let filters = [
    ("a.vehicle_id", query.vehicle_id),
    ("v.customer_id", query.customer_id),
    ("a.fault_type_id", query.fault_type_id),
  ];
  for (column, value) in filters {
    if let Some(value) = value {
      values.push(value);
      conds.push(format!("{column} = ?{}", values.len()));
    }
  }

  let where_clause = if conds.is_empty() {
    String::new()
  } else {
    format!("WHERE {}", conds.join(" AND "))
  };
  (where_clause, values)
}

// ─── Patch encoding ──────────────────────────────────────────────────────────

fn customer_assignments(patch: CustomerPatch) -> Vec<(&'static str, Value)> {
  [
    ("first_name", patch.first_name),
    ("last_name", patch.last_name),
    ("document_number", patch.document_number),
    ("document_type", patch.document_type),
    ("email", patch.email),
    ("phone_number", patch.phone_number),
  ]
  .into_iter()
  .filter_map(|(column, v)| v.map(|v| (column, Value::Text(v))))
  .collect()
}

fn vehicle_assignments(patch: VehiclePatch) -> Vec<(&'static str, Value)> {
  let mut out: Vec<(&'static str, Value)> = [
    ("make", patch.make),
    ("model", patch.model),
    ("license_plate", patch.license_plate),
  ]
  .into_iter()
  .filter_map(|(column, v)| v.map(|v| (column, Value::Text(v))))
  .collect();
  if let Some(customer_id) = patch.customer_id {
    out.push(("customer_id", Value::Integer(customer_id)));
  }
  out
}

fn fault_type_assignments(patch: FaultTypePatch) -> Vec<(&'static str, Value)> {
  let mut out = vec![];
  if let Some(name) = patch.name {
    out.push(("name", Value::Text(name)));
  }
  if let Some(description) = patch.description {
    out.push(("description", description.map_or(Value::Null, Value::Text)));
  }
  out
}

fn appointment_assignments(patch: AppointmentPatch) -> Vec<(&'static str, Value)> {
  let mut out = vec![];
  if let Some(id) = patch.vehicle_id {
    out.push(("vehicle_id", Value::Integer(id)));
  }
  if let Some(id) = patch.fault_type_id {
    out.push(("fault_type_id", Value::Integer(id)));
  }
  if let Some(date) = patch.diagnosis_date {
    out.push(("diagnosis_date", Value::Text(encode_date(date))));
  }
  if let Some(time) = patch.diagnosis_time {
    out.push(("diagnosis_time", Value::Text(encode_time(time))));
  }
  if let Some(scan) = patch.request_scan {
    out.push(("request_scan", Value::Integer(scan.into())));
  }
  out
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Garage store backed by a single SQLite file.
///
/// Clones share the same background connection.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open a private in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    debug!("sqlite schema initialised");
    Ok(())
  }

  async fn vehicle_where(
    &self,
    filter: &'static str,
    params: Vec<Value>,
  ) -> Result<Vec<Vehicle>> {
    let raws = self
      .conn
      .call(move |conn| {
        Ok(query_vehicles(conn, filter, rusqlite::params_from_iter(params))?)
      })
      .await?;
    raws.into_iter().map(RawVehicle::into_vehicle).collect()
  }

  async fn customer_where(
    &self,
    filter: &'static str,
    params: Vec<Value>,
  ) -> Result<Vec<Customer>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(query_customers(conn, filter, rusqlite::params_from_iter(params))?)
        })
        .await?,
    )
  }

  async fn fault_type_where(
    &self,
    filter: &'static str,
    params: Vec<Value>,
  ) -> Result<Vec<FaultType>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(query_fault_types(conn, filter, rusqlite::params_from_iter(params))?)
        })
        .await?,
    )
  }

  async fn delete_where_id(&self, table: &'static str, id: i64) -> Result<bool> {
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          &format!("DELETE FROM {table} WHERE id = ?1"),
          rusqlite::params![id],
        )?)
      })
      .await?;
    Ok(removed > 0)
  }
}

// ─── ShopStore impl ──────────────────────────────────────────────────────────

impl ShopStore for SqliteStore {
  type Error = crate::Error;

  // ── Customers ─────────────────────────────────────────────────────────────

  async fn insert_customer(&self, input: NewCustomer) -> Result<Customer> {
    let customer = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO customers (
             first_name, last_name, document_number, document_type, email, phone_number
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            input.first_name,
            input.last_name,
            input.document_number,
            input.document_type,
            input.email,
            input.phone_number,
          ],
        )?;
        Ok(Customer {
          id:              conn.last_insert_rowid(),
          first_name:      input.first_name,
          last_name:       input.last_name,
          document_number: input.document_number,
          document_type:   input.document_type,
          email:           input.email,
          phone_number:    input.phone_number,
        })
      })
      .await?;
    Ok(customer)
  }

  async fn upsert_customer(&self, input: NewCustomer) -> Result<Customer> {
    let customer = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO customers (
             first_name, last_name, document_number, document_type, email, phone_number
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
           ON CONFLICT (document_number) DO NOTHING",
          rusqlite::params![
            input.first_name,
            input.last_name,
            input.document_number,
            input.document_type,
            input.email,
            input.phone_number,
          ],
        )?;
        let customer = query_customers(
          conn,
          "WHERE c.document_number = ?1",
          rusqlite::params![input.document_number],
        )?
        .into_iter()
        .next()
        .ok_or(rusqlite::Error::QueryReturnedNoRows)?;
        Ok(customer)
      })
      .await?;
    Ok(customer)
  }

  async fn get_customer(&self, id: i64) -> Result<Option<Customer>> {
    let found = self
      .customer_where("WHERE c.id = ?1", vec![Value::Integer(id)])
      .await?;
    Ok(found.into_iter().next())
  }

  async fn find_customer_by_document(&self, document_number: &str) -> Result<Option<Customer>> {
    let found = self
      .customer_where(
        "WHERE c.document_number = ?1",
        vec![Value::Text(document_number.to_owned())],
      )
      .await?;
    Ok(found.into_iter().next())
  }

  async fn find_customer_by_email(&self, email: &str) -> Result<Option<Customer>> {
    let found = self
      .customer_where("WHERE c.email = ?1", vec![Value::Text(email.to_owned())])
      .await?;
    Ok(found.into_iter().next())
  }

  async fn find_customers_by_phone(&self, phone_number: &str) -> Result<Vec<Customer>> {
    self
      .customer_where(
        "WHERE c.phone_number = ?1 ORDER BY c.last_name ASC, c.id ASC",
        vec![Value::Text(phone_number.to_owned())],
      )
      .await
  }

  async fn list_customers(&self) -> Result<Vec<Customer>> {
    self
      .customer_where("ORDER BY c.last_name ASC, c.id ASC", vec![])
      .await
  }

  async fn update_customer(&self, id: i64, patch: CustomerPatch) -> Result<Option<Customer>> {
    let assignments = customer_assignments(patch);
    let updated = self
      .conn
      .call(move |conn| {
        apply_assignments(conn, "customers", id, assignments)?;
        Ok(query_customers(conn, "WHERE c.id = ?1", rusqlite::params![id])?)
      })
      .await?;
    Ok(updated.into_iter().next())
  }

  async fn delete_customer(&self, id: i64) -> Result<bool> {
    self.delete_where_id("customers", id).await
  }

  // ── Vehicles ──────────────────────────────────────────────────────────────

  async fn insert_vehicle(&self, input: NewVehicle) -> Result<Vehicle> {
    let created_at = now()?;
    let created_at_str = encode_dt(created_at);

    let vehicle = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO vehicles (make, model, license_plate, customer_id, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![
            input.make,
            input.model,
            input.license_plate,
            input.customer_id,
            created_at_str,
          ],
        )?;
        Ok(Vehicle {
          id: conn.last_insert_rowid(),
          make: input.make,
          model: input.model,
          license_plate: input.license_plate,
          customer_id: input.customer_id,
          created_at,
        })
      })
      .await?;
    Ok(vehicle)
  }

  async fn upsert_vehicle(&self, input: NewVehicle) -> Result<Vehicle> {
    let created_at_str = encode_dt(now()?);

    let raw = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO vehicles (make, model, license_plate, customer_id, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)
           ON CONFLICT (license_plate) DO NOTHING",
          rusqlite::params![
            input.make,
            input.model,
            input.license_plate,
            input.customer_id,
            created_at_str,
          ],
        )?;
        let raw = query_vehicles(
          conn,
          "WHERE v.license_plate = ?1",
          rusqlite::params![input.license_plate],
        )?
        .into_iter()
        .next()
        .ok_or(rusqlite::Error::QueryReturnedNoRows)?;
        Ok(raw)
      })
      .await?;
    raw.into_vehicle()
  }

  async fn get_vehicle(&self, id: i64) -> Result<Option<Vehicle>> {
    let found = self
      .vehicle_where("WHERE v.id = ?1", vec![Value::Integer(id)])
      .await?;
    Ok(found.into_iter().next())
  }

  async fn find_vehicle_by_plate(&self, license_plate: &str) -> Result<Option<Vehicle>> {
    let found = self
      .vehicle_where(
        "WHERE v.license_plate = ?1",
        vec![Value::Text(license_plate.to_owned())],
      )
      .await?;
    Ok(found.into_iter().next())
  }

  async fn list_vehicles(&self, customer_id: Option<i64>) -> Result<Vec<Vehicle>> {
    match customer_id {
      Some(id) => {
        self
          .vehicle_where(
            "WHERE v.customer_id = ?1 ORDER BY v.created_at DESC, v.id DESC",
            vec![Value::Integer(id)],
          )
          .await
      }
      None => {
        self
          .vehicle_where("ORDER BY v.created_at DESC, v.id DESC", vec![])
          .await
      }
    }
  }

  async fn update_vehicle(&self, id: i64, patch: VehiclePatch) -> Result<Option<Vehicle>> {
    let assignments = vehicle_assignments(patch);
    let raws = self
      .conn
      .call(move |conn| {
        apply_assignments(conn, "vehicles", id, assignments)?;
        Ok(query_vehicles(conn, "WHERE v.id = ?1", rusqlite::params![id])?)
      })
      .await?;
    raws.into_iter().next().map(RawVehicle::into_vehicle).transpose()
  }

  async fn delete_vehicle(&self, id: i64) -> Result<bool> {
    self.delete_where_id("vehicles", id).await
  }

  // ── Fault types ───────────────────────────────────────────────────────────

  async fn insert_fault_type(&self, input: NewFaultType) -> Result<FaultType> {
    let fault_type = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO fault_types (name, description) VALUES (?1, ?2)",
          rusqlite::params![input.name, input.description],
        )?;
        Ok(FaultType {
          id:          conn.last_insert_rowid(),
          name:        input.name,
          description: input.description,
        })
      })
      .await?;
    Ok(fault_type)
  }

  async fn get_fault_type(&self, id: i64) -> Result<Option<FaultType>> {
    let found = self
      .fault_type_where("WHERE f.id = ?1", vec![Value::Integer(id)])
      .await?;
    Ok(found.into_iter().next())
  }

  async fn find_fault_type_by_name(&self, name: &str) -> Result<Option<FaultType>> {
    let found = self
      .fault_type_where("WHERE f.name = ?1", vec![Value::Text(name.to_owned())])
      .await?;
    Ok(found.into_iter().next())
  }

  async fn list_fault_types(&self) -> Result<Vec<FaultType>> {
    self
      .fault_type_where("ORDER BY f.name ASC, f.id ASC", vec![])
      .await
  }

  async fn update_fault_type(
    &self,
    id: i64,
    patch: FaultTypePatch,
  ) -> Result<Option<FaultType>> {
    let assignments = fault_type_assignments(patch);
    let updated = self
      .conn
      .call(move |conn| {
        apply_assignments(conn, "fault_types", id, assignments)?;
        Ok(query_fault_types(conn, "WHERE f.id = ?1", rusqlite::params![id])?)
      })
      .await?;
    Ok(updated.into_iter().next())
  }

  async fn delete_fault_type(&self, id: i64) -> Result<bool> {
    self.delete_where_id("fault_types", id).await
  }

  // ── Appointments ──────────────────────────────────────────────────────────

  async fn insert_appointment(&self, input: NewAppointment) -> Result<Appointment> {
    let created_at = now()?;
    let created_at_str = encode_dt(created_at);
    let date_str = encode_date(input.diagnosis_date);
    let time_str = encode_time(input.diagnosis_time);

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO appointments (
             vehicle_id, fault_type_id, diagnosis_date, diagnosis_time,
             request_scan, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            input.vehicle_id,
            input.fault_type_id,
            date_str,
            time_str,
            input.request_scan,
            created_at_str,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Appointment {
      id,
      vehicle_id: input.vehicle_id,
      fault_type_id: input.fault_type_id,
      diagnosis_date: input.diagnosis_date,
      diagnosis_time: input.diagnosis_time,
      request_scan: input.request_scan,
      created_at,
    })
  }

  async fn get_appointment(&self, id: i64) -> Result<Option<AppointmentDetail>> {
    let raws = self
      .conn
      .call(move |conn| {
        Ok(query_appointments(conn, "WHERE a.id = ?1", rusqlite::params![id])?)
      })
      .await?;
    raws
      .into_iter()
      .next()
      .map(RawAppointmentDetail::into_detail)
      .transpose()
  }

  async fn list_appointments(&self, query: &AppointmentQuery) -> Result<Vec<AppointmentDetail>> {
    let (where_clause, values) = appointment_filter(query);
    let dir = encode_order(query.order);
    let filter = format!(
      "{where_clause}
       ORDER BY a.diagnosis_date {dir}, a.diagnosis_time {dir}, a.id {dir}"
    );

    let raws = self
      .conn
      .call(move |conn| {
        Ok(query_appointments(conn, &filter, rusqlite::params_from_iter(values))?)
      })
      .await?;
    raws
      .into_iter()
      .map(RawAppointmentDetail::into_detail)
      .collect()
  }

  async fn count_appointments(&self, query: &AppointmentQuery) -> Result<u64> {
    let (where_clause, values) = appointment_filter(query);
    let sql = format!("SELECT COUNT(*) {APPOINTMENT_JOIN} {where_clause}");

    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(&sql, rusqlite::params_from_iter(values), |row| row.get(0))?)
      })
      .await?;
    Ok(u64::try_from(count).unwrap_or_default())
  }

  async fn update_appointment(
    &self,
    id: i64,
    patch: AppointmentPatch,
  ) -> Result<Option<Appointment>> {
    let assignments = appointment_assignments(patch);
    let raws = self
      .conn
      .call(move |conn| {
        apply_assignments(conn, "appointments", id, assignments)?;
        Ok(query_appointments(conn, "WHERE a.id = ?1", rusqlite::params![id])?)
      })
      .await?;
    raws
      .into_iter()
      .next()
      .map(|raw| raw.appointment.into_appointment())
      .transpose()
  }

  async fn delete_appointment(&self, id: i64) -> Result<bool> {
    self.delete_where_id("appointments", id).await
  }
}
