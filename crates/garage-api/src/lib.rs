//! JSON REST API for the garage service.
//!
//! Exposes an axum [`Router`] backed by any [`garage_core::store::ShopStore`].
//! Request bodies are validated here; business rules live in
//! [`garage_core::service`].
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = garage_api::api_router(Arc::new(store));
//! ```

pub mod appointments;
pub mod customers;
pub mod error;
pub mod extract;
pub mod fault_types;
pub mod vehicles;

use std::sync::Arc;

use axum::{Router, routing::get};
use garage_core::store::ShopStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be merged or nested into any parent router
/// regardless of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: ShopStore + 'static,
{
  Router::new()
    // Customers
    .route("/customers", get(customers::list::<S>).post(customers::create::<S>))
    .route(
      "/customers/{id}",
      get(customers::get_one::<S>)
        .patch(customers::update::<S>)
        .delete(customers::remove::<S>),
    )
    .route("/customers/phone/{phone}", get(customers::by_phone::<S>))
    .route("/customers/email/{email}", get(customers::by_email::<S>))
    // Vehicles
    .route("/vehicles", get(vehicles::list::<S>).post(vehicles::create::<S>))
    .route(
      "/vehicles/{id}",
      get(vehicles::get_one::<S>)
        .patch(vehicles::update::<S>)
        .delete(vehicles::remove::<S>),
    )
    .route("/vehicles/plate/{plate}", get(vehicles::by_plate::<S>))
    // Fault types
    .route(
      "/fault-types",
      get(fault_types::list::<S>).post(fault_types::create::<S>),
    )
    .route(
      "/fault-types/{id}",
      get(fault_types::get_one::<S>)
        .patch(fault_types::update::<S>)
        .delete(fault_types::remove::<S>),
    )
    // Appointments
    .route(
      "/appointments",
      get(appointments::list::<S>).post(appointments::create::<S>),
    )
    .route(
      "/appointments/{id}",
      get(appointments::get_one::<S>)
        .patch(appointments::update::<S>)
        .delete(appointments::remove::<S>),
    )
    .route(
      "/appointments/customer/{customer_id}",
      get(appointments::by_customer::<S>),
    )
    .route(
      "/appointments/vehicle/{vehicle_id}",
      get(appointments::by_vehicle::<S>),
    )
    .with_state(store)
}

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use garage_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  async fn app() -> Router {
    let store = SqliteStore::open_in_memory().await.expect("in-memory store");
    api_router(Arc::new(store))
  }

  async fn send(
    app:    &Router,
    method: &str,
    uri:    &str,
    body:   Option<Value>,
  ) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
      Some(v) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(v.to_string()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    };

    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
  }

  fn jane_doe_booking(fault_type_id: i64, time: &str) -> Value {
    json!({
      "vehicle": { "make": "Toyota", "model": "Corolla", "license_plate": "ABC123" },
      "customer": {
        "first_name": "Jane",
        "last_name": "Doe",
        "document_number": "123",
        "document_type": "ID",
        "email": "j@x.com",
        "phone_number": "5555550000"
      },
      "fault_type_id": fault_type_id,
      "diagnosis_date": "2024-03-01",
      "diagnosis_time": time
    })
  }

  async fn create_fault_type(app: &Router, name: &str) -> i64 {
    let (status, body) =
      send(app, "POST", "/fault-types", Some(json!({ "name": name }))).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_i64().unwrap()
  }

  // ── Appointments ─────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn booking_returns_201_with_flat_shape() {
    let app = app().await;
    let fault = create_fault_type(&app, "Brake noise").await;

    let (status, body) =
      send(&app, "POST", "/appointments", Some(jane_doe_booking(fault, "09:30"))).await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["diagnosis_date"], "2024-03-01");
    assert_eq!(body["diagnosis_time"], "09:30:00");
    assert_eq!(body["request_scan"], false);
    assert_eq!(body["vehicle"]["license_plate"], "ABC123");
    assert!(body["vehicle"].get("customer").is_none());
    assert_eq!(body["customer"]["first_name"], "Jane");
    assert_eq!(body["fault_type"]["name"], "Brake noise");
  }

  #[tokio::test]
  async fn booking_with_bad_time_is_400() {
    let app = app().await;
    let fault = create_fault_type(&app, "Brake noise").await;

    let (status, body) =
      send(&app, "POST", "/appointments", Some(jane_doe_booking(fault, "25:00"))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid diagnosis_time format.");
    let (_, list) = send(&app, "GET", "/appointments", None).await;
    assert_eq!(list, json!([]));
  }

  #[tokio::test]
  async fn booking_with_unknown_fault_type_is_400() {
    let app = app().await;

    let (status, body) =
      send(&app, "POST", "/appointments", Some(jane_doe_booking(7, "09:30"))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Fault type with ID 7 does not exist");
  }

  #[tokio::test]
  async fn booking_with_invalid_nested_customer_is_400() {
    let app = app().await;
    let fault = create_fault_type(&app, "Brake noise").await;
    let mut booking = jane_doe_booking(fault, "09:30");
    booking["customer"]["email"] = json!("not-an-email");

    let (status, body) = send(&app, "POST", "/appointments", Some(booking)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("email"), "{body}");
  }

  #[tokio::test]
  async fn delete_appointment_returns_nested_shape() {
    let app = app().await;
    let fault = create_fault_type(&app, "Brake noise").await;
    let (_, booked) =
      send(&app, "POST", "/appointments", Some(jane_doe_booking(fault, "09:30"))).await;
    let id = booked["id"].as_i64().unwrap();

    let (status, body) = send(&app, "DELETE", &format!("/appointments/{id}"), None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.get("customer").is_none());
    assert_eq!(body["vehicle"]["customer"]["last_name"], "Doe");

    let (status, _) = send(&app, "GET", &format!("/appointments/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn patch_appointment_rejects_unknown_fields() {
    let app = app().await;
    let fault = create_fault_type(&app, "Brake noise").await;
    let (_, booked) =
      send(&app, "POST", "/appointments", Some(jane_doe_booking(fault, "09:30"))).await;
    let id = booked["id"].as_i64().unwrap();

    let (status, _) = send(
      &app,
      "PATCH",
      &format!("/appointments/{id}"),
      Some(json!({ "mechanic": "Bob" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
      &app,
      "PATCH",
      &format!("/appointments/{id}"),
      Some(json!({ "request_scan": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["request_scan"], true);
  }

  // ── Customers ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn unknown_customer_is_null_not_404() {
    let app = app().await;
    let (status, body) = send(&app, "GET", "/customers/42", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Null);
  }

  #[tokio::test]
  async fn customer_create_validates_and_rejects_duplicates() {
    let app = app().await;
    let customer = jane_doe_booking(1, "09:30")["customer"].clone();

    let (status, body) = send(&app, "POST", "/customers", Some(customer.clone())).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");

    let (status, body) = send(&app, "POST", "/customers", Some(customer.clone())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "There is already a customer with the ID 123");

    let mut short_phone = customer;
    short_phone["document_number"] = json!("456");
    short_phone["phone_number"] = json!("123");
    let (status, _) = send(&app, "POST", "/customers", Some(short_phone)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn customer_lookup_by_email_and_phone() {
    let app = app().await;
    let customer = jane_doe_booking(1, "09:30")["customer"].clone();
    send(&app, "POST", "/customers", Some(customer)).await;

    let (status, body) = send(&app, "GET", "/customers/email/j@x.com", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["vehicles"], json!([]));
    assert_eq!(body["appointments"], json!([]));

    let (status, _) = send(&app, "GET", "/customers/email/nobody@x.com", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "GET", "/customers/phone/5555550000", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
  }

  // ── Vehicles ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn missing_vehicle_is_404_with_error_body() {
    let app = app().await;
    let (status, body) = send(&app, "GET", "/vehicles/9", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Vehicle with ID 9 was not found.");
  }

  #[tokio::test]
  async fn vehicle_plate_must_be_alphanumeric() {
    let app = app().await;
    let body = json!({
      "make": "Toyota",
      "model": "Corolla",
      "license_plate": "AB-123",
      "customer_id": 1
    });
    let (status, _) = send(&app, "POST", "/vehicles", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn unparseable_path_id_is_400_with_json_body() {
    let app = app().await;
    let req = Request::builder()
      .uri("/vehicles/abc")
      .body(Body::empty())
      .unwrap();
    let resp = app.oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let content_type = resp.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("application/json"), "{content_type}");
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].as_str().unwrap().contains("abc"), "{body}");
  }

  #[tokio::test]
  async fn malformed_json_is_400() {
    let app = app().await;
    let req = Request::builder()
      .method("POST")
      .uri("/vehicles")
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from("{not json"))
      .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  // ── Fault types ─────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn fault_type_delete_is_204_then_404() {
    let app = app().await;
    let id = create_fault_type(&app, "Oil leak").await;

    let (status, body) = send(&app, "DELETE", &format!("/fault-types/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = send(&app, "GET", &format!("/fault-types/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn fault_type_patch_null_clears_description() {
    let app = app().await;
    let (_, created) = send(
      &app,
      "POST",
      "/fault-types",
      Some(json!({ "name": "Oil leak", "description": "Drips under engine" })),
    )
    .await;
    let id = created["id"].as_i64().unwrap();
    let uri = format!("/fault-types/{id}");

    let (status, body) = send(&app, "PATCH", &uri, Some(json!({ "name": "Oil" }))).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["description"], "Drips under engine");

    let (status, body) =
      send(&app, "PATCH", &uri, Some(json!({ "description": null }))).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["name"], "Oil");
    assert_eq!(body["description"], Value::Null);
  }

  #[tokio::test]
  async fn fault_type_in_use_cannot_be_deleted() {
    let app = app().await;
    let fault = create_fault_type(&app, "Brake noise").await;
    send(&app, "POST", "/appointments", Some(jane_doe_booking(fault, "09:30"))).await;

    let (status, body) =
      send(&app, "DELETE", &format!("/fault-types/{fault}"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
      body["error"],
      "The fault type cannot be deleted because it has associated appointments."
    );
  }
}
