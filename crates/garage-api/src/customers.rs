//! Handlers for `/customers` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/customers` | Flattened overviews, by last name |
//! | `POST`   | `/customers` | 201; 400 on duplicate document number |
//! | `GET`    | `/customers/{id}` | `null` if not found |
//! | `GET`    | `/customers/phone/{phone}` | May be empty |
//! | `GET`    | `/customers/email/{email}` | 404 if not found |
//! | `PATCH`  | `/customers/{id}` | Sparse update |
//! | `DELETE` | `/customers/{id}` | 400 while any vehicle is booked |

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use garage_core::{
  customer::{
    Customer, CustomerOverview, CustomerPatch, CustomerWithVehicles, NewCustomer,
  },
  service::customers,
  store::ShopStore,
};
use serde::Deserialize;
use validator::Validate;

use crate::{
  error::ApiError,
  extract::{JsonPath, ValidatedJson},
};

// ─── Bodies ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct CustomerBody {
  #[validate(length(min = 1, max = 100))]
  pub first_name:      String,
  #[validate(length(min = 1, max = 100))]
  pub last_name:       String,
  #[validate(length(min = 1, max = 50))]
  pub document_number: String,
  #[validate(length(min = 1, max = 50))]
  pub document_type:   String,
  #[validate(email)]
  pub email:           String,
  #[validate(length(min = 10, max = 20))]
  pub phone_number:    String,
}

impl From<CustomerBody> for NewCustomer {
  fn from(b: CustomerBody) -> Self {
    NewCustomer {
      first_name:      b.first_name,
      last_name:       b.last_name,
      document_number: b.document_number,
      document_type:   b.document_type,
      email:           b.email,
      phone_number:    b.phone_number,
    }
  }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CustomerPatchBody {
  #[validate(length(min = 1, max = 100))]
  pub first_name:      Option<String>,
  #[validate(length(min = 1, max = 100))]
  pub last_name:       Option<String>,
  #[validate(length(min = 1, max = 50))]
  pub document_number: Option<String>,
  #[validate(length(min = 1, max = 50))]
  pub document_type:   Option<String>,
  #[validate(email)]
  pub email:           Option<String>,
  #[validate(length(min = 10, max = 20))]
  pub phone_number:    Option<String>,
}

impl From<CustomerPatchBody> for CustomerPatch {
  fn from(b: CustomerPatchBody) -> Self {
    CustomerPatch {
      first_name:      b.first_name,
      last_name:       b.last_name,
      document_number: b.document_number,
      document_type:   b.document_type,
      email:           b.email,
      phone_number:    b.phone_number,
    }
  }
}

// ─── Handlers ─────────────────────────────────────────────────────────────────

/// `POST /customers`
pub async fn create<S: ShopStore>(
  State(store): State<Arc<S>>,
  ValidatedJson(body): ValidatedJson<CustomerBody>,
) -> Result<impl IntoResponse, ApiError> {
  let customer: Customer = customers::create(&*store, body.into()).await?;
  Ok((StatusCode::CREATED, Json(customer)))
}

/// `GET /customers`
pub async fn list<S: ShopStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<CustomerOverview>>, ApiError> {
  Ok(Json(customers::find_all(&*store).await?))
}

/// `GET /customers/{id}`
pub async fn get_one<S: ShopStore>(
  State(store): State<Arc<S>>,
  JsonPath(id): JsonPath<i64>,
) -> Result<Json<Option<CustomerOverview>>, ApiError> {
  Ok(Json(customers::find_one(&*store, id).await?))
}

/// `GET /customers/phone/{phone}`
pub async fn by_phone<S: ShopStore>(
  State(store): State<Arc<S>>,
  JsonPath(phone): JsonPath<String>,
) -> Result<Json<Vec<CustomerWithVehicles>>, ApiError> {
  Ok(Json(customers::find_by_phone(&*store, &phone).await?))
}

/// `GET /customers/email/{email}`
pub async fn by_email<S: ShopStore>(
  State(store): State<Arc<S>>,
  JsonPath(email): JsonPath<String>,
) -> Result<Json<CustomerOverview>, ApiError> {
  Ok(Json(customers::find_by_email(&*store, &email).await?))
}

/// `PATCH /customers/{id}`
pub async fn update<S: ShopStore>(
  State(store): State<Arc<S>>,
  JsonPath(id): JsonPath<i64>,
  ValidatedJson(body): ValidatedJson<CustomerPatchBody>,
) -> Result<Json<CustomerWithVehicles>, ApiError> {
  Ok(Json(customers::update(&*store, id, body.into()).await?))
}

/// `DELETE /customers/{id}`
pub async fn remove<S: ShopStore>(
  State(store): State<Arc<S>>,
  JsonPath(id): JsonPath<i64>,
) -> Result<Json<CustomerWithVehicles>, ApiError> {
  Ok(Json(customers::remove(&*store, id).await?))
}
