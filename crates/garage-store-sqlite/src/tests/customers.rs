use garage_core::{
  Error,
  customer::CustomerPatch,
  error::CONFLICT_MESSAGE,
  service::{appointments, customers, fault_types, vehicles},
};

use super::{booking, named_customer, new_customer, new_fault_type, new_vehicle, store};

#[tokio::test]
async fn create_rejects_duplicate_document_number() {
  let s = store().await;
  customers::create(&s, new_customer("123", "a@x.com")).await.unwrap();

  let err = customers::create(&s, new_customer("123", "b@x.com"))
    .await
    .unwrap_err();
  match err {
    Error::Validation(msg) => {
      assert_eq!(msg, "There is already a customer with the ID 123");
    }
    other => panic!("expected validation error, got {other:?}"),
  }
  assert_eq!(customers::find_all(&s).await.unwrap().len(), 1);
}

#[tokio::test]
async fn create_with_taken_email_maps_constraint_to_validation() {
  let s = store().await;
  customers::create(&s, new_customer("1", "same@x.com")).await.unwrap();

  let err = customers::create(&s, new_customer("2", "same@x.com"))
    .await
    .unwrap_err();
  match err {
    Error::Validation(msg) => {
      assert_eq!(msg, CONFLICT_MESSAGE);
      assert!(!msg.contains("UNIQUE"), "{msg}");
    }
    other => panic!("expected validation error, got {other:?}"),
  }
}

#[tokio::test]
async fn find_one_unknown_is_none() {
  let s = store().await;
  assert!(customers::find_one(&s, 99).await.unwrap().is_none());
}

#[tokio::test]
async fn overview_lifts_appointments_out_of_vehicles() {
  let s = store().await;
  let fault = fault_types::create(&s, new_fault_type("Brakes")).await.unwrap();
  let booked = appointments::create(&s, booking(fault.id, "2024-05-01", "10:30"))
    .await
    .unwrap();
  let customer_id = booked.customer.id;
  vehicles::create(&s, new_vehicle(customer_id, "ZZZ999")).await.unwrap();

  let overview = customers::find_one(&s, customer_id).await.unwrap().unwrap();
  assert_eq!(overview.vehicles.len(), 2);
  assert_eq!(overview.appointments.len(), 1);
  assert_eq!(overview.appointments[0].appointment.id, booked.appointment.id);
  assert_eq!(overview.appointments[0].fault_type, fault);

  let json = serde_json::to_value(&overview).unwrap();
  assert_eq!(json["first_name"], "Jane");
  assert!(json["vehicles"][0].get("appointments").is_none());
  assert_eq!(json["appointments"][0]["fault_type"]["name"], "Brakes");
}

#[tokio::test]
async fn find_all_orders_by_last_name() {
  let s = store().await;
  customers::create(&s, named_customer("Smith", "1")).await.unwrap();
  customers::create(&s, named_customer("Brown", "2")).await.unwrap();

  let names: Vec<_> = customers::find_all(&s)
    .await
    .unwrap()
    .into_iter()
    .map(|o| o.customer.last_name)
    .collect();
  assert_eq!(names, ["Brown", "Smith"]);
}

#[tokio::test]
async fn find_by_email_and_phone() {
  let s = store().await;
  let first = customers::create(&s, new_customer("1", "a@x.com")).await.unwrap();
  customers::create(&s, new_customer("2", "b@x.com")).await.unwrap();

  let found = customers::find_by_email(&s, "a@x.com").await.unwrap();
  assert_eq!(found.customer, first);

  let err = customers::find_by_email(&s, "nobody@x.com").await.unwrap_err();
  assert!(matches!(err, Error::NotFound(_)), "{err:?}");

  // Both fixtures share a phone number.
  let by_phone = customers::find_by_phone(&s, "5555550000").await.unwrap();
  assert_eq!(by_phone.len(), 2);
  assert!(customers::find_by_phone(&s, "0000").await.unwrap().is_empty());
}

#[tokio::test]
async fn update_rejects_email_of_another_customer() {
  let s = store().await;
  let first = customers::create(&s, new_customer("1", "a@x.com")).await.unwrap();
  customers::create(&s, new_customer("2", "b@x.com")).await.unwrap();

  let patch = CustomerPatch { email: Some("b@x.com".into()), ..Default::default() };
  let err = customers::update(&s, first.id, patch).await.unwrap_err();
  match err {
    Error::Validation(msg) => assert!(msg.contains("b@x.com"), "{msg}"),
    other => panic!("expected validation error, got {other:?}"),
  }
}

#[tokio::test]
async fn update_rejects_document_number_of_another_customer() {
  let s = store().await;
  customers::create(&s, new_customer("1", "a@x.com")).await.unwrap();
  let second = customers::create(&s, new_customer("2", "b@x.com")).await.unwrap();

  let patch = CustomerPatch { document_number: Some("1".into()), ..Default::default() };
  let err = customers::update(&s, second.id, patch).await.unwrap_err();
  match err {
    Error::Validation(msg) => {
      assert_eq!(msg, "There is already a customer with the ID 1");
    }
    other => panic!("expected validation error, got {other:?}"),
  }

  let unchanged = customers::find_one(&s, second.id).await.unwrap().unwrap();
  assert_eq!(unchanged.customer.document_number, "2");
}

#[tokio::test]
async fn update_keeping_own_document_number_succeeds() {
  let s = store().await;
  let first = customers::create(&s, new_customer("1", "a@x.com")).await.unwrap();

  let patch = CustomerPatch {
    document_number: Some("1".into()),
    document_type: Some("Passport".into()),
    ..Default::default()
  };
  let updated = customers::update(&s, first.id, patch).await.unwrap();
  assert_eq!(updated.customer.document_type, "Passport");
}

#[tokio::test]
async fn update_keeping_own_email_succeeds() {
  let s = store().await;
  let first = customers::create(&s, new_customer("1", "a@x.com")).await.unwrap();

  let patch = CustomerPatch {
    email: Some("a@x.com".into()),
    first_name: Some("Janet".into()),
    ..Default::default()
  };
  let updated = customers::update(&s, first.id, patch).await.unwrap();
  assert_eq!(updated.customer.first_name, "Janet");
  assert!(updated.vehicles.is_empty());
}

#[tokio::test]
async fn update_unknown_is_not_found() {
  let s = store().await;
  let err = customers::update(&s, 3, CustomerPatch::default()).await.unwrap_err();
  assert!(matches!(err, Error::NotFound(_)), "{err:?}");
}

#[tokio::test]
async fn remove_blocked_while_any_vehicle_is_booked() {
  let s = store().await;
  let fault = fault_types::create(&s, new_fault_type("Brakes")).await.unwrap();
  let booked = appointments::create(&s, booking(fault.id, "2024-05-01", "10:30"))
    .await
    .unwrap();

  let err = customers::remove(&s, booked.customer.id).await.unwrap_err();
  assert!(matches!(err, Error::Validation(_)), "{err:?}");
  assert!(customers::find_one(&s, booked.customer.id).await.unwrap().is_some());
}

#[tokio::test]
async fn remove_returns_customer_with_vehicles() {
  let s = store().await;
  let customer = customers::create(&s, new_customer("1", "a@x.com")).await.unwrap();
  let vehicle = vehicles::create(&s, new_vehicle(customer.id, "ABC123")).await.unwrap();

  let removed = customers::remove(&s, customer.id).await.unwrap();
  assert_eq!(removed.customer, customer);
  assert_eq!(removed.vehicles, vec![vehicle.clone()]);

  assert!(customers::find_one(&s, customer.id).await.unwrap().is_none());
  assert!(matches!(
    vehicles::find_one(&s, vehicle.id).await,
    Err(Error::NotFound(_))
  ));
}
