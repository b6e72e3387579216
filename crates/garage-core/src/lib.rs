//! Core types, the store abstraction, and the service layer for the Garage
//! repair-shop scheduler.
//!
//! This crate is free of HTTP and database dependencies. Storage backends
//! implement [`store::ShopStore`]; the HTTP layer calls into [`service`].

// Native `async fn` in traits; the store trait spells out its `Send` bounds.
#![allow(async_fn_in_trait)]

pub mod appointment;
pub mod customer;
pub mod error;
pub mod fault_type;
pub mod service;
pub mod store;
pub mod vehicle;

pub use error::{Error, Result};
