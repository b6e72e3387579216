//! The four services: validate input, check referential rules against the
//! store, perform the write, reshape the result.
//!
//! Services are free functions generic over [`ShopStore`](crate::store::ShopStore)
//! so they can be called from any handler state that holds a store.
//! Dependency order, leaves first: [`fault_types`], [`customers`],
//! [`vehicles`], then [`appointments`].

pub mod appointments;
pub mod customers;
pub mod fault_types;
pub mod vehicles;
