//! # salon-app
//!
//! Application layer: observable caches, use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `AuthApi`: session probe, login, register, logout
//!   - `CarApi`: car CRUD plus rent / return / buy / lease
//!   - `CustomerApi`: list and create customer accounts
//!   - `EventPublisher`: broadcast change events
//! - Provide the observable [`store::Store`] container every cache is held in
//! - Define **driving/inbound ports** as use-case structs:
//!   - `AuthenticationService`: current-user cache
//!   - `CarService`: car-collection cache, patched after every mutation
//!   - `CustomerService`: customer cache, loaded only for dealers
//! - Provide **in-process infrastructure** (change bus) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `salon-domain` only (plus `tokio::sync` for channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod dealership;
pub mod event_bus;
pub mod ports;
pub mod services;
pub mod store;

#[cfg(test)]
mod testing;
