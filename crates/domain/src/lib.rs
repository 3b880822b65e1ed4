//! # salon-domain
//!
//! Pure domain model for the salon car dealership client.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, time helpers
//! - Define **Cars** (the stock a dealership sells, rents and leases)
//! - Define **Users** (customers and dealers) and the payloads that create them
//! - Define **Leasing** requests and the server-computed quotes
//! - Define the **Catalog** view model (owned / rented / for-sale partitions,
//!   brand search and toggling sort order)
//! - Define **Change events** emitted when a client-side cache changes
//! - Contain all client-side validation performed before a request is issued
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod event;
pub mod id;
pub mod time;

pub mod car;
pub mod catalog;
pub mod leasing;
pub mod renter;
pub mod user;
