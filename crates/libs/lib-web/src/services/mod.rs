//! # Services Layer
//!
//! Business logic that sits between handlers and the store:
//!
//! ```text
//! Handlers (HTTP) → Services → Store ports → MongoDB
//! ```
//!
//! - [`account`] - registration and login
//! - [`booking`] - capped booking creation
//!
//! Plain reads and writes (house CRUD, user listing) go straight from the
//! handler to the store port.

pub mod account;
pub mod booking;

pub use account::AccountService;
pub use booking::{BookingGate, BookingService};
