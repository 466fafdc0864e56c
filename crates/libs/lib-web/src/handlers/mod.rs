//! # HTTP Request Handlers
//!
//! Axum handlers grouped by resource. Each one maps a single request onto
//! a service call or a single store operation and returns the result as JSON.
//!
//! ## Handler Modules
//!
//! - **[`users`]**: registration, login, listing, lookup, deletion
//!   - `POST /users`, `POST /users/login`, `GET /users?name=`,
//!     `GET /users/{userName}`, `DELETE /users/{id}`
//! - **[`houses`]**: listing CRUD
//!   - `POST /houses`, `GET /houses?houseName=&city=`, `GET /houses/{id}`,
//!     `PUT /houses/{id}`, `DELETE /houses/{id}`
//! - **[`booked`]**: bookings
//!   - `POST /booked`, `GET /booked`, `GET /booked/{id}`, `DELETE /booked/{id}`
//!
//! ## Error Handling
//!
//! Handlers return `lib_core::Result<Json<T>>`; the `AppError` rendering
//! decides status and body. Lookups that find nothing answer `200` with
//! `null` rather than `404`.
//!
//! No handler requires authentication.

pub mod booked;
pub mod houses;
pub mod users;

/// `GET /` liveness check.
pub async fn liveness() -> &'static str {
    "go-home server is running"
}

#[cfg(test)]
mod tests;
