//! # Centralized Error Handling
//!
//! This module defines the application-wide error type [`AppError`] used
//! across the store, services and handlers.
//!
//! ## Error Categories
//!
//! 1. **Client Errors** (4xx)
//!    - [`UserExists`](AppError::UserExists) → 400, `{"message": ...}`
//!    - [`BookingLimit`](AppError::BookingLimit) → 400, `{"error": ...}`
//!    - [`InvalidId`](AppError::InvalidId) / [`InvalidInput`](AppError::InvalidInput) → 400
//!    - [`LoginFailed`](AppError::LoginFailed) → 401, `{"message": "Login failed"}`
//!    - [`InvalidAuthorization`](AppError::InvalidAuthorization) → 401,
//!      `{"error": true, "message": "Invalid authorization"}`
//!
//! 2. **Server Errors** (5xx)
//!    - [`Hashing`](AppError::Hashing) → 500, `{"message": "Password hashing error"}`
//!    - [`Database`](AppError::Database), [`Encoding`](AppError::Encoding),
//!      [`Config`](AppError::Config), [`Internal`](AppError::Internal) → 500
//!
//! Variants without a fixed body render as `{"error": <message>, "code": <variant>}`.
//!
//! ## Error Conversion
//!
//! - `From<mongodb::error::Error>` - driver failures become [`AppError::Database`]
//! - `From<mongodb::bson::ser::Error>` / `From<mongodb::bson::de::Error>` - document
//!   mapping failures
//! - `From<serde_json::Error>` - JSON mapping failures

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Maximum number of bookings a single booker may hold.
pub const MAX_BOOKINGS_PER_BOOKER: u64 = 2;

pub const BOOKING_LIMIT_MESSAGE: &str =
    "You have already booked 2 rooms. You cannot book any more rooms.";

/// Convenience type alias for `Result<T, AppError>`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application-wide error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Registration with an email that is already stored.
    #[error("User already exists")]
    UserExists,

    /// Unknown email, wrong password or unusable stored hash.
    ///
    /// The cause is logged but never returned to the client.
    #[error("Login failed: {0}")]
    LoginFailed(String),

    /// Missing or unverifiable bearer token.
    #[error("Invalid authorization: {0}")]
    InvalidAuthorization(String),

    /// Booker already holds [`MAX_BOOKINGS_PER_BOOKER`] bookings.
    #[error("Booking limit reached for booker {0}")]
    BookingLimit(String),

    /// Path identifier is not a valid document id.
    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Password could not be hashed.
    #[error("Password hashing error: {0}")]
    Hashing(String),

    #[error("Database error: {0}")]
    Database(String),

    /// Document (de)serialization failure.
    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::UserExists
            | AppError::BookingLimit(_)
            | AppError::InvalidId(_)
            | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::LoginFailed(_) | AppError::InvalidAuthorization(_) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Hashing(_)
            | AppError::Database(_)
            | AppError::Encoding(_)
            | AppError::Config(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a user-facing error message.
    ///
    /// Causes of login and server failures stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            AppError::UserExists => "User already exists".to_string(),
            AppError::LoginFailed(_) => "Login failed".to_string(),
            AppError::InvalidAuthorization(_) => "Invalid authorization".to_string(),
            AppError::BookingLimit(_) => BOOKING_LIMIT_MESSAGE.to_string(),
            AppError::InvalidId(id) => format!("Invalid id: {id}"),
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::Hashing(_) => "Password hashing error".to_string(),
            AppError::Database(_)
            | AppError::Encoding(_)
            | AppError::Config(_)
            | AppError::Internal(_) => "An internal error occurred".to_string(),
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::UserExists => "UserExists",
            AppError::LoginFailed(_) => "LoginFailed",
            AppError::InvalidAuthorization(_) => "InvalidAuthorization",
            AppError::BookingLimit(_) => "BookingLimit",
            AppError::InvalidId(_) => "InvalidId",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::Hashing(_) => "Hashing",
            AppError::Database(_) => "Database",
            AppError::Encoding(_) => "Encoding",
            AppError::Config(_) => "Config",
            AppError::Internal(_) => "Internal",
        }
    }

    /// JSON body sent to the client.
    pub fn body(&self) -> serde_json::Value {
        let message = self.user_message();
        match self {
            AppError::UserExists | AppError::LoginFailed(_) | AppError::Hashing(_) => {
                json!({ "message": message })
            }
            AppError::InvalidAuthorization(_) => json!({ "error": true, "message": message }),
            AppError::BookingLimit(_) => json!({ "error": message }),
            _ => json!({ "error": message, "code": self.code() }),
        }
    }
}

/// Implement Axum's `IntoResponse` for automatic error handling.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("Server error: {}", self);
        } else {
            tracing::debug!("Client error: {}", self);
        }

        (status, Json(self.body())).into_response()
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for AppError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        AppError::Encoding(format!("BSON serialization: {err}"))
    }
}

impl From<mongodb::bson::de::Error> for AppError {
    fn from(err: mongodb::bson::de::Error) -> Self {
        AppError::Encoding(format!("BSON deserialization: {err}"))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Encoding(format!("JSON error: {err}"))
    }
}
