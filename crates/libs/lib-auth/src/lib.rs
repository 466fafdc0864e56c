//! # Authentication Library
//!
//! Password hashing and bearer token management.

pub mod error;
pub mod pwd;
pub mod token;

// Re-export commonly used types
pub use error::{Error, Result};
pub use pwd::{hash_password, verify_password};
pub use token::{decode_token, encode_token, Claims};
