//! # Core Library
//!
//! Configuration, errors, DTOs and the document store.

pub mod config;
pub mod dto;
pub mod error;
pub mod model;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
pub use model::store::{BookingStore, HouseStore, MemoryStore, MongoStore, Store, UserStore};
