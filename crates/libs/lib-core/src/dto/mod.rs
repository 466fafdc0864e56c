//! # Data Transfer Objects (DTOs)
//!
//! Request bodies, query strings and operation results exchanged over the
//! REST API. Field names are camelCase on the wire.

pub mod booking;
pub mod house;
pub mod results;
pub mod user;

pub use booking::*;
pub use house::*;
pub use results::*;
pub use user::*;
