//! # Model Layer
//!
//! Stored documents and the persistence ports that read and write them.

pub mod store;
