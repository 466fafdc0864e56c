//! # Document Store
//!
//! Persistence ports for the three collections and their adapters.
//!
//! Handlers never talk to a driver directly. They hold `Arc<dyn UserStore>`,
//! `Arc<dyn HouseStore>` and `Arc<dyn BookingStore>`, which at runtime are
//! all backed by a single [`MongoStore`]. Tests swap in [`MemoryStore`].

// region: --- Modules
pub mod memory;
pub mod models;
pub mod mongo;
// endregion: --- Modules

// region: --- Re-exports
pub use memory::MemoryStore;
pub use models::{
    contains_ci, parse_object_id, Booking, BookingForCreate, Fields, House, HouseFilter,
    HouseForCreate, HouseForUpdate, User, UserForCreate, HOUSE_FIELDS,
};
pub use mongo::MongoStore;
// endregion: --- Re-exports

// region: --- Ports
use crate::dto::{DeleteResult, InsertResult, UpdateResult};
use crate::error::Result;
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

pub const USERS_COLLECTION: &str = "users";
pub const HOUSES_COLLECTION: &str = "houses";
pub const BOOKED_COLLECTION: &str = "booked";

/// Persistence for registered users.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert_user(&self, user: UserForCreate) -> Result<InsertResult>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Exact match on `userName`.
    async fn find_user_by_user_name(&self, user_name: &str) -> Result<Option<User>>;

    /// All users, optionally narrowed by a case-insensitive substring of `name`.
    async fn list_users(&self, name: Option<&str>) -> Result<Vec<User>>;

    async fn delete_user(&self, id: ObjectId) -> Result<DeleteResult>;
}

/// Persistence for house listings.
#[async_trait]
pub trait HouseStore: Send + Sync {
    async fn insert_house(&self, house: HouseForCreate) -> Result<InsertResult>;

    async fn list_houses(&self, filter: &HouseFilter) -> Result<Vec<House>>;

    async fn find_house(&self, id: ObjectId) -> Result<Option<House>>;

    /// Set the listing fields of `id`, creating the house when it is absent.
    async fn upsert_house(&self, id: ObjectId, update: HouseForUpdate) -> Result<UpdateResult>;

    async fn delete_house(&self, id: ObjectId) -> Result<DeleteResult>;
}

/// Persistence for bookings.
///
/// The per-booker cap is enforced above this port; adapters only count.
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn count_bookings(&self, booker_id: &str) -> Result<u64>;

    async fn insert_booking(&self, booking: BookingForCreate) -> Result<InsertResult>;

    async fn list_bookings(&self) -> Result<Vec<Booking>>;

    async fn find_booking(&self, id: ObjectId) -> Result<Option<Booking>>;

    /// Delete one booking whose `bookmark` field equals `bookmark`.
    async fn delete_booking_by_bookmark(&self, bookmark: &str) -> Result<DeleteResult>;
}

/// A backend serving all three collections.
pub trait Store: UserStore + HouseStore + BookingStore {}

impl<T: UserStore + HouseStore + BookingStore> Store for T {}
// endregion: --- Ports
