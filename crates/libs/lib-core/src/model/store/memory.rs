//! # In-Memory Adapter
//!
//! Process-local implementation of the store ports with the same query
//! semantics as the MongoDB adapter. Backs the handler test suites.

use super::models::{
    contains_ci, Booking, BookingForCreate, House, HouseFilter, HouseForCreate, HouseForUpdate,
    User, UserForCreate,
};
use super::{BookingStore, HouseStore, UserStore};
use crate::dto::{DeleteResult, InsertResult, UpdateResult};
use crate::error::Result;
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    houses: RwLock<Vec<House>>,
    booked: RwLock<Vec<Booking>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Remove the first element matching `pred`.
fn delete_first<T>(items: &mut Vec<T>, pred: impl Fn(&T) -> bool) -> DeleteResult {
    match items.iter().position(pred) {
        Some(index) => {
            items.remove(index);
            DeleteResult::new(1)
        }
        None => DeleteResult::new(0),
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: UserForCreate) -> Result<InsertResult> {
        let id = ObjectId::new().to_hex();

        self.users.write().await.push(User {
            id: id.clone(),
            name: user.name,
            user_name: user.user_name,
            image: user.image,
            role: user.role,
            email: user.email,
            password_hash: user.password_hash,
            created_at: Some(user.created_at),
        });

        Ok(InsertResult::new(id))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_user_name(&self, user_name: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|u| u.user_name.as_deref() == Some(user_name))
            .cloned())
    }

    async fn list_users(&self, name: Option<&str>) -> Result<Vec<User>> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .filter(|u| match name {
                Some(needle) => u.name.as_deref().is_some_and(|n| contains_ci(n, needle)),
                None => true,
            })
            .cloned()
            .collect())
    }

    async fn delete_user(&self, id: ObjectId) -> Result<DeleteResult> {
        let key = id.to_hex();
        let mut users = self.users.write().await;
        Ok(delete_first(&mut users, |u| u.id == key))
    }
}

#[async_trait]
impl HouseStore for MemoryStore {
    async fn insert_house(&self, house: HouseForCreate) -> Result<InsertResult> {
        let id = ObjectId::new().to_hex();

        self.houses.write().await.push(House {
            id: id.clone(),
            fields: house.fields,
            created_at: Some(house.created_at),
        });

        Ok(InsertResult::new(id))
    }

    async fn list_houses(&self, filter: &HouseFilter) -> Result<Vec<House>> {
        let houses = self.houses.read().await;
        Ok(houses.iter().filter(|h| filter.matches(h)).cloned().collect())
    }

    async fn find_house(&self, id: ObjectId) -> Result<Option<House>> {
        let key = id.to_hex();
        let houses = self.houses.read().await;
        Ok(houses.iter().find(|h| h.id == key).cloned())
    }

    async fn upsert_house(&self, id: ObjectId, update: HouseForUpdate) -> Result<UpdateResult> {
        let key = id.to_hex();
        let mut houses = self.houses.write().await;

        match houses.iter_mut().find(|h| h.id == key) {
            Some(house) => {
                let mut modified = false;
                for (field, value) in update.fields {
                    if house.fields.get(&field) != Some(&value) {
                        house.fields.insert(field, value);
                        modified = true;
                    }
                }
                Ok(UpdateResult::matched(modified))
            }
            None => {
                houses.push(House {
                    id: key.clone(),
                    fields: update.fields,
                    created_at: None,
                });
                Ok(UpdateResult::upserted(key))
            }
        }
    }

    async fn delete_house(&self, id: ObjectId) -> Result<DeleteResult> {
        let key = id.to_hex();
        let mut houses = self.houses.write().await;
        Ok(delete_first(&mut houses, |h| h.id == key))
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn count_bookings(&self, booker_id: &str) -> Result<u64> {
        let booked = self.booked.read().await;
        Ok(booked.iter().filter(|b| b.booker_id == booker_id).count() as u64)
    }

    async fn insert_booking(&self, booking: BookingForCreate) -> Result<InsertResult> {
        let id = ObjectId::new().to_hex();

        self.booked.write().await.push(Booking {
            id: id.clone(),
            booker_id: booking.booker_id,
            details: booking.details,
            booked_at: Some(booking.booked_at),
        });

        Ok(InsertResult::new(id))
    }

    async fn list_bookings(&self) -> Result<Vec<Booking>> {
        Ok(self.booked.read().await.clone())
    }

    async fn find_booking(&self, id: ObjectId) -> Result<Option<Booking>> {
        let key = id.to_hex();
        let booked = self.booked.read().await;
        Ok(booked.iter().find(|b| b.id == key).cloned())
    }

    async fn delete_booking_by_bookmark(&self, bookmark: &str) -> Result<DeleteResult> {
        let mut booked = self.booked.write().await;
        Ok(delete_first(&mut booked, |b| b.has_bookmark(bookmark)))
    }
}
