//! # MongoDB Adapter
//!
//! Implements the store ports on top of the official `mongodb` driver.
//!
//! Collections are read and written as raw [`Document`]s and mapped to the
//! models by hand, so free-form listing and booking fields survive without a
//! fixed schema.
//!
//! ## Example
//!
//! ```rust,no_run
//! # use lib_core::model::store::{MongoStore, UserStore};
//! # async fn example() -> lib_core::Result<()> {
//! let store = MongoStore::connect("mongodb://localhost:27017", "go-home").await?;
//! let users = store.list_users(Some("ali")).await?;
//! # Ok(())
//! # }
//! ```

use super::models::{
    Booking, BookingForCreate, Fields, House, HouseFilter, HouseForCreate, HouseForUpdate, User,
    UserForCreate,
};
use super::{
    BookingStore, HouseStore, UserStore, BOOKED_COLLECTION, HOUSES_COLLECTION, USERS_COLLECTION,
};
use crate::dto::{DeleteResult, InsertResult, UpdateResult};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use lib_utils::parse_utc;
use mongodb::bson::{self, doc, oid::ObjectId, Bson, Document};
use mongodb::options::{ClientOptions, ServerApi, ServerApiVersion};
use mongodb::{Client, Collection, Database};
use serde_json::Value;
use tracing::{debug, info};

/// Store backed by one MongoDB database.
///
/// Cloning is cheap; the driver pools connections internally.
#[derive(Clone, Debug)]
pub struct MongoStore {
    users: Collection<Document>,
    houses: Collection<Document>,
    booked: Collection<Document>,
}

impl MongoStore {
    /// Connect, ping the deployment and open the `db_name` database.
    ///
    /// # Errors
    ///
    /// Fails when the URI does not parse or the deployment does not answer
    /// the ping.
    pub async fn connect(uri: &str, db_name: &str) -> Result<Self> {
        let mut options = ClientOptions::parse(uri).await?;
        options.server_api = Some(
            ServerApi::builder()
                .version(ServerApiVersion::V1)
                .strict(true)
                .deprecation_errors(true)
                .build(),
        );

        let client = Client::with_options(options)?;

        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;
        info!("[STORE] Pinged MongoDB deployment, using database '{}'", db_name);

        Ok(Self::from_database(&client.database(db_name)))
    }

    pub fn from_database(db: &Database) -> Self {
        Self {
            users: db.collection(USERS_COLLECTION),
            houses: db.collection(HOUSES_COLLECTION),
            booked: db.collection(BOOKED_COLLECTION),
        }
    }
}

// region:    --- Document mapping

/// `$regex` filter matching `needle` as a literal, case-insensitive substring.
fn contains_filter(needle: &str) -> Document {
    doc! { "$regex": regex::escape(needle), "$options": "i" }
}

fn to_bson_datetime(at: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(at.timestamp_millis())
}

fn id_to_string(id: Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s,
        other => other.into_relaxed_extjson().to_string(),
    }
}

fn take_id(doc: &mut Document) -> Result<String> {
    doc.remove("_id")
        .map(id_to_string)
        .ok_or_else(|| AppError::Encoding("document without _id".to_string()))
}

fn take_str(doc: &mut Document, key: &str) -> Option<String> {
    match doc.remove(key) {
        Some(Bson::String(s)) => Some(s),
        _ => None,
    }
}

/// Accepts both BSON dates and RFC 3339 strings.
fn take_datetime(doc: &mut Document, key: &str) -> Option<DateTime<Utc>> {
    match doc.remove(key) {
        Some(Bson::DateTime(at)) => DateTime::from_timestamp_millis(at.timestamp_millis()),
        Some(Bson::String(s)) => parse_utc(&s).ok(),
        _ => None,
    }
}

/// Free-form fields as a BSON document.
///
/// BSON has no unsigned 64-bit integer, so integers above `i64::MAX` are
/// stored as doubles.
fn fields_to_document(fields: &Fields) -> Result<Document> {
    let widened: Fields = fields
        .iter()
        .map(|(key, value)| (key.clone(), widen_unsigned(value)))
        .collect();

    Ok(bson::to_document(&widened)?)
}

fn widen_unsigned(value: &Value) -> Value {
    match value {
        Value::Number(n) if n.is_u64() && n.as_i64().is_none() => {
            n.as_f64().map_or(Value::Null, Value::from)
        }
        Value::Array(items) => Value::Array(items.iter().map(widen_unsigned).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, value)| (key.clone(), widen_unsigned(value)))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn into_fields(doc: Document) -> Fields {
    doc.into_iter()
        .map(|(key, value)| (key, value.into_relaxed_extjson()))
        .collect()
}

fn user_from_document(mut doc: Document) -> Result<User> {
    let id = take_id(&mut doc)?;

    Ok(User {
        id,
        name: take_str(&mut doc, "name"),
        user_name: take_str(&mut doc, "userName"),
        image: take_str(&mut doc, "image"),
        role: take_str(&mut doc, "role"),
        email: take_str(&mut doc, "email").unwrap_or_default(),
        password_hash: take_str(&mut doc, "password").unwrap_or_default(),
        created_at: take_datetime(&mut doc, "createdAt"),
    })
}

fn house_from_document(mut doc: Document) -> Result<House> {
    let id = take_id(&mut doc)?;
    let created_at = take_datetime(&mut doc, "createdAt");

    Ok(House {
        id,
        fields: into_fields(doc),
        created_at,
    })
}

fn booking_from_document(mut doc: Document) -> Result<Booking> {
    let id = take_id(&mut doc)?;
    let booked_at = take_datetime(&mut doc, "bookedAt");
    let booker_id = match doc.remove("bookerId") {
        Some(Bson::String(s)) => s,
        Some(other) => other.into_relaxed_extjson().to_string(),
        None => String::new(),
    };

    Ok(Booking {
        id,
        booker_id,
        details: into_fields(doc),
        booked_at,
    })
}

async fn find_all<T>(
    collection: &Collection<Document>,
    filter: Document,
    map: fn(Document) -> Result<T>,
) -> Result<Vec<T>> {
    let docs: Vec<Document> = collection.find(filter).await?.try_collect().await?;
    docs.into_iter().map(map).collect()
}

// endregion: --- Document mapping

#[async_trait]
impl UserStore for MongoStore {
    async fn insert_user(&self, user: UserForCreate) -> Result<InsertResult> {
        let doc = doc! {
            "name": user.name,
            "userName": user.user_name,
            "image": user.image,
            "role": user.role,
            "email": user.email,
            "password": user.password_hash,
            "createdAt": to_bson_datetime(user.created_at),
        };

        let result = self.users.insert_one(doc).await?;
        Ok(InsertResult::new(id_to_string(result.inserted_id)))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.users
            .find_one(doc! { "email": email })
            .await?
            .map(user_from_document)
            .transpose()
    }

    async fn find_user_by_user_name(&self, user_name: &str) -> Result<Option<User>> {
        self.users
            .find_one(doc! { "userName": user_name })
            .await?
            .map(user_from_document)
            .transpose()
    }

    async fn list_users(&self, name: Option<&str>) -> Result<Vec<User>> {
        let mut filter = Document::new();
        if let Some(name) = name {
            filter.insert("name", contains_filter(name));
        }
        debug!("[STORE] users.find {}", filter);

        find_all(&self.users, filter, user_from_document).await
    }

    async fn delete_user(&self, id: ObjectId) -> Result<DeleteResult> {
        let result = self.users.delete_one(doc! { "_id": id }).await?;
        Ok(DeleteResult::new(result.deleted_count))
    }
}

#[async_trait]
impl HouseStore for MongoStore {
    async fn insert_house(&self, house: HouseForCreate) -> Result<InsertResult> {
        let mut doc = fields_to_document(&house.fields)?;
        doc.insert("createdAt", to_bson_datetime(house.created_at));

        let result = self.houses.insert_one(doc).await?;
        Ok(InsertResult::new(id_to_string(result.inserted_id)))
    }

    async fn list_houses(&self, filter: &HouseFilter) -> Result<Vec<House>> {
        let mut query = Document::new();
        if let Some(house_name) = &filter.house_name {
            query.insert("houseName", contains_filter(house_name));
        }
        if let Some(city) = &filter.city {
            query.insert("city", contains_filter(city));
        }
        debug!("[STORE] houses.find {}", query);

        find_all(&self.houses, query, house_from_document).await
    }

    async fn find_house(&self, id: ObjectId) -> Result<Option<House>> {
        self.houses
            .find_one(doc! { "_id": id })
            .await?
            .map(house_from_document)
            .transpose()
    }

    async fn upsert_house(&self, id: ObjectId, update: HouseForUpdate) -> Result<UpdateResult> {
        let set = fields_to_document(&update.fields)?;

        let result = self
            .houses
            .update_one(doc! { "_id": id }, doc! { "$set": set })
            .upsert(true)
            .await?;

        let upserted_id = result.upserted_id.map(id_to_string);
        Ok(UpdateResult {
            acknowledged: true,
            matched_count: result.matched_count,
            modified_count: result.modified_count,
            upserted_count: u64::from(upserted_id.is_some()),
            upserted_id,
        })
    }

    async fn delete_house(&self, id: ObjectId) -> Result<DeleteResult> {
        let result = self.houses.delete_one(doc! { "_id": id }).await?;
        Ok(DeleteResult::new(result.deleted_count))
    }
}

#[async_trait]
impl BookingStore for MongoStore {
    async fn count_bookings(&self, booker_id: &str) -> Result<u64> {
        Ok(self
            .booked
            .count_documents(doc! { "bookerId": booker_id })
            .await?)
    }

    async fn insert_booking(&self, booking: BookingForCreate) -> Result<InsertResult> {
        let mut doc = fields_to_document(&booking.details)?;
        doc.insert("bookerId", booking.booker_id);
        doc.insert("bookedAt", to_bson_datetime(booking.booked_at));

        let result = self.booked.insert_one(doc).await?;
        Ok(InsertResult::new(id_to_string(result.inserted_id)))
    }

    async fn list_bookings(&self) -> Result<Vec<Booking>> {
        find_all(&self.booked, Document::new(), booking_from_document).await
    }

    async fn find_booking(&self, id: ObjectId) -> Result<Option<Booking>> {
        self.booked
            .find_one(doc! { "_id": id })
            .await?
            .map(booking_from_document)
            .transpose()
    }

    async fn delete_booking_by_bookmark(&self, bookmark: &str) -> Result<DeleteResult> {
        let result = self
            .booked
            .delete_one(doc! { "bookmark": bookmark })
            .await?;
        Ok(DeleteResult::new(result.deleted_count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_contains_filter_escapes_regex() {
        let filter = contains_filter("a.b(c");

        assert_eq!(filter.get_str("$regex").expect("regex key"), r"a\.b\(c");
        assert_eq!(filter.get_str("$options").expect("options key"), "i");
    }

    #[test]
    fn test_house_from_document_splits_reserved_fields() {
        let id = ObjectId::new();
        let created = bson::DateTime::from_millis(1_700_000_000_000);
        let doc = doc! {
            "_id": id,
            "houseName": "Loft",
            "bedrooms": 3,
            "createdAt": created,
        };

        let house = house_from_document(doc).expect("Mapping should succeed");

        assert_eq!(house.id, id.to_hex());
        assert_eq!(house.fields["houseName"], json!("Loft"));
        assert_eq!(house.fields["bedrooms"], json!(3));
        assert!(!house.fields.contains_key("createdAt"));
        assert_eq!(
            house.created_at.map(|at| at.timestamp_millis()),
            Some(1_700_000_000_000)
        );
    }

    #[test]
    fn test_user_from_document_reads_stored_hash() {
        let doc = doc! {
            "_id": ObjectId::new(),
            "name": "Alice",
            "userName": "alice",
            "email": "alice@example.com",
            "password": "$argon2id$hash",
            "createdAt": "2024-05-01T10:00:00Z",
        };

        let user = user_from_document(doc).expect("Mapping should succeed");

        assert_eq!(user.user_name.as_deref(), Some("alice"));
        assert_eq!(user.password_hash, "$argon2id$hash");
        assert!(user.image.is_none());
        assert!(user.created_at.is_some());
    }

    #[test]
    fn test_oversized_integers_become_doubles() {
        let fields = json!({
            "rent": u64::MAX,
            "bedrooms": 3,
            "rooms": [{ "size": u64::MAX }],
        })
        .as_object()
        .cloned()
        .expect("fixture is an object");

        let doc = fields_to_document(&fields).expect("Conversion should succeed");

        assert_eq!(doc.get("rent"), Some(&Bson::Double(u64::MAX as f64)));
        assert!(matches!(
            doc.get("bedrooms"),
            Some(Bson::Int32(3)) | Some(Bson::Int64(3))
        ));
        let rooms = doc.get_array("rooms").expect("rooms array");
        assert_eq!(
            rooms[0].as_document().and_then(|room| room.get("size")),
            Some(&Bson::Double(u64::MAX as f64))
        );
    }

    #[test]
    fn test_document_without_id_is_rejected() {
        assert!(matches!(
            booking_from_document(doc! { "bookerId": "b-1" }),
            Err(AppError::Encoding(_))
        ));
    }
}
