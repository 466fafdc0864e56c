//! Documents stored in the `users`, `houses` and `booked` collections.
//!
//! Identifiers travel as 24-digit hex strings under `_id`; timestamps are
//! UTC and serialize as RFC 3339.

use crate::error::{AppError, Result};
use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form document fields as submitted by clients.
pub type Fields = Map<String, Value>;

/// Listing fields replaced by a house update. Everything else a client
/// submits at creation time is kept but never touched by updates.
pub const HOUSE_FIELDS: [&str; 10] = [
    "houseName",
    "address",
    "city",
    "bedrooms",
    "bathrooms",
    "roomSize",
    "availability",
    "rent",
    "phone",
    "description",
];

/// Parse a path identifier into an [`ObjectId`].
pub fn parse_object_id(id: &str) -> Result<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| AppError::InvalidId(id.to_string()))
}

/// Case-insensitive literal substring match.
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Drop keys the server owns from a client submission.
fn strip_reserved(mut fields: Fields, reserved: &[&str]) -> Fields {
    for key in reserved {
        fields.remove(*key);
    }
    fields
}

// region:    --- User

/// Registered user.
///
/// The stored password hash is never serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: Option<String>,
    pub user_name: Option<String>,
    pub image: Option<String>,
    pub role: Option<String>,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// Data structure for creating a new user.
///
/// Password must already be hashed.
#[derive(Debug, Clone)]
pub struct UserForCreate {
    pub name: Option<String>,
    pub user_name: Option<String>,
    pub image: Option<String>,
    pub role: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

// endregion: --- User

// region:    --- House

/// House listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct House {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub fields: Fields,
    /// Absent on houses that were created through an upsert.
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl House {
    /// String value of a listing field, if it holds a string.
    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }
}

#[derive(Debug, Clone)]
pub struct HouseForCreate {
    pub fields: Fields,
    pub created_at: DateTime<Utc>,
}

impl HouseForCreate {
    pub fn new(fields: Fields, created_at: DateTime<Utc>) -> Self {
        Self {
            fields: strip_reserved(fields, &["_id", "createdAt"]),
            created_at,
        }
    }
}

/// Full replacement of the [`HOUSE_FIELDS`].
#[derive(Debug, Clone, PartialEq)]
pub struct HouseForUpdate {
    pub fields: Fields,
}

impl HouseForUpdate {
    /// Pick the listing fields from a submission. Missing ones become `null`.
    pub fn from_submission(submission: &Fields) -> Self {
        let fields = HOUSE_FIELDS
            .iter()
            .map(|key| {
                let value = submission.get(*key).cloned().unwrap_or(Value::Null);
                (key.to_string(), value)
            })
            .collect();

        Self { fields }
    }
}

/// Optional substring filters for listing houses. Both must match when set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HouseFilter {
    pub house_name: Option<String>,
    pub city: Option<String>,
}

impl HouseFilter {
    /// Empty strings count as "no filter".
    pub fn new(house_name: Option<String>, city: Option<String>) -> Self {
        Self {
            house_name: house_name.filter(|s| !s.is_empty()),
            city: city.filter(|s| !s.is_empty()),
        }
    }

    pub fn matches(&self, house: &House) -> bool {
        let check = |field: &str, needle: &Option<String>| match needle {
            Some(needle) => house
                .field_str(field)
                .is_some_and(|value| contains_ci(value, needle)),
            None => true,
        };

        check("houseName", &self.house_name) && check("city", &self.city)
    }
}

// endregion: --- House

// region:    --- Booking

/// Room booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "bookerId")]
    pub booker_id: String,
    #[serde(flatten)]
    pub details: Fields,
    #[serde(rename = "bookedAt", default, skip_serializing_if = "Option::is_none")]
    pub booked_at: Option<DateTime<Utc>>,
}

impl Booking {
    /// Bookings are deleted by a `bookmark` field the server never writes;
    /// only client-supplied bookmarks can match.
    pub fn has_bookmark(&self, bookmark: &str) -> bool {
        self.details.get("bookmark").and_then(Value::as_str) == Some(bookmark)
    }
}

#[derive(Debug, Clone)]
pub struct BookingForCreate {
    pub booker_id: String,
    pub details: Fields,
    pub booked_at: DateTime<Utc>,
}

impl BookingForCreate {
    pub fn new(booker_id: String, details: Fields, booked_at: DateTime<Utc>) -> Self {
        Self {
            booker_id,
            details: strip_reserved(details, &["_id", "bookerId", "bookedAt"]),
            booked_at,
        }
    }
}

// endregion: --- Booking

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Fields {
        value.as_object().cloned().expect("Test fixture must be an object")
    }

    fn house(value: Value) -> House {
        House {
            id: ObjectId::new().to_hex(),
            fields: fields(value),
            created_at: None,
        }
    }

    #[test]
    fn test_parse_object_id() {
        let id = ObjectId::new();
        assert_eq!(parse_object_id(&id.to_hex()).expect("Valid hex id"), id);
        assert!(matches!(parse_object_id("42"), Err(AppError::InvalidId(_))));
    }

    #[test]
    fn test_house_filter_is_case_insensitive_substring() {
        let listing = house(json!({ "houseName": "Sunny Loft", "city": "Dhaka" }));

        assert!(HouseFilter::new(Some("sunny".into()), None).matches(&listing));
        assert!(HouseFilter::new(None, Some("HAK".into())).matches(&listing));
        assert!(HouseFilter::new(Some("LOFT".into()), Some("dhaka".into())).matches(&listing));
        assert!(!HouseFilter::new(Some("loft".into()), Some("Khulna".into())).matches(&listing));
        assert!(HouseFilter::new(Some(String::new()), None).matches(&listing));
    }

    #[test]
    fn test_house_filter_treats_pattern_literally() {
        let listing = house(json!({ "houseName": "Sunny Loft" }));

        assert!(!HouseFilter::new(Some("s.*t".into()), None).matches(&listing));
    }

    #[test]
    fn test_house_filter_skips_non_string_fields() {
        let listing = house(json!({ "houseName": 12, "city": "Dhaka" }));

        assert!(!HouseFilter::new(Some("12".into()), None).matches(&listing));
    }

    #[test]
    fn test_house_update_sets_every_listing_field() {
        let update = HouseForUpdate::from_submission(&fields(json!({
            "houseName": "Loft",
            "rent": 900,
            "owner": "ignored"
        })));

        assert_eq!(update.fields.len(), HOUSE_FIELDS.len());
        assert_eq!(update.fields["houseName"], json!("Loft"));
        assert_eq!(update.fields["rent"], json!(900));
        assert_eq!(update.fields["city"], Value::Null);
        assert!(!update.fields.contains_key("owner"));
    }

    #[test]
    fn test_reserved_keys_are_stripped() {
        let create = HouseForCreate::new(
            fields(json!({ "_id": "mine", "createdAt": "yesterday", "city": "Dhaka" })),
            Utc::now(),
        );
        assert_eq!(create.fields, fields(json!({ "city": "Dhaka" })));

        let booking = BookingForCreate::new(
            "b-1".to_string(),
            fields(json!({ "bookerId": "b-1", "bookedAt": "never", "houseId": "h-1" })),
            Utc::now(),
        );
        assert_eq!(booking.details, fields(json!({ "houseId": "h-1" })));
    }

    #[test]
    fn test_booking_json_shape() {
        let booking = Booking {
            id: "65f0c0ffee0000000000beef".to_string(),
            booker_id: "b-1".to_string(),
            details: fields(json!({ "houseId": "h-1" })),
            booked_at: None,
        };

        let value = serde_json::to_value(&booking).expect("Booking should serialize");
        assert_eq!(
            value,
            json!({ "_id": "65f0c0ffee0000000000beef", "bookerId": "b-1", "houseId": "h-1" })
        );
        assert!(!booking.has_bookmark("65f0c0ffee0000000000beef"));
    }

    #[test]
    fn test_user_never_serializes_password_hash() {
        let user = User {
            id: ObjectId::new().to_hex(),
            name: Some("Alice".to_string()),
            user_name: Some("alice".to_string()),
            image: None,
            role: Some("guest".to_string()),
            email: "alice@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            created_at: None,
        };

        let value = serde_json::to_value(&user).expect("User should serialize");
        assert_eq!(value["userName"], "alice");
        assert!(value.get("passwordHash").is_none());
        assert!(!value.to_string().contains("argon2id"));
    }
}
