//! # Booking DTOs

use crate::model::store::{BookingForCreate, Fields};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `POST /booked`: a booker id plus any other fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingSubmission {
    #[serde(rename = "bookerId")]
    pub booker_id: String,
    #[serde(flatten)]
    pub details: Fields,
}

impl BookingSubmission {
    pub fn into_create(self, booked_at: DateTime<Utc>) -> BookingForCreate {
        BookingForCreate::new(self.booker_id, self.details, booked_at)
    }
}
