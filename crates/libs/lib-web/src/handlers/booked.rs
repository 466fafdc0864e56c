//! # Booking Handlers

use crate::services::BookingService;
use axum::extract::{Json, Path, State};
use lib_core::dto::{BookingSubmission, DeleteResult, InsertResult};
use lib_core::model::store::{parse_object_id, Booking};
use lib_core::{BookingStore, Result};
use std::sync::Arc;
use tracing::info;

/// `POST /booked` - book unless the booker already holds two bookings.
pub async fn create_booking(
    State(bookings): State<Arc<BookingService>>,
    Json(submission): Json<BookingSubmission>,
) -> Result<Json<InsertResult>> {
    bookings.create(submission).await.map(Json)
}

/// `GET /booked`
pub async fn list_bookings(
    State(booked): State<Arc<dyn BookingStore>>,
) -> Result<Json<Vec<Booking>>> {
    booked.list_bookings().await.map(Json)
}

/// `GET /booked/{id}` - the booking, or `null`.
pub async fn get_booking(
    State(booked): State<Arc<dyn BookingStore>>,
    Path(id): Path<String>,
) -> Result<Json<Option<Booking>>> {
    let id = parse_object_id(&id)?;
    booked.find_booking(id).await.map(Json)
}

/// `DELETE /booked/{id}` - deletes the booking whose `bookmark` equals `id`.
///
/// Bookings are never given a `bookmark` by the server, so a booking id
/// alone does not match anything.
pub async fn delete_booking(
    State(booked): State<Arc<dyn BookingStore>>,
    Path(bookmark): Path<String>,
) -> Result<Json<DeleteResult>> {
    let result = booked.delete_booking_by_bookmark(&bookmark).await?;
    info!(
        "[BOOKED] Delete by bookmark {} removed {}",
        bookmark, result.deleted_count
    );
    Ok(Json(result))
}
