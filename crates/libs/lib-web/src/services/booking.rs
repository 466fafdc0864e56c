//! # Booking Service
//!
//! Creates bookings while holding every booker to
//! [`MAX_BOOKINGS_PER_BOOKER`].
//!
//! Counting and inserting are two store calls, so two requests for the same
//! booker could both see one booking and both insert. [`BookingGate`]
//! serializes that check-then-insert per booker inside this process.

use lib_core::dto::{BookingSubmission, InsertResult};
use lib_core::error::MAX_BOOKINGS_PER_BOOKER;
use lib_core::{AppError, BookingStore, Result};
use lib_utils::now_utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::OwnedMutexGuard;
use tracing::{info, instrument, warn};

/// Per-booker async locks.
#[derive(Debug, Default)]
pub struct BookingGate {
    slots: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl BookingGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `booker_id`.
    pub async fn lock(&self, booker_id: &str) -> OwnedMutexGuard<()> {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            // Idle slots are referenced by the map alone.
            slots.retain(|_, slot| Arc::strong_count(slot) > 1);
            Arc::clone(slots.entry(booker_id.to_string()).or_default())
        };

        slot.lock_owned().await
    }

    /// Number of bookers with a held or awaited lock.
    pub fn active(&self) -> usize {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots
            .values()
            .filter(|slot| Arc::strong_count(slot) > 1)
            .count()
    }
}

/// Service for creating bookings.
pub struct BookingService {
    store: Arc<dyn BookingStore>,
    gate: BookingGate,
}

impl BookingService {
    pub fn new(store: Arc<dyn BookingStore>) -> Self {
        Self {
            store,
            gate: BookingGate::new(),
        }
    }

    #[instrument(skip(self, submission), fields(booker_id = %submission.booker_id))]
    pub async fn create(&self, submission: BookingSubmission) -> Result<InsertResult> {
        let _guard = self.gate.lock(&submission.booker_id).await;

        let existing = self.store.count_bookings(&submission.booker_id).await?;
        if existing >= MAX_BOOKINGS_PER_BOOKER {
            warn!(
                "[BOOKING] {} already holds {} bookings",
                submission.booker_id, existing
            );
            return Err(AppError::BookingLimit(submission.booker_id));
        }

        let result = self
            .store
            .insert_booking(submission.into_create(now_utc()))
            .await?;

        info!("[BOOKING] Booking {} created", result.inserted_id);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::future::join_all;
    use lib_core::model::store::Fields;
    use lib_core::MemoryStore;

    fn submission(booker_id: &str) -> BookingSubmission {
        BookingSubmission {
            booker_id: booker_id.to_string(),
            details: Fields::new(),
        }
    }

    #[tokio::test]
    async fn test_third_booking_is_rejected() {
        let store = Arc::new(MemoryStore::new());
        let service = BookingService::new(store.clone());

        service.create(submission("b-1")).await.expect("first booking");
        service.create(submission("b-1")).await.expect("second booking");

        let third = service.create(submission("b-1")).await;
        assert!(matches!(third, Err(AppError::BookingLimit(ref id)) if id == "b-1"));

        service.create(submission("b-2")).await.expect("other booker is unaffected");
        assert_eq!(store.count_bookings("b-1").await.expect("count"), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_bookings_respect_cap() {
        let store = Arc::new(MemoryStore::new());
        let service = Arc::new(BookingService::new(store.clone()));

        let attempts = (0..16).map(|_| {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.create(submission("b-1")).await })
        });

        let outcomes = join_all(attempts).await;
        let accepted = outcomes
            .into_iter()
            .map(|joined| joined.expect("task should not panic"))
            .filter(|outcome| outcome.is_ok())
            .count();

        assert_eq!(accepted, 2);
        assert_eq!(store.count_bookings("b-1").await.expect("count"), 2);
        assert_eq!(service.gate.active(), 0);
    }

    #[tokio::test]
    async fn test_gate_serializes_same_booker_only() {
        let gate = BookingGate::new();

        let held = gate.lock("b-1").await;
        assert_eq!(gate.active(), 1);

        // A different booker is not blocked.
        let other = gate.lock("b-2").await;
        assert_eq!(gate.active(), 2);

        drop(held);
        drop(other);
        assert_eq!(gate.active(), 0);
    }
}
