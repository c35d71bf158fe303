use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{NaiveDate, NaiveTime};
use futures::future::join_all;
use tokio_test::{assert_err, assert_ok};

use shared_database::seed::sample_state;
use shared_database::{AppointmentFilter, ClinicRepository, InMemoryStore, StoreError};
use shared_models::AppointmentStatus;

fn july_first() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()
}

fn nine() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap()
}

fn seeded_store() -> Arc<InMemoryStore> {
    // Directory only; tests create the slots they need.
    Arc::new(InMemoryStore::from_state(sample_state(july_first(), 0).unwrap()))
}

#[tokio::test]
async fn test_book_then_rebook_same_slot() {
    let store = seeded_store();
    store.create_slot("1", july_first(), nine()).await.unwrap();

    let appointment = assert_ok!(store.book_slot("1", "4", july_first(), nine()).await);
    assert_eq!(appointment.status, AppointmentStatus::Scheduled);

    let second = store.book_slot("1", "4", july_first(), nine()).await;
    assert_matches!(second, Err(StoreError::SlotUnavailable { .. }));

    let all = store.list_appointments(&AppointmentFilter::default()).await;
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn test_concurrent_bookings_of_one_slot_yield_one_appointment() {
    let store = seeded_store();
    store.create_slot("1", july_first(), nine()).await.unwrap();

    let attempts = (0..16).map(|_| {
        let store = Arc::clone(&store);
        tokio::spawn(async move { store.book_slot("1", "4", july_first(), nine()).await })
    });

    let results = join_all(attempts).await;
    let successes = results
        .into_iter()
        .map(|joined| joined.expect("booking task panicked"))
        .filter(|outcome| outcome.is_ok())
        .count();

    assert_eq!(successes, 1);
    let snapshot = store.snapshot().await;
    assert_eq!(snapshot.appointments().len(), 1);
    assert!(snapshot.slots()[0].is_booked);
}

#[tokio::test]
async fn test_cancel_round_trip_through_repository() {
    let store = seeded_store();
    let slot = store.create_slot("2", july_first(), nine()).await.unwrap();
    let appointment = store.book_slot("2", "4", july_first(), nine()).await.unwrap();

    let cancelled = store.cancel_appointment(&appointment.id).await.unwrap();
    assert_eq!(cancelled.status, AppointmentStatus::Cancelled);

    let stored = store.get_appointment(&appointment.id).await.unwrap();
    assert_eq!(stored.status, AppointmentStatus::Cancelled);

    let slots = store.list_slots(Some("2")).await;
    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0].id, slot.id);
    assert!(!slots[0].is_booked);

    assert_ok!(store.delete_slot(&slot.id).await);
    assert_err!(store.delete_slot(&slot.id).await);
}

#[tokio::test]
async fn test_directory_lookups() {
    let store = seeded_store();

    assert_eq!(store.list_doctors().await.len(), 3);
    assert_eq!(store.get_doctor("3").await.unwrap().name, "Dr. Michael Williams");
    assert_matches!(store.get_doctor("4").await, Err(StoreError::DoctorNotFound(_)));
    assert_eq!(
        store.find_user_by_email("PATIENT@email.com").await.unwrap().id,
        "4"
    );
    assert_matches!(store.get_user("nope").await, Err(StoreError::UserNotFound(_)));
}
