use super::*;
use crate::catalog::fixture;
use crate::store::{FileStore, MemoryStore};

use async_trait::async_trait;
use bytes::Bytes;

fn seeded() -> Scheduler {
    Scheduler::new(Arc::new(MemoryStore::with_contents(fixture::APPOINTMENTS)))
}

/// Reads succeed, writes always fail.
struct ReadOnlyStore(Bytes);

#[async_trait]
impl Store for ReadOnlyStore {
    async fn load(&self) -> io::Result<Bytes> {
        Ok(self.0.clone())
    }

    async fn save(&self, _data: Bytes) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
    }
}

fn test_data_path(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join("slotbook_test_engine");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    let _ = std::fs::remove_file(&path);
    path
}

// ── Scheduled appointments ───────────────────────────────

#[tokio::test]
async fn scheduled_for_trainer_two() {
    let sched = seeded();
    let appts = sched.scheduled_appointments(2).await.unwrap();
    let ids: Vec<i64> = appts.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![4, 5]);
}

#[tokio::test]
async fn scheduled_for_unknown_trainer_is_empty() {
    let sched = seeded();
    assert!(sched.scheduled_appointments(42).await.unwrap().is_empty());
}

#[tokio::test]
async fn scheduled_missing_store_is_io_error() {
    let sched = Scheduler::new(Arc::new(MemoryStore::new()));
    let result = sched.scheduled_appointments(1).await;
    assert!(matches!(result, Err(EngineError::Io(_))));
}

#[tokio::test]
async fn scheduled_corrupt_store_is_decode_error() {
    let sched = Scheduler::new(Arc::new(MemoryStore::with_contents("[{\"trainer_id\":")));
    let result = sched.scheduled_appointments(1).await;
    assert!(matches!(result, Err(EngineError::Decode(_))));
}

// ── Availability ─────────────────────────────────────────

#[tokio::test]
async fn availability_single_instant() {
    let sched = seeded();
    let slots = sched
        .available_slots(1, "2020-01-06T08:00:00-08:00", "2020-01-06T08:00:00-08:00")
        .await
        .unwrap();
    assert_eq!(slots, vec!["2020-01-06T08:00:00-08:00"]);
}

#[tokio::test]
async fn availability_three_slots() {
    let sched = seeded();
    let slots = sched
        .available_slots(1, "2020-01-06T08:00:00-08:00", "2020-01-06T09:00:00-08:00")
        .await
        .unwrap();
    assert_eq!(
        slots,
        vec![
            "2020-01-06T08:00:00-08:00",
            "2020-01-06T08:30:00-08:00",
            "2020-01-06T09:00:00-08:00",
        ]
    );
}

#[tokio::test]
async fn availability_skips_booked_starts() {
    let sched = seeded();
    let slots = sched
        .available_slots(1, "2020-01-24T09:00:00-08:00", "2020-01-24T10:00:00-08:00")
        .await
        .unwrap();
    assert_eq!(slots, vec!["2020-01-24T09:30:00-08:00"]);
}

#[tokio::test]
async fn availability_ignores_other_trainers() {
    let sched = seeded();
    // Trainer 3 has nothing on Friday the 24th; trainer 1 and 2 do.
    let slots = sched
        .available_slots(3, "2020-01-24T09:00:00-08:00", "2020-01-24T10:00:00-08:00")
        .await
        .unwrap();
    assert_eq!(slots.len(), 3);
}

#[tokio::test]
async fn availability_weekend_absent() {
    let sched = seeded();
    let slots = sched
        .available_slots(1, "2020-01-24T08:00:00-08:00", "2020-01-27T16:30:00-08:00")
        .await
        .unwrap();
    assert!(!slots.is_empty());
    assert!(slots.iter().all(|s| !s.starts_with("2020-01-25") && !s.starts_with("2020-01-26")));
    assert!(slots.iter().any(|s| s.starts_with("2020-01-24")));
    assert!(slots.iter().any(|s| s.starts_with("2020-01-27")));
}

#[tokio::test]
async fn availability_off_grid_rejected_without_store() {
    // Empty store would fail with Io; Validation must come first.
    let sched = Scheduler::new(Arc::new(MemoryStore::new()));
    let result = sched
        .available_slots(1, "2020-01-06T08:05:00-08:00", "2020-01-06T09:00:00-08:00")
        .await;
    assert!(matches!(result, Err(EngineError::Validation(_))));
}

#[tokio::test]
async fn availability_store_failure_is_io() {
    let sched = Scheduler::new(Arc::new(MemoryStore::new()));
    let result = sched
        .available_slots(1, "2020-01-06T08:00:00-08:00", "2020-01-06T09:00:00-08:00")
        .await;
    assert!(matches!(result, Err(EngineError::Io(_))));
}

#[tokio::test]
async fn availability_survives_malformed_stored_record() {
    let store = MemoryStore::with_contents(
        r#"[
  {"Id":1,"trainer_id":1,"starts_at":"not a time","ends_at":"2020-01-06T08:30:00-08:00"},
  {"Id":2,"trainer_id":1,"starts_at":"2020-01-06T08:30:00-08:00","ends_at":"2020-01-06T09:00:00-08:00"}
]"#,
    );
    let sched = Scheduler::new(Arc::new(store));
    let slots = sched
        .available_slots(1, "2020-01-06T08:00:00-08:00", "2020-01-06T09:00:00-08:00")
        .await
        .unwrap();
    assert_eq!(slots, vec!["2020-01-06T08:00:00-08:00", "2020-01-06T09:00:00-08:00"]);
}

// ── Booking ──────────────────────────────────────────────

#[tokio::test]
async fn booking_appends_and_is_visible() {
    let sched = seeded();
    let new = Appointment::new(2, "2020-02-03T08:00:00-08:00", "2020-02-03T08:30:00-08:00")
        .with_id(7)
        .with_user(11);
    sched.book(new.clone()).await.unwrap();

    let all = sched.load_collection().await.unwrap();
    assert_eq!(all.len(), 7);
    assert_eq!(&all[..6], &fixture::collection()[..]);
    assert_eq!(all[6], new);

    let trainer = sched.scheduled_appointments(2).await.unwrap();
    assert_eq!(trainer.last(), Some(&new));
}

#[tokio::test]
async fn booking_blocks_the_slot() {
    let sched = seeded();
    sched
        .book(Appointment::new(1, "2020-01-06T08:00:00-08:00", "2020-01-06T08:30:00-08:00"))
        .await
        .unwrap();
    let slots = sched
        .available_slots(1, "2020-01-06T08:00:00-08:00", "2020-01-06T08:30:00-08:00")
        .await
        .unwrap();
    assert_eq!(slots, vec!["2020-01-06T08:30:00-08:00"]);
}

#[tokio::test]
async fn booking_twice_records_twice() {
    let sched = seeded();
    let new = Appointment::new(3, "2020-02-03T08:00:00-08:00", "2020-02-03T08:30:00-08:00");
    sched.book(new.clone()).await.unwrap();
    sched.book(new.clone()).await.unwrap();
    let trainer = sched.scheduled_appointments(3).await.unwrap();
    assert_eq!(trainer.len(), 3);
    assert_eq!(trainer[1], new);
    assert_eq!(trainer[2], new);
}

#[tokio::test]
async fn booking_missing_store_not_recorded() {
    let store = Arc::new(MemoryStore::new());
    let sched = Scheduler::new(store.clone());
    let result = sched
        .book(Appointment::new(1, "2020-02-03T08:00:00-08:00", "2020-02-03T08:30:00-08:00"))
        .await;
    assert!(matches!(result, Err(EngineError::Io(_))));
    assert!(store.load().await.is_err());
}

#[tokio::test]
async fn booking_write_failure_is_io() {
    let sched = Scheduler::new(Arc::new(ReadOnlyStore(Bytes::from_static(b"[]"))));
    let result = sched
        .book(Appointment::new(1, "2020-02-03T08:00:00-08:00", "2020-02-03T08:30:00-08:00"))
        .await;
    assert!(matches!(result, Err(EngineError::Io(_))));
}

#[tokio::test]
async fn concurrent_bookings_all_recorded() {
    let sched = Arc::new(Scheduler::new(Arc::new(MemoryStore::with_contents("[]"))));
    let mut handles = Vec::new();
    for i in 0..32 {
        let sched = sched.clone();
        handles.push(tokio::spawn(async move {
            sched
                .book(
                    Appointment::new(1, "2020-02-03T08:00:00-08:00", "2020-02-03T08:30:00-08:00")
                        .with_id(i + 1),
                )
                .await
        }));
    }
    for h in handles {
        h.await.unwrap().unwrap();
    }
    let all = sched.load_collection().await.unwrap();
    assert_eq!(all.len(), 32);
    let mut ids: Vec<i64> = all.iter().map(|a| a.id).collect();
    ids.sort();
    assert_eq!(ids, (1..=32).collect::<Vec<_>>());
}

#[tokio::test]
async fn file_backed_round_trip() {
    let path = test_data_path("round_trip.json");
    std::fs::write(&path, fixture::APPOINTMENTS).unwrap();
    let sched = Scheduler::new(Arc::new(FileStore::new(&path)));

    let new = Appointment::new(1, "2020-02-04T09:00:00-08:00", "2020-02-04T09:30:00-08:00").with_id(7);
    sched.book(new.clone()).await.unwrap();

    // A fresh scheduler over the same file sees the same collection.
    let reopened = Scheduler::new(Arc::new(FileStore::new(&path)));
    let all = reopened.load_collection().await.unwrap();
    let mut expected = fixture::collection();
    expected.push(new);
    assert_eq!(all, expected);
}
