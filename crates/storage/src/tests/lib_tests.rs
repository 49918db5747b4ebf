use super::*;

const ORGANIZER: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";

fn pending(name: &str) -> NewAttendee {
    NewAttendee {
        name: name.to_string(),
        wallet_address: String::new(),
        status: AttendanceStatus::Pending,
    }
}

async fn store_with_event() -> (EventStore, EventId) {
    let store = EventStore::new();
    let event = store.insert_event(NewEvent::default(), ORGANIZER).await;
    (store, event.id)
}

#[tokio::test]
async fn seeded_store_lists_sample_events_in_order() {
    let store = EventStore::with_sample_data();
    let ids: Vec<String> = store
        .list_events()
        .await
        .into_iter()
        .map(|e| e.id.0)
        .collect();
    assert_eq!(ids, vec!["evt-1", "evt-2", "evt-3", "evt-4", "evt-5"]);
}

#[tokio::test]
async fn created_event_continues_after_seed() {
    let store = EventStore::with_sample_data();
    let event = store.insert_event(NewEvent::default(), ORGANIZER).await;
    assert_eq!(event.id, EventId::new("evt-6"));
    assert_eq!(store.len().await, 6);
}

#[tokio::test]
async fn insert_event_applies_defaults() {
    let store = EventStore::new();
    let event = store.insert_event(NewEvent::default(), ORGANIZER).await;
    assert_eq!(event.id, EventId::new("evt-1"));
    assert_eq!(event.name, DEFAULT_EVENT_NAME);
    assert_eq!(event.description, DEFAULT_EVENT_DESCRIPTION);
    assert_eq!(event.location, DEFAULT_EVENT_LOCATION);
    assert_eq!(event.event_type, EventType::Hackathon);
    assert_eq!(event.organizer, ORGANIZER);
    assert_eq!(event.total_registered, 0);
    assert!(event.attendees.is_empty());
    assert!(!event.is_published());
}

#[tokio::test]
async fn event_ids_do_not_depend_on_collection_length() {
    let store = EventStore::from_events(Vec::new());
    let (first, second) = tokio::join!(
        store.insert_event(NewEvent::default(), ORGANIZER),
        store.insert_event(NewEvent::default(), ORGANIZER),
    );
    assert_ne!(first.id, second.id);
    assert_eq!(store.len().await, 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_inserts_keep_ids_in_list_order() {
    let store = EventStore::with_sample_data();
    let mut handles = Vec::new();
    for _ in 0..64 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store.insert_event(NewEvent::default(), ORGANIZER).await
        }));
    }
    for handle in handles {
        handle.await.expect("join");
    }

    let seqs: Vec<u64> = store
        .list_events()
        .await
        .iter()
        .map(|e| event_seq(&e.id).expect("numbered id"))
        .collect();
    let expected: Vec<u64> = (1..=69).collect();
    assert_eq!(seqs, expected);
}

#[tokio::test]
async fn get_event_returns_none_for_unknown_id() {
    let store = EventStore::with_sample_data();
    assert!(store.get_event(&EventId::new("nonexistent")).await.is_none());
    assert!(store.get_event(&EventId::new("evt-3")).await.is_some());
}

#[tokio::test]
async fn add_attendee_generates_wallet_and_counts_registration() {
    let (store, event_id) = store_with_event().await;
    let event = store
        .add_attendee(&event_id, pending("Zoe"))
        .await
        .expect("add attendee");
    assert_eq!(event.total_registered, 1);
    let attendee = &event.attendees[0];
    assert!(is_wallet_address(&attendee.wallet_address));
    assert_eq!(attendee.status, AttendanceStatus::Pending);
    assert!(attendee.check_in_time.is_none());
}

#[tokio::test]
async fn add_attendee_keeps_supplied_wallet() {
    let (store, event_id) = store_with_event().await;
    let mut new_attendee = pending("Ann");
    new_attendee.wallet_address = format!("  {ORGANIZER} ");
    let event = store
        .add_attendee(&event_id, new_attendee)
        .await
        .expect("add attendee");
    assert_eq!(event.attendees[0].wallet_address, ORGANIZER);
}

#[tokio::test]
async fn add_present_attendee_counts_towards_present_total() {
    let (store, event_id) = store_with_event().await;
    let mut new_attendee = pending("Kim");
    new_attendee.status = AttendanceStatus::Present;
    let event = store
        .add_attendee(&event_id, new_attendee)
        .await
        .expect("add attendee");
    assert_eq!(event.total_present, 1);
    assert!(event.attendees[0].check_in_time.is_some());
}

#[tokio::test]
async fn add_attendee_to_missing_event_is_not_found() {
    let store = EventStore::new();
    let err = store
        .add_attendee(&EventId::new("evt-404"), pending("Nobody"))
        .await
        .expect_err("should fail");
    assert_eq!(err, StoreError::EventNotFound(EventId::new("evt-404")));
}

#[tokio::test]
async fn set_attendance_tracks_present_total_across_transitions() {
    let (store, event_id) = store_with_event().await;
    let event = store
        .add_attendee(&event_id, pending("Ann"))
        .await
        .expect("add");
    let attendee_id = event.attendees[0].id.clone();

    let steps = [
        (AttendanceStatus::Present, 1),
        (AttendanceStatus::Present, 1),
        (AttendanceStatus::Absent, 0),
        (AttendanceStatus::Pending, 0),
        (AttendanceStatus::Present, 1),
        (AttendanceStatus::Pending, 0),
    ];
    for (status, expected) in steps {
        let event = store
            .set_attendance(&event_id, &attendee_id, status)
            .await
            .expect("set attendance");
        assert_eq!(event.total_present, expected, "after {status}");
        assert_eq!(event.total_present, event.count_present());
    }
}

#[tokio::test]
async fn leaving_present_keeps_last_check_in() {
    let (store, event_id) = store_with_event().await;
    let event = store
        .add_attendee(&event_id, pending("Ann"))
        .await
        .expect("add");
    let attendee_id = event.attendees[0].id.clone();

    let present = store
        .set_attendance(&event_id, &attendee_id, AttendanceStatus::Present)
        .await
        .expect("present");
    let checked_in = present.attendees[0].check_in_time.expect("check-in time");

    let absent = store
        .set_attendance(&event_id, &attendee_id, AttendanceStatus::Absent)
        .await
        .expect("absent");
    assert_eq!(absent.attendees[0].check_in_time, Some(checked_in));
}

#[tokio::test]
async fn set_attendance_reports_missing_attendee() {
    let (store, event_id) = store_with_event().await;
    let err = store
        .set_attendance(&event_id, &AttendeeId::new("att-x"), AttendanceStatus::Present)
        .await
        .expect_err("should fail");
    assert!(matches!(err, StoreError::AttendeeNotFound { .. }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_marks_do_not_lose_updates() {
    let store = EventStore::with_sample_data();
    let event_id = EventId::new("evt-3");
    let event = store.get_event(&event_id).await.expect("evt-3");

    let mut handles = Vec::new();
    for attendee in event.attendees.iter().take(100) {
        let store = store.clone();
        let event_id = event_id.clone();
        let attendee_id = attendee.id.clone();
        handles.push(tokio::spawn(async move {
            store
                .set_attendance(&event_id, &attendee_id, AttendanceStatus::Present)
                .await
                .expect("mark present");
        }));
    }
    for handle in handles {
        handle.await.expect("join");
    }

    let event = store.get_event(&event_id).await.expect("evt-3");
    assert_eq!(event.total_present, event.count_present());
    assert!(event.total_present >= 100);
}

#[tokio::test]
async fn record_publication_replaces_identifiers() {
    let store = EventStore::with_sample_data();
    let event_id = EventId::new("evt-1");
    let receipt = PublishReceipt {
        ipfs_hash: generate_ipfs_hash("Qm"),
        blockchain_tx_id: generate_tx_id(),
    };
    let event = store
        .record_publication(&event_id, &receipt)
        .await
        .expect("publish");
    assert_eq!(event.ipfs_hash.as_deref(), Some(receipt.ipfs_hash.as_str()));
    assert_eq!(
        event.blockchain_tx_id.as_deref(),
        Some(receipt.blockchain_tx_id.as_str())
    );
}

#[tokio::test]
async fn lists_events_by_type() {
    let store = EventStore::with_sample_data();
    let colleges = store.list_events_by_type(EventType::College).await;
    let names: Vec<&str> = colleges.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Blockchain 101", "Smart Contract Security"]);
}

#[test]
fn apply_status_is_pure_over_the_event() {
    let mut event = sample_events(Utc::now()).remove(4);
    let before = event.total_present;
    let target = event
        .attendees
        .iter()
        .find(|a| !a.status.is_present())
        .map(|a| a.id.clone())
        .expect("someone not present");
    let now = Utc::now();
    apply_status(&mut event, &target, AttendanceStatus::Present, now).expect("apply");
    assert_eq!(event.total_present, before + 1);
    assert_eq!(event.attendee(&target).and_then(|a| a.check_in_time), Some(now));
}
