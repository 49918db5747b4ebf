use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use chrono::{DateTime, Utc};
use shared::{
    domain::{AttendanceStatus, AttendeeId, EventId, EventType},
    error::ApiError,
    protocol::{Attendee, Event, NewAttendee, NewEvent, PublishReceipt},
};
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};

mod generate;
mod seed;

pub use generate::{
    generate_attendee_id, generate_ipfs_hash, generate_tx_id, generate_wallet_address,
    is_wallet_address, IPFS_HASH_LEN,
};
pub use seed::{sample_events, sample_nfts};

pub const DEFAULT_EVENT_NAME: &str = "New Event";
pub const DEFAULT_EVENT_DESCRIPTION: &str = "No description provided";
pub const DEFAULT_EVENT_LOCATION: &str = "Virtual";

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("event {0} not found")]
    EventNotFound(EventId),
    #[error("attendee {attendee_id} not found in event {event_id}")]
    AttendeeNotFound {
        event_id: EventId,
        attendee_id: AttendeeId,
    },
}

impl From<StoreError> for ApiError {
    fn from(value: StoreError) -> Self {
        ApiError::not_found(value.to_string())
    }
}

type EventSlot = Arc<Mutex<Event>>;

#[derive(Default)]
struct Slots {
    order: Vec<EventId>,
    by_id: HashMap<EventId, EventSlot>,
}

impl Slots {
    fn push(&mut self, event: Event) {
        self.order.push(event.id.clone());
        self.by_id
            .insert(event.id.clone(), Arc::new(Mutex::new(event)));
    }
}

struct Inner {
    slots: RwLock<Slots>,
    next_event_seq: AtomicU64,
}

/// In-memory event ledger shared by cheap clones.
///
/// Every event sits behind its own mutex, so mutations on one event are
/// serialized while different events never contend. Reads return clones.
#[derive(Clone)]
pub struct EventStore {
    inner: Arc<Inner>,
}

impl Default for EventStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EventStore {
    pub fn new() -> Self {
        Self::from_events(Vec::new())
    }

    /// Store seeded with the five sample events.
    pub fn with_sample_data() -> Self {
        Self::from_events(sample_events(Utc::now()))
    }

    pub fn from_events(events: Vec<Event>) -> Self {
        let next_seq = events
            .iter()
            .filter_map(|event| event_seq(&event.id))
            .max()
            .unwrap_or(0)
            .max(events.len() as u64)
            + 1;

        let mut slots = Slots::default();
        for event in events {
            slots.push(event);
        }

        Self {
            inner: Arc::new(Inner {
                slots: RwLock::new(slots),
                next_event_seq: AtomicU64::new(next_seq),
            }),
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.slots.read().await.order.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn list_events(&self) -> Vec<Event> {
        let slots: Vec<EventSlot> = {
            let guard = self.inner.slots.read().await;
            guard
                .order
                .iter()
                .filter_map(|id| guard.by_id.get(id).cloned())
                .collect()
        };

        let mut events = Vec::with_capacity(slots.len());
        for slot in slots {
            events.push(slot.lock().await.clone());
        }
        events
    }

    pub async fn list_events_by_type(&self, event_type: EventType) -> Vec<Event> {
        self.list_events()
            .await
            .into_iter()
            .filter(|event| event.event_type == event_type)
            .collect()
    }

    pub async fn get_event(&self, event_id: &EventId) -> Option<Event> {
        let slot = self.slot(event_id).await.ok()?;
        let event = slot.lock().await;
        Some(event.clone())
    }

    pub async fn insert_event(&self, new_event: NewEvent, organizer: &str) -> Event {
        // Numbering under the write lock keeps ids in list order.
        let mut slots = self.inner.slots.write().await;
        let seq = self.inner.next_event_seq.fetch_add(1, Ordering::SeqCst);
        let event = Event {
            id: EventId(format!("evt-{seq}")),
            name: new_event
                .name
                .unwrap_or_else(|| DEFAULT_EVENT_NAME.to_string()),
            description: new_event
                .description
                .unwrap_or_else(|| DEFAULT_EVENT_DESCRIPTION.to_string()),
            event_type: new_event.event_type.unwrap_or(EventType::Hackathon),
            date: new_event.date.unwrap_or_else(Utc::now),
            location: new_event
                .location
                .unwrap_or_else(|| DEFAULT_EVENT_LOCATION.to_string()),
            total_registered: 0,
            total_present: 0,
            attendees: Vec::new(),
            organizer: organizer.to_string(),
            ipfs_hash: None,
            blockchain_tx_id: None,
        };

        slots.push(event.clone());
        event
    }

    pub async fn add_attendee(&self, event_id: &EventId, new_attendee: NewAttendee) -> Result<Event> {
        let wallet_address = match new_attendee.wallet_address.trim() {
            "" => generate_wallet_address(),
            supplied => supplied.to_string(),
        };
        let attendee = Attendee {
            id: generate_attendee_id(),
            name: new_attendee.name,
            wallet_address,
            status: new_attendee.status,
            check_in_time: new_attendee
                .status
                .is_present()
                .then(Utc::now),
        };

        let slot = self.slot(event_id).await?;
        let mut event = slot.lock().await;
        if attendee.status.is_present() {
            event.total_present += 1;
        }
        event.attendees.push(attendee);
        event.total_registered = event.attendees.len() as u32;
        Ok(event.clone())
    }

    pub async fn set_attendance(
        &self,
        event_id: &EventId,
        attendee_id: &AttendeeId,
        status: AttendanceStatus,
    ) -> Result<Event> {
        self.update_event(event_id, |event: &mut Event| -> Result<Event> {
            apply_status(event, attendee_id, status, Utc::now())?;
            Ok(event.clone())
        })
        .await?
    }

    pub async fn record_publication(
        &self,
        event_id: &EventId,
        receipt: &PublishReceipt,
    ) -> Result<Event> {
        let slot = self.slot(event_id).await?;
        let mut event = slot.lock().await;
        event.ipfs_hash = Some(receipt.ipfs_hash.clone());
        event.blockchain_tx_id = Some(receipt.blockchain_tx_id.clone());
        Ok(event.clone())
    }

    /// Runs `apply` against the event while holding its lock.
    pub async fn update_event<F, T>(&self, event_id: &EventId, apply: F) -> Result<T>
    where
        F: FnOnce(&mut Event) -> T,
    {
        let slot = self.slot(event_id).await?;
        let mut event = slot.lock().await;
        Ok(apply(&mut *event))
    }

    async fn slot(&self, event_id: &EventId) -> Result<EventSlot> {
        self.inner
            .slots
            .read()
            .await
            .by_id
            .get(event_id)
            .cloned()
            .ok_or_else(|| StoreError::EventNotFound(event_id.clone()))
    }
}

/// Moves one attendee to `status`, keeping `total_present` in step.
///
/// Setting Present always refreshes `check_in_time`; leaving Present keeps
/// the last check-in as history.
pub fn apply_status(
    event: &mut Event,
    attendee_id: &AttendeeId,
    status: AttendanceStatus,
    now: DateTime<Utc>,
) -> Result<()> {
    let Some(attendee) = event.attendees.iter_mut().find(|a| &a.id == attendee_id) else {
        return Err(StoreError::AttendeeNotFound {
            event_id: event.id.clone(),
            attendee_id: attendee_id.clone(),
        });
    };

    let was_present = attendee.status.is_present();
    attendee.status = status;

    if status.is_present() {
        attendee.check_in_time = Some(now);
        if !was_present {
            event.total_present += 1;
        }
    } else if was_present {
        event.total_present = event.total_present.saturating_sub(1);
    }

    Ok(())
}

fn event_seq(event_id: &EventId) -> Option<u64> {
    event_id.as_str().strip_prefix("evt-")?.parse().ok()
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
