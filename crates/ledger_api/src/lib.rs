use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::Utc;
use shared::{
    domain::{AttendanceStatus, AttendeeId, EventId, EventType},
    error::{ApiError, ErrorCode},
    protocol::{Event, NewAttendee, NewEvent, Nft, PublishReceipt, User},
};
use storage::{apply_status, generate_ipfs_hash, generate_tx_id, sample_nfts, EventStore};
use tracing::{debug, info, warn};

pub mod config;

pub use config::{load_settings, LatencySettings, Settings};

/// Everything the attendance operations need, passed explicitly to callers.
#[derive(Clone)]
pub struct LedgerContext {
    pub store: EventStore,
    pub settings: Arc<Settings>,
    pub nfts: Arc<Vec<Nft>>,
}

impl LedgerContext {
    pub fn new(settings: Settings) -> Self {
        let (store, nfts) = if settings.seed_sample_data {
            (EventStore::with_sample_data(), sample_nfts(Utc::now()))
        } else {
            (EventStore::new(), Vec::new())
        };
        Self::with_store(store, nfts, settings)
    }

    pub fn with_store(store: EventStore, nfts: Vec<Nft>, settings: Settings) -> Self {
        Self {
            store,
            settings: Arc::new(settings),
            nfts: Arc::new(nfts),
        }
    }
}

/// The data-access surface the presentation side depends on.
#[async_trait]
pub trait AttendanceApi: Send + Sync {
    async fn list_events(&self) -> Vec<Event>;
    async fn list_events_by_type(&self, event_type: EventType) -> Vec<Event>;
    async fn get_event(&self, event_id: &EventId) -> Option<Event>;
    async fn create_event(&self, new_event: NewEvent) -> Result<Event, ApiError>;
    async fn add_attendee(
        &self,
        event_id: &EventId,
        new_attendee: NewAttendee,
    ) -> Result<Event, ApiError>;
    async fn mark_attendance(
        &self,
        event_id: &EventId,
        attendee_id: &AttendeeId,
        status: AttendanceStatus,
    ) -> Result<Event, ApiError>;
    async fn publish_to_blockchain(&self, event_id: &EventId) -> Result<PublishReceipt, ApiError>;
    async fn connect_wallet(&self) -> User;
    async fn list_nfts(&self) -> Vec<Nft>;
}

pub async fn list_events(ctx: &LedgerContext) -> Vec<Event> {
    ctx.store.list_events().await
}

pub async fn list_events_by_type(ctx: &LedgerContext, event_type: EventType) -> Vec<Event> {
    ctx.store.list_events_by_type(event_type).await
}

/// Resolves to `None` for unknown ids; never an error.
pub async fn get_event(ctx: &LedgerContext, event_id: &EventId) -> Option<Event> {
    simulate_latency(ctx.settings.latency.get_event()).await;
    let event = ctx.store.get_event(event_id).await;
    debug!(%event_id, found = event.is_some(), "get_event");
    event
}

pub async fn create_event(ctx: &LedgerContext, new_event: NewEvent) -> Result<Event, ApiError> {
    let new_event = NewEvent {
        name: non_blank("name", new_event.name)?,
        description: non_blank("description", new_event.description)?,
        event_type: new_event.event_type,
        date: new_event.date,
        location: non_blank("location", new_event.location)?,
    };

    simulate_latency(ctx.settings.latency.create_event()).await;
    let event = ctx
        .store
        .insert_event(new_event, &ctx.settings.organizer_address)
        .await;
    info!(event_id = %event.id, name = %event.name, "event created");
    Ok(event)
}

pub async fn add_attendee(
    ctx: &LedgerContext,
    event_id: &EventId,
    new_attendee: NewAttendee,
) -> Result<Event, ApiError> {
    require_event_id(event_id)?;
    let name = new_attendee.name.trim();
    if name.is_empty() {
        warn!(%event_id, "rejected attendee without a name");
        return Err(ApiError::validation("attendee name is required"));
    }
    let new_attendee = NewAttendee {
        name: name.to_string(),
        ..new_attendee
    };

    simulate_latency(ctx.settings.latency.add_attendee()).await;
    let event = ctx.store.add_attendee(event_id, new_attendee).await?;
    info!(
        %event_id,
        total_registered = event.total_registered,
        "attendee added"
    );
    Ok(event)
}

/// Updates one attendee's status. Published events reject the change.
pub async fn mark_attendance(
    ctx: &LedgerContext,
    event_id: &EventId,
    attendee_id: &AttendeeId,
    status: AttendanceStatus,
) -> Result<Event, ApiError> {
    require_event_id(event_id)?;
    simulate_latency(ctx.settings.latency.mark_attendance()).await;

    let result = ctx
        .store
        .update_event(event_id, |event: &mut Event| -> Result<Event, ApiError> {
            if event.is_published() {
                return Err(ApiError::new(
                    ErrorCode::Locked,
                    format!("event {} is already published", event.id),
                ));
            }
            apply_status(event, attendee_id, status, Utc::now())?;
            Ok(event.clone())
        })
        .await?;

    match &result {
        Ok(event) => info!(
            %event_id,
            %attendee_id,
            %status,
            total_present = event.total_present,
            "attendance marked"
        ),
        Err(err) => warn!(%event_id, %attendee_id, error = %err, "attendance rejected"),
    }
    result
}

/// Generates a fresh receipt on every call and stores it on the event.
pub async fn publish_to_blockchain(
    ctx: &LedgerContext,
    event_id: &EventId,
) -> Result<PublishReceipt, ApiError> {
    require_event_id(event_id)?;
    simulate_latency(ctx.settings.latency.publish()).await;

    let receipt = PublishReceipt {
        ipfs_hash: generate_ipfs_hash(&ctx.settings.ipfs_hash_prefix),
        blockchain_tx_id: generate_tx_id(),
    };
    ctx.store.record_publication(event_id, &receipt).await?;
    info!(
        %event_id,
        ipfs_hash = %receipt.ipfs_hash,
        tx_id = %receipt.blockchain_tx_id,
        "attendance published"
    );
    Ok(receipt)
}

pub async fn connect_wallet(ctx: &LedgerContext) -> User {
    simulate_latency(ctx.settings.latency.connect_wallet()).await;
    let events = ctx.store.list_events().await;
    info!(address = %ctx.settings.organizer_address, "wallet connected");
    User {
        name: ctx.settings.organizer_name.clone(),
        wallet_address: ctx.settings.organizer_address.clone(),
        is_connected: true,
        is_organizer: true,
        events,
        nfts: ctx.nfts.as_ref().clone(),
    }
}

pub fn list_nfts(ctx: &LedgerContext) -> Vec<Nft> {
    ctx.nfts.as_ref().clone()
}

#[async_trait]
impl AttendanceApi for LedgerContext {
    async fn list_events(&self) -> Vec<Event> {
        list_events(self).await
    }

    async fn list_events_by_type(&self, event_type: EventType) -> Vec<Event> {
        list_events_by_type(self, event_type).await
    }

    async fn get_event(&self, event_id: &EventId) -> Option<Event> {
        get_event(self, event_id).await
    }

    async fn create_event(&self, new_event: NewEvent) -> Result<Event, ApiError> {
        create_event(self, new_event).await
    }

    async fn add_attendee(
        &self,
        event_id: &EventId,
        new_attendee: NewAttendee,
    ) -> Result<Event, ApiError> {
        add_attendee(self, event_id, new_attendee).await
    }

    async fn mark_attendance(
        &self,
        event_id: &EventId,
        attendee_id: &AttendeeId,
        status: AttendanceStatus,
    ) -> Result<Event, ApiError> {
        mark_attendance(self, event_id, attendee_id, status).await
    }

    async fn publish_to_blockchain(&self, event_id: &EventId) -> Result<PublishReceipt, ApiError> {
        publish_to_blockchain(self, event_id).await
    }

    async fn connect_wallet(&self) -> User {
        connect_wallet(self).await
    }

    async fn list_nfts(&self) -> Vec<Nft> {
        list_nfts(self)
    }
}

async fn simulate_latency(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

fn require_event_id(event_id: &EventId) -> Result<(), ApiError> {
    if event_id.as_str().trim().is_empty() {
        warn!("rejected request without an event id");
        return Err(ApiError::validation("event id is required"));
    }
    Ok(())
}

fn non_blank(field: &str, value: Option<String>) -> Result<Option<String>, ApiError> {
    match value {
        None => Ok(None),
        Some(v) if v.trim().is_empty() => {
            warn!(field, "rejected blank event field");
            Err(ApiError::validation(format!("event {field} must not be blank")))
        }
        Some(v) => Ok(Some(v.trim().to_string())),
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
