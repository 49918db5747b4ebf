use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{AttendanceStatus, AttendeeId, EventId, EventType, NftId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    pub id: AttendeeId,
    pub name: String,
    pub wallet_address: String,
    pub status: AttendanceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_in_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub date: DateTime<Utc>,
    pub location: String,
    pub total_registered: u32,
    pub total_present: u32,
    pub attendees: Vec<Attendee>,
    pub organizer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipfs_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blockchain_tx_id: Option<String>,
}

impl Event {
    pub fn is_published(&self) -> bool {
        self.ipfs_hash.is_some() && self.blockchain_tx_id.is_some()
    }

    pub fn attendee(&self, attendee_id: &AttendeeId) -> Option<&Attendee> {
        self.attendees.iter().find(|a| &a.id == attendee_id)
    }

    pub fn count_present(&self) -> u32 {
        self.attendees.iter().filter(|a| a.status.is_present()).count() as u32
    }

    /// Share of registered attendees checked in, as a whole percentage.
    pub fn attendance_rate(&self) -> u32 {
        if self.total_present == 0 || self.total_registered == 0 {
            return 0;
        }
        (f64::from(self.total_present) / f64::from(self.total_registered) * 100.0).round() as u32
    }
}

/// Fields accepted when creating an event. Missing fields fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "type")]
    pub event_type: Option<EventType>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAttendee {
    pub name: String,
    /// Empty means "generate one".
    #[serde(default)]
    pub wallet_address: String,
    #[serde(default)]
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishReceipt {
    pub ipfs_hash: String,
    pub blockchain_tx_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Nft {
    pub id: NftId,
    pub name: String,
    pub description: String,
    pub image: String,
    pub event_id: EventId,
    pub earned_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub name: String,
    pub wallet_address: String,
    pub is_connected: bool,
    pub is_organizer: bool,
    pub events: Vec<Event>,
    pub nfts: Vec<Nft>,
}
