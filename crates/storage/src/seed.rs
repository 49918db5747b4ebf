use chrono::{DateTime, Duration, Utc};
use rand::{seq::SliceRandom, Rng};
use shared::{
    domain::{AttendanceStatus, EventId, EventType, NftId},
    protocol::{Attendee, Event, Nft},
};

use crate::generate::{generate_attendee_id, generate_wallet_address};

const ATTENDEE_NAMES: [&str; 20] = [
    "John Doe",
    "Jane Smith",
    "Alex Johnson",
    "Maria Garcia",
    "Wei Chen",
    "Emma Wilson",
    "Omar Hassan",
    "Priya Patel",
    "Carlos Rodriguez",
    "Fatima Ahmed",
    "Lucas Kim",
    "Sofia Nguyen",
    "Raj Sharma",
    "Nadia Ali",
    "David Cohen",
    "Aisha Mohammed",
    "Seo-Jun Park",
    "Layla Ibrahim",
    "Mateo Santos",
    "Zara Khan",
];

struct SampleEvent {
    name: &'static str,
    description: &'static str,
    event_type: EventType,
    day_offset: i64,
    location: &'static str,
    attendee_count: usize,
    published: Option<(&'static str, &'static str)>,
}

const SAMPLE_EVENTS: [SampleEvent; 5] = [
    SampleEvent {
        name: "ETHGlobal Hackathon",
        description: "A 48-hour hackathon focused on Ethereum development",
        event_type: EventType::Hackathon,
        day_offset: 7,
        location: "San Francisco, CA",
        attendee_count: 85,
        published: Some((
            "QmXjkFQjnD8i8qdJu4XuWuweV4JcmoB6xo1iY1DZ4xV3qa",
            "0x3a1b2c3d4e5f6a7b8c9d0e1f2a3b4c5d6e7f8a9b0c1d2e3f4a5b6c7d8e9f0a1b",
        )),
    },
    SampleEvent {
        name: "Blockchain 101",
        description: "Introduction to blockchain technology and applications",
        event_type: EventType::College,
        day_offset: -2,
        location: "Virtual",
        attendee_count: 120,
        published: Some((
            "QmYjkGQjnE8i9qdKu5XuWuweK4JdmoC6xo2iZ1DZ4xV3qb",
            "0x4b2c3d4e5f6a7b8c9d0e1f2a3b4c5d6e7f8a9b0c1d2e3f4a5b6c7d8e9f0a1b2",
        )),
    },
    SampleEvent {
        name: "CryptoBeats Festival",
        description: "Music festival with NFT tickets and Web3 experiences",
        event_type: EventType::Concert,
        day_offset: 14,
        location: "Miami, FL",
        attendee_count: 250,
        published: None,
    },
    SampleEvent {
        name: "Smart Contract Security",
        description: "Advanced course on securing blockchain applications",
        event_type: EventType::College,
        day_offset: -5,
        location: "Room 305, Computer Science Building",
        attendee_count: 45,
        published: Some((
            "QmZjkHQjnF8i9qdLu5XuWuweV4JdmoD6xo3iY1DZ4xV3qc",
            "0x5c3d4e5f6a7b8c9d0e1f2a3b4c5d6e7f8a9b0c1d2e3f4a5b6c7d8e9f0a1b2c3",
        )),
    },
    SampleEvent {
        name: "Web3 Developer Summit",
        description: "Conference for blockchain and Web3 developers",
        event_type: EventType::Hackathon,
        day_offset: 30,
        location: "Berlin, Germany",
        attendee_count: 350,
        published: None,
    },
];

/// The five demo events, ids `evt-1` through `evt-5`, dated relative to `now`.
pub fn sample_events(now: DateTime<Utc>) -> Vec<Event> {
    SAMPLE_EVENTS
        .iter()
        .enumerate()
        .map(|(index, sample)| {
            let attendees = sample_attendees(sample.attendee_count, now);
            let total_present = attendees.iter().filter(|a| a.status.is_present()).count();
            Event {
                id: EventId(format!("evt-{}", index + 1)),
                name: sample.name.to_string(),
                description: sample.description.to_string(),
                event_type: sample.event_type,
                date: now + Duration::days(sample.day_offset),
                location: sample.location.to_string(),
                total_registered: attendees.len() as u32,
                total_present: total_present as u32,
                attendees,
                organizer: generate_wallet_address(),
                ipfs_hash: sample.published.map(|(hash, _)| hash.to_string()),
                blockchain_tx_id: sample.published.map(|(_, tx)| tx.to_string()),
            }
        })
        .collect()
}

/// Attendance badges held by the demo organizer.
pub fn sample_nfts(now: DateTime<Utc>) -> Vec<Nft> {
    vec![
        Nft {
            id: NftId::new("nft-1"),
            name: "Perfect Attendance - Spring 2023".into(),
            description: "Awarded for 100% attendance in Blockchain 101".into(),
            image: "https://via.placeholder.com/300/6C5CE7/FFFFFF?text=100%25+Attendance".into(),
            event_id: EventId::new("evt-2"),
            earned_at: now - Duration::days(1),
        },
        Nft {
            id: NftId::new("nft-2"),
            name: "ETHGlobal Hacker".into(),
            description: "Participated in ETHGlobal Hackathon".into(),
            image: "https://via.placeholder.com/300/00D2FF/FFFFFF?text=ETHGlobal".into(),
            event_id: EventId::new("evt-1"),
            earned_at: now - Duration::days(7),
        },
    ]
}

fn sample_attendees(count: usize, now: DateTime<Utc>) -> Vec<Attendee> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| {
            let roll: f64 = rng.gen();
            let status = if roll > 0.7 {
                AttendanceStatus::Present
            } else if roll > 0.4 {
                AttendanceStatus::Absent
            } else {
                AttendanceStatus::Pending
            };
            let check_in_time = status
                .is_present()
                .then(|| now - Duration::milliseconds(rng.gen_range(0..3_600_000)));

            Attendee {
                id: generate_attendee_id(),
                name: ATTENDEE_NAMES
                    .choose(&mut rng)
                    .copied()
                    .unwrap_or(ATTENDEE_NAMES[0])
                    .to_string(),
                wallet_address: generate_wallet_address(),
                status,
                check_in_time,
            }
        })
        .collect()
}
