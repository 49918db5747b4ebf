use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use ledger_api::{load_settings, AttendanceApi, LatencySettings, LedgerContext};
use shared::{
    domain::{AttendanceStatus, EventId, EventType},
    protocol::{Event, NewAttendee, NewEvent},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ledger", about = "Drive the attendance ledger from the terminal")]
struct Cli {
    /// Skip the simulated network delays.
    #[arg(long, global = true)]
    no_delay: bool,
    /// Start without the sample events.
    #[arg(long, global = true)]
    empty: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    List {
        #[arg(long = "type", value_enum)]
        event_type: Option<EventKind>,
    },
    Show {
        event_id: String,
    },
    Demo,
    Wallet,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum EventKind {
    Concert,
    Hackathon,
    College,
}

impl From<EventKind> for EventType {
    fn from(value: EventKind) -> Self {
        match value {
            EventKind::Concert => EventType::Concert,
            EventKind::Hackathon => EventType::Hackathon,
            EventKind::College => EventType::College,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let mut settings = load_settings();
    if cli.no_delay {
        settings.latency = LatencySettings::none();
    }
    if cli.empty {
        settings.seed_sample_data = false;
    }
    let api: Arc<dyn AttendanceApi> = Arc::new(LedgerContext::new(settings));

    match cli.command {
        Command::List { event_type } => {
            let events = match event_type {
                Some(kind) => api.list_events_by_type(kind.into()).await,
                None => api.list_events().await,
            };
            for event in &events {
                println!("{}", summary_line(event));
            }
        }
        Command::Show { event_id } => {
            let event = api
                .get_event(&EventId(event_id.clone()))
                .await
                .ok_or_else(|| anyhow!("event {event_id} not found"))?;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        Command::Demo => run_demo(api.as_ref()).await?,
        Command::Wallet => {
            let user = api.connect_wallet().await;
            println!(
                "connected {} ({}), {} events, {} nfts",
                user.name,
                user.wallet_address,
                user.events.len(),
                user.nfts.len()
            );
        }
    }

    Ok(())
}

async fn run_demo(api: &dyn AttendanceApi) -> Result<()> {
    let event = api
        .create_event(NewEvent {
            name: Some("Ledger Demo Night".into()),
            description: Some("Walkthrough of check-in and publishing".into()),
            event_type: Some(EventType::Hackathon),
            date: None,
            location: Some("Virtual".into()),
        })
        .await?;
    info!(event_id = %event.id, "demo event created");

    for name in ["Ada", "Grace", "Linus"] {
        api.add_attendee(
            &event.id,
            NewAttendee {
                name: name.into(),
                wallet_address: String::new(),
                status: AttendanceStatus::Pending,
            },
        )
        .await?;
    }

    let registered = api
        .get_event(&event.id)
        .await
        .ok_or_else(|| anyhow!("event {} vanished", event.id))?;
    let statuses = [
        AttendanceStatus::Present,
        AttendanceStatus::Absent,
        AttendanceStatus::Present,
    ];
    for (attendee, status) in registered.attendees.iter().zip(statuses) {
        api.mark_attendance(&event.id, &attendee.id, status).await?;
    }

    let receipt = api.publish_to_blockchain(&event.id).await?;
    info!(ipfs_hash = %receipt.ipfs_hash, tx_id = %receipt.blockchain_tx_id, "demo published");

    let published = api
        .get_event(&event.id)
        .await
        .ok_or_else(|| anyhow!("event {} vanished", event.id))?;
    println!("{}", serde_json::to_string_pretty(&published)?);
    Ok(())
}

fn summary_line(event: &Event) -> String {
    format!(
        "{:<8} {:<28} {:<14} {:>4}/{:<4} {:>3}%  {}",
        event.id,
        event.name,
        event.event_type,
        event.total_present,
        event.total_registered,
        event.attendance_rate(),
        if event.is_published() { "published" } else { "open" }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn parses_type_filter_and_global_flags() {
        let cli = Cli::try_parse_from(["ledger", "list", "--type", "college", "--no-delay"])
            .expect("parse");
        assert!(cli.no_delay);
        assert!(matches!(
            cli.command,
            Command::List {
                event_type: Some(EventKind::College)
            }
        ));
    }

    #[test]
    fn summary_line_shows_rate_and_publication() {
        let event = Event {
            id: EventId::new("evt-9"),
            name: "Demo".into(),
            description: String::new(),
            event_type: EventType::Concert,
            date: Utc::now(),
            location: "Virtual".into(),
            total_registered: 4,
            total_present: 3,
            attendees: Vec::new(),
            organizer: "0x0".into(),
            ipfs_hash: Some("Qm".into()),
            blockchain_tx_id: Some("0x".into()),
        };
        let line = summary_line(&event);
        assert!(line.starts_with("evt-9   "));
        assert!(line.contains(" 75%"));
        assert!(line.ends_with("published"));
    }
}
