use std::{fs, io::ErrorKind, path::Path, time::Duration};

use serde::Deserialize;
use tracing::warn;

pub const DEFAULT_SETTINGS_FILE: &str = "ledger.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub organizer_name: String,
    pub organizer_address: String,
    pub ipfs_hash_prefix: String,
    pub seed_sample_data: bool,
    pub latency: LatencySettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            organizer_name: "Alex Developer".into(),
            organizer_address: "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045".into(),
            ipfs_hash_prefix: "Qm".into(),
            seed_sample_data: true,
            latency: LatencySettings::default(),
        }
    }
}

/// Artificial delays applied before each operation touches the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LatencySettings {
    pub get_event_ms: u64,
    pub create_event_ms: u64,
    pub add_attendee_ms: u64,
    pub mark_attendance_ms: u64,
    pub publish_ms: u64,
    pub connect_wallet_ms: u64,
}

impl Default for LatencySettings {
    fn default() -> Self {
        Self {
            get_event_ms: 300,
            create_event_ms: 1000,
            add_attendee_ms: 500,
            mark_attendance_ms: 500,
            publish_ms: 2000,
            connect_wallet_ms: 1000,
        }
    }
}

impl LatencySettings {
    pub fn none() -> Self {
        Self {
            get_event_ms: 0,
            create_event_ms: 0,
            add_attendee_ms: 0,
            mark_attendance_ms: 0,
            publish_ms: 0,
            connect_wallet_ms: 0,
        }
    }

    pub fn scaled(self, factor: f64) -> Self {
        let scale = |ms: u64| (ms as f64 * factor.max(0.0)).round() as u64;
        Self {
            get_event_ms: scale(self.get_event_ms),
            create_event_ms: scale(self.create_event_ms),
            add_attendee_ms: scale(self.add_attendee_ms),
            mark_attendance_ms: scale(self.mark_attendance_ms),
            publish_ms: scale(self.publish_ms),
            connect_wallet_ms: scale(self.connect_wallet_ms),
        }
    }

    pub fn get_event(&self) -> Duration {
        Duration::from_millis(self.get_event_ms)
    }

    pub fn create_event(&self) -> Duration {
        Duration::from_millis(self.create_event_ms)
    }

    pub fn add_attendee(&self) -> Duration {
        Duration::from_millis(self.add_attendee_ms)
    }

    pub fn mark_attendance(&self) -> Duration {
        Duration::from_millis(self.mark_attendance_ms)
    }

    pub fn publish(&self) -> Duration {
        Duration::from_millis(self.publish_ms)
    }

    pub fn connect_wallet(&self) -> Duration {
        Duration::from_millis(self.connect_wallet_ms)
    }
}

/// Defaults, then `ledger.toml` in the working directory, then `APP__*` env vars.
pub fn load_settings() -> Settings {
    let settings = load_settings_file(Path::new(DEFAULT_SETTINGS_FILE));
    apply_env_overrides(settings, |key| std::env::var(key).ok())
}

pub fn load_settings_file(path: &Path) -> Settings {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => return Settings::default(),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "ignoring unreadable settings file");
            return Settings::default();
        }
    };
    match toml::from_str::<Settings>(&raw) {
        Ok(settings) => settings,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "ignoring malformed settings file");
            Settings::default()
        }
    }
}

pub fn apply_env_overrides<F>(mut settings: Settings, lookup: F) -> Settings
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup("APP__ORGANIZER_NAME") {
        settings.organizer_name = v;
    }
    if let Some(v) = lookup("APP__ORGANIZER_ADDRESS") {
        settings.organizer_address = v;
    }
    if let Some(v) = lookup("APP__IPFS_HASH_PREFIX") {
        settings.ipfs_hash_prefix = v;
    }
    if let Some(v) = lookup("APP__SEED_SAMPLE_DATA") {
        match v.parse::<bool>() {
            Ok(parsed) => settings.seed_sample_data = parsed,
            Err(_) => warn!(value = %v, "ignoring APP__SEED_SAMPLE_DATA"),
        }
    }
    if let Some(v) = lookup("APP__LATENCY_SCALE") {
        match v.parse::<f64>() {
            Ok(factor) if factor.is_finite() && factor >= 0.0 => {
                settings.latency = settings.latency.scaled(factor);
            }
            _ => warn!(value = %v, "ignoring APP__LATENCY_SCALE"),
        }
    }

    settings
}
