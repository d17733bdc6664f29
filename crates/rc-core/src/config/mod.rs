//! Tracker configuration DTO
//!
//! Maps the TOML configuration file onto typed settings. Every value is
//! optional in the file; anything missing falls back to the built-in rule
//! set so an empty file yields the stock behavior.

use std::path::PathBuf;
use std::time::Duration;

use crate::identity::UserProfile;
use crate::supply::SupplyRules;

pub const DEFAULT_THROTTLE_WINDOW_MS: u64 = 200;
pub const DEFAULT_NOTIFICATION_MS: u64 = 900;

/// Where the key-value store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// JSON file on disk. An empty path means "use the platform data dir".
    File { path: PathBuf },
    /// Remote store reached over HTTP.
    Http { url: String },
    /// Process-local map, lost on exit.
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Coalescing window for slider-driven writes.
    pub throttle_window: Duration,
    /// Fire the first write of a burst immediately instead of at window end.
    pub leading_edge: bool,
    /// How long a notification stays on screen.
    pub notification_duration: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            throttle_window: Duration::from_millis(DEFAULT_THROTTLE_WINDOW_MS),
            leading_edge: false,
            notification_duration: Duration::from_millis(DEFAULT_NOTIFICATION_MS),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    pub supply: SupplyRules,
    pub sync: SyncConfig,
    pub storage: StorageBackend,
    /// Identity to show when the host does not provide one.
    pub profile: Option<UserProfile>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            supply: SupplyRules::default(),
            sync: SyncConfig::default(),
            storage: StorageBackend::File {
                path: PathBuf::new(),
            },
            profile: None,
        }
    }
}

fn get_u32(section: Option<&toml::Value>, key: &str) -> Option<u32> {
    section
        .and_then(|s| s.get(key))
        .and_then(|v| v.as_integer())
        .and_then(|v| u32::try_from(v).ok())
}

fn get_u64(section: Option<&toml::Value>, key: &str) -> Option<u64> {
    section
        .and_then(|s| s.get(key))
        .and_then(|v| v.as_integer())
        .and_then(|v| u64::try_from(v).ok())
}

fn get_str<'a>(section: Option<&'a toml::Value>, key: &str) -> Option<&'a str> {
    section.and_then(|s| s.get(key)).and_then(|v| v.as_str())
}

impl TrackerConfig {
    /// Create TrackerConfig from TOML value
    ///
    /// Unknown backends are rejected; every other missing or mistyped value
    /// falls back to its default.
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        let base = SupplyRules::default();
        let supply_section = toml_value.get("supply");
        let supply = SupplyRules {
            sheets_per_roll: get_u32(supply_section, "sheets_per_roll")
                .unwrap_or(base.sheets_per_roll),
            sheets_per_visit: get_u32(supply_section, "sheets_per_visit")
                .unwrap_or(base.sheets_per_visit),
            max_rolls: get_u32(supply_section, "max_rolls").unwrap_or(base.max_rolls),
            min_visits: get_u32(supply_section, "min_visits").unwrap_or(base.min_visits),
            max_visits: get_u32(supply_section, "max_visits").unwrap_or(base.max_visits),
            min_persons: get_u32(supply_section, "min_persons").unwrap_or(base.min_persons),
            max_persons: get_u32(supply_section, "max_persons").unwrap_or(base.max_persons),
            default_rolls: get_u32(supply_section, "default_rolls").unwrap_or(base.default_rolls),
            default_visits: get_u32(supply_section, "default_visits")
                .unwrap_or(base.default_visits),
            default_persons: get_u32(supply_section, "default_persons")
                .unwrap_or(base.default_persons),
        };
        if supply.sheets_per_roll == 0 || supply.sheets_per_visit == 0 {
            anyhow::bail!("supply.sheets_per_roll and supply.sheets_per_visit must be positive");
        }
        if supply.min_visits == 0 || supply.min_persons == 0 {
            anyhow::bail!("supply.min_visits and supply.min_persons must be at least 1");
        }
        if supply.min_visits > supply.max_visits || supply.min_persons > supply.max_persons {
            anyhow::bail!(
                "supply ranges are inverted: visits {}..={}, persons {}..={}",
                supply.min_visits,
                supply.max_visits,
                supply.min_persons,
                supply.max_persons
            );
        }
        if supply.default_rolls > supply.max_rolls
            || !(supply.min_visits..=supply.max_visits).contains(&supply.default_visits)
            || !(supply.min_persons..=supply.max_persons).contains(&supply.default_persons)
        {
            anyhow::bail!("supply defaults must lie within their ranges");
        }

        let sync_section = toml_value.get("sync");
        let sync = SyncConfig {
            throttle_window: Duration::from_millis(
                get_u64(sync_section, "throttle_window_ms").unwrap_or(DEFAULT_THROTTLE_WINDOW_MS),
            ),
            leading_edge: sync_section
                .and_then(|s| s.get("leading_edge"))
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
            notification_duration: Duration::from_millis(
                get_u64(sync_section, "notification_ms").unwrap_or(DEFAULT_NOTIFICATION_MS),
            ),
        };

        let storage_section = toml_value.get("storage");
        let storage = match get_str(storage_section, "backend").unwrap_or("file") {
            "file" => StorageBackend::File {
                path: PathBuf::from(get_str(storage_section, "path").unwrap_or("")),
            },
            "http" => StorageBackend::Http {
                url: get_str(storage_section, "url")
                    .ok_or_else(|| anyhow::anyhow!("storage.url is required for the http backend"))?
                    .to_string(),
            },
            "memory" => StorageBackend::Memory,
            other => anyhow::bail!("unknown storage backend: {}", other),
        };

        let profile_section = toml_value.get("profile");
        let profile = get_str(profile_section, "first_name").map(|name| UserProfile {
            first_name: name.to_string(),
            avatar_url: get_str(profile_section, "avatar_url").map(str::to_string),
        });

        Ok(Self {
            supply,
            sync,
            storage,
            profile,
        })
    }
}
