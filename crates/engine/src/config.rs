//! Engine configuration from the environment.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `GAMENIGHT_DATA_DIR` | `./data` |
//! | `GAMENIGHT_MAPS_DIR` | `./maps` |
//! | `GAMENIGHT_ADVENTURES_DIR` | unset (adventure files not checked) |
//! | `GAMENIGHT_NARRATOR_ID` | `gm` |
//! | `GAMENIGHT_TURN_TIMEOUT_SECS` | `120` |
//! | `GAMENIGHT_TIMER_INTERVAL_SECS` | `30` |
//! | `SERVER_HOST` | `0.0.0.0` |
//! | `SERVER_PORT` / `PORT` | `3000` |

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use gamenight_domain::{turn_timeout, ViewerId, DEFAULT_TURN_TIMEOUT_SECS};

const DEFAULT_TIMER_INTERVAL_SECS: u64 = 30;
const DEFAULT_NARRATOR_ID: &str = "gm";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub data_dir: PathBuf,
    pub maps_dir: PathBuf,
    pub adventures_dir: Option<PathBuf>,
    /// Viewer id of the narrator's own channel.
    pub narrator_id: String,
    pub turn_timeout_secs: u64,
    pub timer_interval: Duration,
    pub server_host: String,
    pub server_port: u16,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            maps_dir: PathBuf::from("./maps"),
            adventures_dir: None,
            narrator_id: DEFAULT_NARRATOR_ID.to_string(),
            turn_timeout_secs: DEFAULT_TURN_TIMEOUT_SECS,
            timer_interval: Duration::from_secs(DEFAULT_TIMER_INTERVAL_SECS),
            server_host: "0.0.0.0".to_string(),
            server_port: 3000,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or blank keys take the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let narrator_id = match var("GAMENIGHT_NARRATOR_ID").map(ViewerId::new) {
            Some(Ok(id)) => id.as_str().to_string(),
            Some(Err(e)) => {
                tracing::warn!(error = %e, "Invalid GAMENIGHT_NARRATOR_ID, using default");
                defaults.narrator_id
            }
            None => defaults.narrator_id,
        };

        let turn_timeout_secs = parse_or(
            "GAMENIGHT_TURN_TIMEOUT_SECS",
            var("GAMENIGHT_TURN_TIMEOUT_SECS"),
            defaults.turn_timeout_secs,
        );
        let turn_timeout_secs = match turn_timeout(turn_timeout_secs) {
            Ok(secs) => secs,
            Err(e) => {
                tracing::warn!(error = %e, "GAMENIGHT_TURN_TIMEOUT_SECS out of range, using default");
                DEFAULT_TURN_TIMEOUT_SECS
            }
        };

        let interval_secs = parse_or(
            "GAMENIGHT_TIMER_INTERVAL_SECS",
            var("GAMENIGHT_TIMER_INTERVAL_SECS"),
            DEFAULT_TIMER_INTERVAL_SECS,
        )
        .max(1);

        Self {
            data_dir: var("GAMENIGHT_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            maps_dir: var("GAMENIGHT_MAPS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.maps_dir),
            adventures_dir: var("GAMENIGHT_ADVENTURES_DIR").map(PathBuf::from),
            narrator_id,
            turn_timeout_secs,
            timer_interval: Duration::from_secs(interval_secs),
            server_host: var("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: parse_or(
                "SERVER_PORT",
                var("SERVER_PORT").or_else(|| var("PORT")),
                defaults.server_port,
            ),
        }
    }
}

fn parse_or<T: FromStr + Copy + std::fmt::Display>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, default = %default, "Invalid number, using default");
            default
        }),
        None => default,
    }
}
