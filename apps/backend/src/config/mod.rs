//! Application configuration loaded from environment variables.
//!
//! Everything has a default except values that fail to parse; a bad value
//! is a startup error rather than a silent fallback.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::domain::{DrawPolicy, FirstTurnPolicy, GameRules, HAND_SIZE};
use crate::error::AppError;
use crate::middleware::cors::sanitize_origins;
use crate::services::session_store::IdlePolicy;

const DEFAULT_MAX_JSON_PAYLOAD_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone)]
pub struct AppConfig {
    // Server
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_json_payload_size: usize,

    // Card catalog
    pub characters_path: PathBuf,
    pub bonuses_path: PathBuf,

    // Rules
    pub first_turn: FirstTurnPolicy,
    pub draw_policy: DrawPolicy,

    // Idle eviction
    pub waiting_idle_secs: u64,
    pub playing_idle_secs: u64,
    pub finished_retention_secs: u64,
    pub janitor_interval_secs: u64,

    /// Best-effort JSON snapshots; `None` disables them.
    pub snapshot_dir: Option<PathBuf>,

    /// Grace period for open websockets on shutdown.
    pub shutdown_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            cors_allowed_origins: Vec::new(),
            max_json_payload_size: DEFAULT_MAX_JSON_PAYLOAD_SIZE,
            characters_path: PathBuf::from("stock/personnages.json"),
            bonuses_path: PathBuf::from("stock/bonus.json"),
            first_turn: FirstTurnPolicy::default(),
            draw_policy: DrawPolicy::default(),
            waiting_idle_secs: 900,
            playing_idle_secs: 1800,
            finished_retention_secs: 300,
            janitor_interval_secs: 30,
            snapshot_dir: None,
            shutdown_timeout_secs: 2,
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through `lookup`, which returns a variable's value
    /// if it is set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let host = var("DUEL_HOST").unwrap_or(defaults.host);
        let port = parsed(&var, "DUEL_PORT", defaults.port)?;

        let cors_allowed_origins = var("CORS_ALLOWED_ORIGINS")
            .map(|raw| sanitize_origins(&raw))
            .unwrap_or_default();
        let max_json_payload_size =
            parsed(&var, "MAX_JSON_PAYLOAD_SIZE", defaults.max_json_payload_size)?;

        let characters_path = var("DUEL_CHARACTERS_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.characters_path);
        let bonuses_path = var("DUEL_BONUSES_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.bonuses_path);

        let first_turn = parsed(&var, "DUEL_FIRST_TURN", defaults.first_turn)?;
        let draw_policy = parsed(&var, "DUEL_DRAW_POLICY", defaults.draw_policy)?;

        let waiting_idle_secs = parsed(&var, "DUEL_WAITING_IDLE_SECS", defaults.waiting_idle_secs)?;
        let playing_idle_secs = parsed(&var, "DUEL_PLAYING_IDLE_SECS", defaults.playing_idle_secs)?;
        let finished_retention_secs = parsed(
            &var,
            "DUEL_FINISHED_RETENTION_SECS",
            defaults.finished_retention_secs,
        )?;
        let janitor_interval_secs = parsed(
            &var,
            "DUEL_JANITOR_INTERVAL_SECS",
            defaults.janitor_interval_secs,
        )?;
        if janitor_interval_secs == 0 {
            return Err(AppError::config(
                "DUEL_JANITOR_INTERVAL_SECS must be greater than zero".to_string(),
            ));
        }

        let snapshot_dir = var("DUEL_SNAPSHOT_DIR").map(PathBuf::from);

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            max_json_payload_size,
            characters_path,
            bonuses_path,
            first_turn,
            draw_policy,
            waiting_idle_secs,
            playing_idle_secs,
            finished_retention_secs,
            janitor_interval_secs,
            snapshot_dir,
            shutdown_timeout_secs: defaults.shutdown_timeout_secs,
        })
    }

    pub fn rules(&self) -> GameRules {
        GameRules {
            hand_size: HAND_SIZE,
            first_turn: self.first_turn,
            draw: self.draw_policy,
        }
    }

    pub fn idle_policy(&self) -> IdlePolicy {
        IdlePolicy {
            waiting: secs(self.waiting_idle_secs),
            playing: secs(self.playing_idle_secs),
            finished: secs(self.finished_retention_secs),
        }
    }

    pub fn janitor_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.janitor_interval_secs)
    }
}

fn secs(value: u64) -> time::Duration {
    time::Duration::seconds(i64::try_from(value).unwrap_or(i64::MAX))
}

fn parsed<T, F>(var: &F, name: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match var(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| AppError::config(format!("{name} has invalid value '{raw}': {e}"))),
    }
}
