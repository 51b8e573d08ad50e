//! Application-level configuration loading: default game settings and the
//! per-player track contribution limits.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::state::room::{ANSWER_TIME_CHOICES, CLIP_DURATION_CHOICES, GameSettings};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "BEAT_RETO_BACK_CONFIG_PATH";

/// Settings applied when a room is created without explicit ones.
const DEFAULT_SETTINGS: GameSettings = GameSettings {
    clip_duration_secs: 3,
    answer_time_secs: 10,
    num_rounds: 10,
    flexible_mode: true,
    artist_required: false,
};
/// Built-in contribution bounds per player.
const DEFAULT_TRACK_LIMITS: TrackLimits = TrackLimits {
    min_per_player: 5,
    max_per_player: 10,
};

/// How many tracks each player must and may contribute.
#[derive(Debug, Clone, Copy)]
pub struct TrackLimits {
    /// Minimum contributions before a player can mark themselves ready.
    pub min_per_player: usize,
    /// Maximum contributions accepted from one player.
    pub max_per_player: usize,
}

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    default_settings: GameSettings,
    track_limits: TrackLimits,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to the
    /// baked-in defaults when the file is absent or malformed.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let config: Self = raw.into();
                    info!(path = %path.display(), "loaded configuration from file");
                    config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Settings used when room creation omits explicit ones.
    pub fn default_settings(&self) -> GameSettings {
        self.default_settings
    }

    /// Per-player contribution bounds.
    pub fn track_limits(&self) -> TrackLimits {
        self.track_limits
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_settings: DEFAULT_SETTINGS,
            track_limits: DEFAULT_TRACK_LIMITS,
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file.
struct RawConfig {
    #[serde(default)]
    default_settings: Option<RawSettings>,
    #[serde(default)]
    tracks_per_player: Option<RawTrackLimits>,
}

#[derive(Debug, Deserialize)]
struct RawSettings {
    clip_duration_secs: u8,
    answer_time_secs: u8,
    num_rounds: usize,
    flexible_mode: bool,
    artist_required: bool,
}

#[derive(Debug, Deserialize)]
struct RawTrackLimits {
    min: usize,
    max: usize,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let default_settings = value
            .default_settings
            .and_then(|raw| match validate_settings(&raw) {
                Ok(()) => Some(GameSettings {
                    clip_duration_secs: raw.clip_duration_secs,
                    answer_time_secs: raw.answer_time_secs,
                    num_rounds: raw.num_rounds,
                    flexible_mode: raw.flexible_mode,
                    artist_required: raw.artist_required,
                }),
                Err(reason) => {
                    warn!(reason, "ignoring configured default settings");
                    None
                }
            })
            .unwrap_or(DEFAULT_SETTINGS);

        let track_limits = value
            .tracks_per_player
            .and_then(|raw| {
                if raw.min == 0 || raw.min > raw.max {
                    warn!(min = raw.min, max = raw.max, "ignoring configured track limits");
                    None
                } else {
                    Some(TrackLimits {
                        min_per_player: raw.min,
                        max_per_player: raw.max,
                    })
                }
            })
            .unwrap_or(DEFAULT_TRACK_LIMITS);

        Self {
            default_settings,
            track_limits,
        }
    }
}

/// Check a raw settings block against the allowed choice sets.
fn validate_settings(raw: &RawSettings) -> Result<(), &'static str> {
    if !CLIP_DURATION_CHOICES.contains(&raw.clip_duration_secs) {
        return Err("clip duration must be 3, 4, or 5 seconds");
    }
    if !ANSWER_TIME_CHOICES.contains(&raw.answer_time_secs) {
        return Err("answer time must be 8, 10, or 12 seconds");
    }
    if raw.num_rounds == 0 {
        return Err("number of rounds must be strictly positive");
    }
    Ok(())
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_raw_settings_fall_back_to_defaults() {
        let raw = RawConfig {
            default_settings: Some(RawSettings {
                clip_duration_secs: 7,
                answer_time_secs: 10,
                num_rounds: 10,
                flexible_mode: true,
                artist_required: false,
            }),
            tracks_per_player: None,
        };
        let config: AppConfig = raw.into();
        assert_eq!(config.default_settings(), DEFAULT_SETTINGS);
    }

    #[test]
    fn inverted_track_limits_fall_back_to_defaults() {
        let raw = RawConfig {
            default_settings: None,
            tracks_per_player: Some(RawTrackLimits { min: 9, max: 2 }),
        };
        let config: AppConfig = raw.into();
        assert_eq!(config.track_limits().min_per_player, 5);
        assert_eq!(config.track_limits().max_per_player, 10);
    }

    #[test]
    fn valid_raw_config_is_applied() {
        let raw: RawConfig = serde_json::from_str(
            r#"{
                "default_settings": {
                    "clip_duration_secs": 5,
                    "answer_time_secs": 12,
                    "num_rounds": 8,
                    "flexible_mode": false,
                    "artist_required": false
                },
                "tracks_per_player": { "min": 3, "max": 6 }
            }"#,
        )
        .unwrap();
        let config: AppConfig = raw.into();
        assert_eq!(config.default_settings().clip_duration_secs, 5);
        assert_eq!(config.default_settings().answer_time_secs, 12);
        assert!(!config.default_settings().flexible_mode);
        assert_eq!(config.track_limits().min_per_player, 3);
    }
}
