//! Client configuration from environment variables.
//!
//! - `TETRIS_PLAYER_NAME`: display name (default: "player")
//! - `TETRIS_BOARD_WIDTH` / `TETRIS_BOARD_HEIGHT`: board extent (default: 10 / 20)
//! - `TETRIS_REPLAY_PATH`: snapshot script for the replay session
//! - `TETRIS_REPLAY_INTERVAL_MS`: delay between replayed snapshots (default: 500)
//! - `TETRIS_LOG_PATH`: log file (default: "tetris-client.log")
//! - `TETRIS_LOG_LEVEL`: log level filter (default: "info")

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use log::LevelFilter;

use crate::error::ClientError;
use crate::types::{Geometry, BOARD_HEIGHT, BOARD_WIDTH};

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub player_name: String,
    pub board_width: u16,
    pub board_height: u16,
    pub replay_path: Option<PathBuf>,
    pub replay_interval: Duration,
    pub log_path: PathBuf,
    pub log_level: LevelFilter,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            player_name: "player".to_string(),
            board_width: BOARD_WIDTH,
            board_height: BOARD_HEIGHT,
            replay_path: None,
            replay_interval: Duration::from_millis(500),
            log_path: PathBuf::from("tetris-client.log"),
            log_level: LevelFilter::Info,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ClientError> {
        let get = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        let defaults = Self::default();

        let config = Self {
            player_name: get("TETRIS_PLAYER_NAME").unwrap_or(defaults.player_name),
            board_width: parse_or(get("TETRIS_BOARD_WIDTH"), "TETRIS_BOARD_WIDTH", defaults.board_width)?,
            board_height: parse_or(get("TETRIS_BOARD_HEIGHT"), "TETRIS_BOARD_HEIGHT", defaults.board_height)?,
            replay_path: get("TETRIS_REPLAY_PATH").map(PathBuf::from),
            replay_interval: Duration::from_millis(parse_or(
                get("TETRIS_REPLAY_INTERVAL_MS"),
                "TETRIS_REPLAY_INTERVAL_MS",
                defaults.replay_interval.as_millis() as u64,
            )?),
            log_path: get("TETRIS_LOG_PATH").map(PathBuf::from).unwrap_or(defaults.log_path),
            log_level: parse_or(get("TETRIS_LOG_LEVEL"), "TETRIS_LOG_LEVEL", defaults.log_level)?,
        };

        // The board is drawn inside the fixed border box.
        let geometry = config.geometry();
        if !geometry.board_fits_width() {
            return Err(ClientError::Config {
                key: "TETRIS_BOARD_WIDTH",
                value: config.board_width.to_string(),
            });
        }
        if !geometry.board_fits_height() {
            return Err(ClientError::Config {
                key: "TETRIS_BOARD_HEIGHT",
                value: config.board_height.to_string(),
            });
        }
        Ok(config)
    }

    pub fn geometry(&self) -> Geometry {
        Geometry::default().with_board_size(self.board_width, self.board_height)
    }
}

fn parse_or<T: FromStr>(value: Option<String>, key: &'static str, default: T) -> Result<T, ClientError> {
    match value {
        None => Ok(default),
        Some(v) => v.parse().map_err(|_| ClientError::Config { key, value: v }),
    }
}
