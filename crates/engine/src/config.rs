//! Engine configuration.
//!
//! Defaults come from [`crate::types`]; every field can be overridden from the
//! environment:
//!
//! - `MATCH3_WIDTH`, `MATCH3_HEIGHT`: board size (default 8x8)
//! - `MATCH3_PALETTE`: number of tile types (default 6)
//! - `MATCH3_TILE_RATIO`, `MATCH3_COMBO_RATIO`: score weights (default 10, 1)
//! - `MATCH3_DEADLOCK_WAIT_MS`: wait before reshuffling a dead board (default 3000)
//! - `MATCH3_ROUND_MS`: round length, `0` for untimed (default 60000)
//! - `MATCH3_REVERT_SWAPS`: `1`/`true` to undo swaps that match nothing
//! - `MATCH3_SEED`: RNG seed (default 1)
//! - `MATCH3_MAX_GEN_ATTEMPTS`: board generation cap (default 10000)
//!
//! Unparseable values fall back to the default.

use std::env;
use std::str::FromStr;

use thiserror::Error;

use crate::types::{
    DEFAULT_COMBO_RATIO, DEFAULT_DEADLOCK_WAIT_MS, DEFAULT_HEIGHT, DEFAULT_MAX_GENERATION_ATTEMPTS,
    DEFAULT_PALETTE_SIZE, DEFAULT_ROUND_DURATION_MS, DEFAULT_TILE_RATIO, DEFAULT_WIDTH, MIN_RUN,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("board must be at least {min}x{min}, got {width}x{height}")]
    BoardTooSmall {
        width: usize,
        height: usize,
        min: usize,
    },

    #[error("palette size must be at least 3, got {0}")]
    PaletteTooSmall(u8),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub width: usize,
    pub height: usize,
    pub palette_size: u8,
    pub tile_ratio: u32,
    pub combo_ratio: u32,
    /// Opaque to the engine; the session waits this long before reshuffling
    pub deadlock_wait_ms: u32,
    /// `0` disables the round timer
    pub round_duration_ms: u32,
    /// Swap back when the first matching pass after a swap finds nothing
    pub revert_unmatched_swaps: bool,
    pub seed: u32,
    pub max_generation_attempts: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            palette_size: DEFAULT_PALETTE_SIZE,
            tile_ratio: DEFAULT_TILE_RATIO,
            combo_ratio: DEFAULT_COMBO_RATIO,
            deadlock_wait_ms: DEFAULT_DEADLOCK_WAIT_MS,
            round_duration_ms: DEFAULT_ROUND_DURATION_MS,
            revert_unmatched_swaps: false,
            seed: 1,
            max_generation_attempts: DEFAULT_MAX_GENERATION_ATTEMPTS,
        }
    }
}

fn parse_env<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let d = Self::default();
        let revert_unmatched_swaps = env::var("MATCH3_REVERT_SWAPS")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(d.revert_unmatched_swaps);

        Self {
            width: parse_env("MATCH3_WIDTH", d.width),
            height: parse_env("MATCH3_HEIGHT", d.height),
            palette_size: parse_env("MATCH3_PALETTE", d.palette_size),
            tile_ratio: parse_env("MATCH3_TILE_RATIO", d.tile_ratio),
            combo_ratio: parse_env("MATCH3_COMBO_RATIO", d.combo_ratio),
            deadlock_wait_ms: parse_env("MATCH3_DEADLOCK_WAIT_MS", d.deadlock_wait_ms),
            round_duration_ms: parse_env("MATCH3_ROUND_MS", d.round_duration_ms),
            revert_unmatched_swaps,
            seed: parse_env("MATCH3_SEED", d.seed),
            max_generation_attempts: parse_env("MATCH3_MAX_GEN_ATTEMPTS", d.max_generation_attempts),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < MIN_RUN || self.height < MIN_RUN {
            return Err(ConfigError::BoardTooSmall {
                width: self.width,
                height: self.height,
                min: MIN_RUN,
            });
        }
        if self.palette_size < 3 {
            return Err(ConfigError::PaletteTooSmall(self.palette_size));
        }
        Ok(())
    }

    /// Builder-style size override
    pub fn with_size(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Builder-style palette override
    pub fn with_palette(mut self, palette_size: u8) -> Self {
        self.palette_size = palette_size;
        self
    }
}
